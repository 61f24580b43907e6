//! Rolling maximum over a trailing window (the upper Donchian band).
//!
//! highest[t] = max(values[t-period+1..=t]); NaN until the window fills.

pub fn highest(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    for i in (period - 1)..n {
        let window = &values[(i + 1 - period)..=i];
        result[i] = if window.iter().any(|v| v.is_nan()) {
            f64::NAN
        } else {
            window.iter().copied().fold(f64::NEG_INFINITY, f64::max)
        };
    }

    result
}
