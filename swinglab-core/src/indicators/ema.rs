//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * value[t] + (1 - alpha) * EMA[t-1], alpha = 2/(period+1).
//! Seed: EMA[0] = value[0]. Always defined, no warm-up gap, so early values lean
//! heavily on the first observation and callers must discount them.

pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut result = Vec::with_capacity(values.len());
    result.push(first);

    let mut prev = first;
    for &v in &values[1..] {
        let next = alpha * v + (1.0 - alpha) * prev;
        result.push(next);
        prev = next;
    }

    result
}
