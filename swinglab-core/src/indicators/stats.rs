//! Small statistics helpers: percentile, median, clamp.

pub fn clamp(value: f64, lo: f64, hi: f64) -> f64 {
    lo.max(hi.min(value))
}

/// Percentile of an ascending-sorted slice with linear interpolation between
/// order statistics. `p` is clamped to [0, 1]; empty input gives NaN.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let Some(&last) = sorted.last() else {
        return f64::NAN;
    };

    let idx = clamp(p, 0.0, 1.0) * (sorted.len() - 1) as f64;
    let i = idx.floor() as usize;
    if i >= sorted.len() - 1 {
        return last;
    }
    let frac = idx - i as f64;
    sorted[i] + (sorted[i + 1] - sorted[i]) * frac
}

/// Median of an unsorted slice; NaN on empty input.
pub fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    percentile(&sorted, 0.5)
}
