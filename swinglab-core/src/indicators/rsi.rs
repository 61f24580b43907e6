//! Relative Strength Index (RSI).
//!
//! Average gain and average loss are the plain mean of the per-bar up and down
//! moves over the trailing `period` changes (no Wilder smoothing).
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss), and 100 when avg_loss == 0.
//! First valid value at index `period`.

pub fn rsi(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n <= period {
        return result;
    }

    // changes[j] = values[j] - values[j-1]; changes[0] is unused
    let mut changes = vec![0.0; n];
    for j in 1..n {
        changes[j] = values[j] - values[j - 1];
    }

    for i in period..n {
        let mut gain = 0.0;
        let mut loss = 0.0;
        for &d in &changes[(i + 1 - period)..=i] {
            if d > 0.0 {
                gain += d;
            } else if d < 0.0 {
                loss -= d;
            }
        }
        result[i] = compute_rsi(gain / period as f64, loss / period as f64);
    }

    result
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_gain.is_nan() || avg_loss.is_nan() {
        f64::NAN
    } else if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn rsi_warmup_is_nan() {
        let result = rsi(&[100.0, 101.0, 102.0, 103.0, 104.0], 3);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert!(result[2].is_nan());
        assert!(!result[3].is_nan());
    }

    #[test]
    fn rsi_all_gains_is_100() {
        let result = rsi(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0], 3);
        assert_approx(result[3], 100.0, DEFAULT_EPSILON);
        assert_approx(result[5], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let result = rsi(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0], 3);
        assert_approx(result[3], 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_flat_is_100() {
        let result = rsi(&[50.0; 10], 3);
        assert_approx(result[9], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_plain_mean_window() {
        // Changes: +0.34, -0.25, -0.48, +0.72
        // RSI[3]: gains 0.34, losses 0.73 -> 100 - 100/(1 + 0.34/0.73)
        // RSI[4]: window drops +0.34, adds +0.72 -> gains 0.72, losses 0.73
        let result = rsi(&[44.0, 44.34, 44.09, 43.61, 44.33], 3);
        assert_approx(result[3], 100.0 - 100.0 / (1.0 + 0.34 / 0.73), 1e-9);
        assert_approx(result[4], 100.0 - 100.0 / (1.0 + 0.72 / 0.73), 1e-9);
    }

    #[test]
    fn rsi_bounds() {
        let result = rsi(&[100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0], 3);
        for (i, &v) in result.iter().enumerate() {
            if !v.is_nan() {
                assert!((0.0..=100.0).contains(&v), "RSI out of bounds at {i}: {v}");
            }
        }
    }

    #[test]
    fn rsi_too_short() {
        assert!(rsi(&[1.0, 2.0, 3.0], 3).iter().all(|v| v.is_nan()));
    }
}
