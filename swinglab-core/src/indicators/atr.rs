//! Average True Range (ATR).
//!
//! True Range at bar t >= 1: max(high-low, |high-prev_close|, |low-prev_close|).
//! ATR is the EMA (alpha = 2/(period+1)) of the TR series, shifted back onto bar
//! indices: index 0 is NaN and index t holds the EMA computed through the TR of
//! bar t. The evaluator reads atr[t-1] at bar t, which keeps stop placement one
//! bar behind the decision bar.

use super::ema::ema;

/// TR series, one entry per bar from index 1 (length n-1).
pub fn true_range(highs: &[f64], lows: &[f64], closes: &[f64]) -> Vec<f64> {
    let n = closes.len().min(highs.len()).min(lows.len());
    (1..n)
        .map(|i| {
            let h = highs[i];
            let l = lows[i];
            let pc = closes[i - 1];
            (h - l).max((h - pc).abs()).max((l - pc).abs())
        })
        .collect()
}

/// ATR aligned to `closes`. Fewer than two bars, or columns of different
/// lengths, give an all-NaN series.
pub fn atr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len();
    let mut result = vec![f64::NAN; n];

    if n < 2 || highs.len() != n || lows.len() != n {
        return result;
    }

    let smoothed = ema(&true_range(highs, lows, closes), period);
    for (slot, value) in result.iter_mut().skip(1).zip(smoothed) {
        *slot = value;
    }

    result
}
