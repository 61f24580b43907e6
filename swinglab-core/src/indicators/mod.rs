//! Indicator library.
//!
//! Pure functions from a value series to an output series of the same length.
//! Positions without enough lookback hold `f64::NAN`, the not-available
//! sentinel; a missing value is never reported as zero. Inputs are never
//! mutated.
//!
//! The evaluator precomputes every series once per call and reads them by bar
//! index; nothing here keeps state between calls.

pub mod atr;
pub mod ema;
pub mod highest;
pub mod rsi;
pub mod sma;
pub mod stats;

pub use atr::{atr, true_range};
pub use ema::ema;
pub use highest::highest;
pub use rsi::rsi;
pub use sma::sma;
pub use stats::{clamp, median, percentile};

/// Series aligned index-for-index with the bars it was computed from.
pub type IndicatorSeries = Vec<f64>;

/// Value at `index`, or `None` when out of range or not yet available.
pub fn value_at(series: &[f64], index: usize) -> Option<f64> {
    series.get(index).copied().filter(|v| !v.is_nan())
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
