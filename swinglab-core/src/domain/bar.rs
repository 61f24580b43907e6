//! PriceBar: one daily OHLCV observation for a ticker.

use serde::{Deserialize, Serialize};

use super::date::TradeDate;

/// Daily OHLCV bar.
///
/// Sequences handed to the evaluator are ascending by `trade_date` with no
/// duplicate dates; stores are responsible for that ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub trade_date: TradeDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    /// Returns true if any price field is NaN or infinite.
    pub fn is_void(&self) -> bool {
        !(self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite())
    }

    /// Basic OHLC sanity check: high >= low, high/low bracket open and close,
    /// all prices positive.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.low > 0.0
    }
}

/// True when `bars` is strictly ascending by date.
pub fn is_ascending(bars: &[PriceBar]) -> bool {
    bars.windows(2).all(|w| w[0].trade_date < w[1].trade_date)
}

/// Column views over a bar slice, the shape the indicator library consumes.
#[derive(Debug, Clone, Default)]
pub struct BarColumns {
    pub closes: Vec<f64>,
    pub highs: Vec<f64>,
    pub lows: Vec<f64>,
    pub volumes: Vec<f64>,
}

impl BarColumns {
    pub fn from_bars(bars: &[PriceBar]) -> Self {
        let n = bars.len();
        let mut cols = Self {
            closes: Vec::with_capacity(n),
            highs: Vec::with_capacity(n),
            lows: Vec::with_capacity(n),
            volumes: Vec::with_capacity(n),
        };
        for bar in bars {
            cols.closes.push(bar.close);
            cols.highs.push(bar.high);
            cols.lows.push(bar.low);
            cols.volumes.push(bar.volume as f64);
        }
        cols
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> PriceBar {
        PriceBar {
            trade_date: TradeDate::from_ordinal(20240102).unwrap(),
            open: 100.0,
            high: 105.0,
            low: 98.0,
            close: 103.0,
            volume: 50_000,
        }
    }

    #[test]
    fn bar_is_sane() {
        assert!(sample_bar().is_sane());
    }

    #[test]
    fn bar_detects_void() {
        let mut bar = sample_bar();
        bar.open = f64::NAN;
        assert!(bar.is_void());
        assert!(!bar.is_sane());
    }

    #[test]
    fn bar_detects_insane_high_low() {
        let mut bar = sample_bar();
        bar.high = 97.0;
        assert!(!bar.is_sane());
    }

    #[test]
    fn ascending_check() {
        let a = sample_bar();
        let mut b = sample_bar();
        b.trade_date = a.trade_date.add_days(1);
        assert!(is_ascending(&[a.clone(), b.clone()]));
        assert!(!is_ascending(&[b, a.clone()]));
        assert!(!is_ascending(&[a.clone(), a]));
    }

    #[test]
    fn columns_follow_bar_order() {
        let a = sample_bar();
        let mut b = sample_bar();
        b.close = 104.0;
        b.volume = 7;
        let cols = BarColumns::from_bars(&[a, b]);
        assert_eq!(cols.len(), 2);
        assert_eq!(cols.closes, vec![103.0, 104.0]);
        assert_eq!(cols.volumes, vec![50_000.0, 7.0]);
    }

    #[test]
    fn bar_serialization_uses_integer_date() {
        let json = serde_json::to_string(&sample_bar()).unwrap();
        assert!(json.contains("\"trade_date\":20240102"));
        let back: PriceBar = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample_bar());
    }
}
