//! Indicator precomputation for one bar slice.
//!
//! Every series is computed once per call, before any bar is inspected, and
//! read by index afterwards. Nothing is cached across calls.

use crate::domain::{BarColumns, PriceBar};
use crate::indicators::{atr, ema, highest, rsi, sma, value_at};

use super::{ATR_PERIOD, BREAKOUT_PERIOD, EMA_PERIOD, FAST_PERIOD, RSI_PERIOD, SLOW_PERIOD, VOLUME_PERIOD};

/// The indicator series the swing evaluator reads, aligned with the bars.
#[derive(Debug, Clone)]
pub struct SwingIndicators {
    pub cols: BarColumns,
    pub sma50: Vec<f64>,
    pub sma200: Vec<f64>,
    pub ema20: Vec<f64>,
    pub rsi14: Vec<f64>,
    pub atr14: Vec<f64>,
    pub highest20: Vec<f64>,
    pub vol_sma20: Vec<f64>,
}

/// Everything the filters, the entry gate and the level builder need about a
/// single bar, with the previous-bar lookups already resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarSnapshot {
    pub index: usize,
    pub close: f64,
    pub sma50: f64,
    pub sma200: f64,
    pub rsi: f64,
    /// RSI on the previous bar; NaN when undefined, which fails any comparison.
    pub prev_rsi: f64,
    /// ATR as of the previous bar, so the stop never sees today's range.
    pub atr: f64,
    pub rel_vol: f64,
    pub pct_above_50: f64,
    /// Rolling 20-bar high as of the previous bar.
    pub prior_high: f64,
    pub ema20: f64,
    pub prev_close: f64,
    pub prev_ema20: f64,
}

impl SwingIndicators {
    pub fn compute(bars: &[PriceBar]) -> Self {
        let cols = BarColumns::from_bars(bars);
        let atr14 = atr(&cols.highs, &cols.lows, &cols.closes, ATR_PERIOD);
        let ind = Self {
            sma50: sma(&cols.closes, FAST_PERIOD),
            sma200: sma(&cols.closes, SLOW_PERIOD),
            ema20: ema(&cols.closes, EMA_PERIOD),
            rsi14: rsi(&cols.closes, RSI_PERIOD),
            atr14,
            highest20: highest(&cols.highs, BREAKOUT_PERIOD),
            vol_sma20: sma(&cols.volumes, VOLUME_PERIOD),
            cols,
        };
        debug_assert!(ind.is_aligned(), "indicator series must match bar count");
        ind
    }

    pub fn len(&self) -> usize {
        self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cols.is_empty()
    }

    fn is_aligned(&self) -> bool {
        let n = self.len();
        [
            &self.sma50,
            &self.sma200,
            &self.ema20,
            &self.rsi14,
            &self.atr14,
            &self.highest20,
            &self.vol_sma20,
        ]
        .iter()
        .all(|s| s.len() == n)
    }

    /// Snapshot of bar `i`, or `None` when one of the required series
    /// (SMA50, SMA200, RSI, ATR, 20-bar high) is still warming up.
    pub fn snapshot(&self, i: usize) -> Option<BarSnapshot> {
        let sma50 = value_at(&self.sma50, i)?;
        let sma200 = value_at(&self.sma200, i)?;
        let rsi = value_at(&self.rsi14, i)?;
        let atr_now = value_at(&self.atr14, i)?;
        let high_now = value_at(&self.highest20, i)?;

        let close = self.cols.closes[i];
        let prev = i.checked_sub(1);
        let at_prev = |series: &[f64]| prev.and_then(|p| value_at(series, p));

        let atr = at_prev(&self.atr14).unwrap_or(atr_now);
        let prior_high = at_prev(&self.highest20).unwrap_or(high_now);
        let ema20 = value_at(&self.ema20, i).unwrap_or(close);
        let prev_close = prev.map_or(close, |p| self.cols.closes[p]);
        let prev_ema20 = at_prev(&self.ema20).unwrap_or(close);
        let prev_rsi = at_prev(&self.rsi14).unwrap_or(f64::NAN);

        let avg_vol = self.vol_sma20[i].max(1.0);
        let rel_vol = self.cols.volumes[i] / avg_vol;
        let pct_above_50 = (close / sma50 - 1.0) * 100.0;

        Some(BarSnapshot {
            index: i,
            close,
            sma50,
            sma200,
            rsi,
            prev_rsi,
            atr,
            rel_vol,
            pct_above_50,
            prior_high,
            ema20,
            prev_close,
            prev_ema20,
        })
    }
}
