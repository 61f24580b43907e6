//! Daily filters: the ordered predicate list a bar must clear before the
//! entry gate is consulted.
//!
//! Filters are built from the resolved config. A `require_*` flag that is off
//! registers nothing, so the chain only ever contains predicates that can
//! reject. New predicates register here without widening `SwingConfig`.

use crate::config::SwingConfig;

use super::precompute::BarSnapshot;

/// A single daily predicate.
///
/// Filters look at one precomputed bar only; they never see other tickers or
/// any scan state.
pub trait DailyFilter: Send + Sync {
    /// Short label used in verbose diagnostics (e.g. "rsi_band").
    fn name(&self) -> &str;

    fn passes(&self, bar: &BarSnapshot) -> bool;

    /// Human-readable rejection text for a bar that does not pass.
    fn reason(&self, bar: &BarSnapshot) -> String;
}

/// Close above the 50-day average.
#[derive(Debug, Clone, Copy)]
pub struct PriceAboveSma50;

impl DailyFilter for PriceAboveSma50 {
    fn name(&self) -> &str {
        "price_above_sma50"
    }

    fn passes(&self, bar: &BarSnapshot) -> bool {
        bar.close > bar.sma50
    }

    fn reason(&self, _bar: &BarSnapshot) -> String {
        "price not above SMA50".to_string()
    }
}

/// 50-day average above the 200-day average.
#[derive(Debug, Clone, Copy)]
pub struct TrendAligned;

impl DailyFilter for TrendAligned {
    fn name(&self) -> &str {
        "trend_aligned"
    }

    fn passes(&self, bar: &BarSnapshot) -> bool {
        bar.sma50 > bar.sma200
    }

    fn reason(&self, _bar: &BarSnapshot) -> String {
        "SMA50 not above SMA200 (trend not aligned)".to_string()
    }
}

/// RSI inside an inclusive band.
#[derive(Debug, Clone, Copy)]
pub struct RsiBand {
    pub min: f64,
    pub max: f64,
}

impl DailyFilter for RsiBand {
    fn name(&self) -> &str {
        "rsi_band"
    }

    fn passes(&self, bar: &BarSnapshot) -> bool {
        self.min <= bar.rsi && bar.rsi <= self.max
    }

    fn reason(&self, bar: &BarSnapshot) -> String {
        format!("rsi {:.1} outside {}-{}", bar.rsi, self.min, self.max)
    }
}

/// Volume relative to its 20-day average.
#[derive(Debug, Clone, Copy)]
pub struct RelativeVolume {
    pub min: f64,
}

impl DailyFilter for RelativeVolume {
    fn name(&self) -> &str {
        "rel_vol"
    }

    fn passes(&self, bar: &BarSnapshot) -> bool {
        bar.rel_vol >= self.min
    }

    fn reason(&self, bar: &BarSnapshot) -> String {
        format!("relVol {:.2} < {}", bar.rel_vol, self.min)
    }
}

/// Caps how far above the 50-day average the close may sit.
#[derive(Debug, Clone, Copy)]
pub struct MaxStretch {
    pub max_pct: f64,
}

impl DailyFilter for MaxStretch {
    fn name(&self) -> &str {
        "stretch"
    }

    fn passes(&self, bar: &BarSnapshot) -> bool {
        bar.pct_above_50 <= self.max_pct
    }

    fn reason(&self, bar: &BarSnapshot) -> String {
        format!("pctAbove50 {:.2} > {}", bar.pct_above_50, self.max_pct)
    }
}

/// The daily filter chain for `config`, in evaluation order.
pub fn filter_chain(config: &SwingConfig) -> Vec<Box<dyn DailyFilter>> {
    let mut chain: Vec<Box<dyn DailyFilter>> = Vec::with_capacity(5);
    if config.require_price_above_50 {
        chain.push(Box::new(PriceAboveSma50));
    }
    if config.require_trend_aligned {
        chain.push(Box::new(TrendAligned));
    }
    chain.push(Box::new(RsiBand {
        min: config.rsi_min,
        max: config.rsi_max,
    }));
    chain.push(Box::new(RelativeVolume {
        min: config.rel_vol_min,
    }));
    chain.push(Box::new(MaxStretch {
        max_pct: config.max_stretch_pct,
    }));
    chain
}

/// True when every filter in `chain` passes `bar`.
pub fn passes_all(chain: &[Box<dyn DailyFilter>], bar: &BarSnapshot) -> bool {
    chain.iter().all(|f| f.passes(bar))
}
