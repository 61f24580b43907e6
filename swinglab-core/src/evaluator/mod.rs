//! Swing entry evaluator.
//!
//! Per bar: the daily filter chain, then the entry gate, then first-pass
//! de-duplication against the previous bar. A bar that clears all three
//! fires and gets entry, stop and target levels.
//!
//! Two modes share the same per-bar logic:
//! - `scan` walks the whole history and returns every firing signal in date
//!   order;
//! - `evaluate_date` / `evaluate_index` judge a single bar and explain every
//!   failed predicate.

pub mod filters;
pub mod gate;
pub mod levels;
pub mod precompute;

use tracing::{debug, warn};

use crate::config::SwingConfig;
use crate::domain::{EvaluationResult, EvaluationStatus, PriceBar, Signal, TradeDate};

pub use filters::{filter_chain, DailyFilter};
pub use gate::{EntryGate, GateOutcome};
pub use levels::build_signal;
pub use precompute::{BarSnapshot, SwingIndicators};

pub const FAST_PERIOD: usize = 50;
pub const SLOW_PERIOD: usize = 200;
pub const EMA_PERIOD: usize = 20;
pub const RSI_PERIOD: usize = 14;
pub const ATR_PERIOD: usize = 14;
pub const BREAKOUT_PERIOD: usize = 20;
pub const VOLUME_PERIOD: usize = 20;
/// Bars (ending at the signal bar) searched for the swing low and high.
pub const SWING_LEN: usize = 10;
/// Fractional buffer below the swing low for the swing stop (0.2%).
pub const STOP_BUFFER: f64 = 0.002;
pub const R_MULTIPLES: [f64; 3] = [1.0, 1.5, 2.0];

pub const REASON_NO_DATA: &str = "no price data";
pub const REASON_INSUFFICIENT: &str = "insufficient indicator history";
pub const REASON_NOT_FIRST_PASS: &str = "not first pass: previous bar also passed";

/// A resolved config together with the filter chain and gate built from it.
pub struct Evaluator {
    config: SwingConfig,
    filters: Vec<Box<dyn DailyFilter>>,
    gate: EntryGate,
}

impl Evaluator {
    pub fn new(config: SwingConfig) -> Self {
        let inert = config.inert_flags();
        if !inert.is_empty() {
            warn!(flags = ?inert, "reserved filter flags are set but have no effect");
        }
        Self {
            filters: filter_chain(&config),
            gate: EntryGate::from_config(&config),
            config,
        }
    }

    pub fn config(&self) -> &SwingConfig {
        &self.config
    }

    /// Daily filters plus entry gate on bar `i`. `None` while indicators are
    /// still warming up.
    fn entry_pass(&self, ind: &SwingIndicators, i: usize) -> Option<bool> {
        let bar = ind.snapshot(i)?;
        Some(filters::passes_all(&self.filters, &bar) && self.gate.evaluate(&bar).pass)
    }

    /// Every firing signal over `bars`, oldest first.
    ///
    /// Histories shorter than the slow average return nothing without
    /// computing any indicator.
    pub fn scan(&self, bars: &[PriceBar]) -> Vec<Signal> {
        if bars.len() < SLOW_PERIOD {
            debug!(bars = bars.len(), "history shorter than slow average, skipping scan");
            return Vec::new();
        }

        let ind = SwingIndicators::compute(bars);
        let passes: Vec<bool> = (0..bars.len())
            .map(|i| self.entry_pass(&ind, i).unwrap_or(false))
            .collect();

        let mut signals = Vec::new();
        for i in 1..bars.len() {
            if !passes[i] || (!self.config.allow_repeat_entries && passes[i - 1]) {
                continue;
            }
            // passes[i] implies a snapshot exists
            if let Some(bar) = ind.snapshot(i) {
                signals.push(build_signal(bars[i].trade_date, &bar, &ind, &self.config));
            }
        }

        debug!(
            bars = bars.len(),
            signals = signals.len(),
            preset = %self.config.preset,
            "scan complete"
        );
        signals
    }

    /// Point evaluation of the bar dated `date`.
    pub fn evaluate_date(
        &self,
        bars: &[PriceBar],
        date: TradeDate,
        verbose: bool,
    ) -> EvaluationResult {
        if bars.is_empty() {
            return EvaluationResult::failure(EvaluationStatus::InsufficientHistory, REASON_NO_DATA);
        }
        match bars.binary_search_by_key(&date, |b| b.trade_date) {
            Ok(i) => self.evaluate_index(bars, i, verbose),
            Err(_) => {
                warn!(%date, bars = bars.len(), "date not found in price history");
                EvaluationResult::failure(
                    EvaluationStatus::NotFound,
                    format!("date {date} not found in price history"),
                )
            }
        }
    }

    /// Point evaluation of bar `i`.
    ///
    /// Only `bars[..=i]` is read. Under `verbose`, predicates that held are
    /// listed as `"<name> ok"` alongside any failures.
    pub fn evaluate_index(&self, bars: &[PriceBar], i: usize, verbose: bool) -> EvaluationResult {
        if i >= bars.len() {
            return EvaluationResult::failure(EvaluationStatus::NotFound, "bar index out of range");
        }
        if i + 1 < SLOW_PERIOD {
            return EvaluationResult::failure(
                EvaluationStatus::InsufficientHistory,
                REASON_INSUFFICIENT,
            );
        }

        let history = &bars[..=i];
        let ind = SwingIndicators::compute(history);
        let Some(bar) = ind.snapshot(i) else {
            return EvaluationResult::failure(
                EvaluationStatus::InsufficientHistory,
                REASON_INSUFFICIENT,
            );
        };

        let mut reasons = Vec::new();
        let mut daily_all = true;
        for filter in &self.filters {
            if filter.passes(&bar) {
                if verbose {
                    reasons.push(format!("{} ok", filter.name()));
                }
            } else {
                daily_all = false;
                reasons.push(filter.reason(&bar));
            }
        }

        let gate = self.gate.evaluate(&bar);
        if !gate.pass {
            reasons.push(gate.reason());
        } else if verbose {
            reasons.push("entry_gate ok".to_string());
        }

        let entry_pass = daily_all && gate.pass;
        let prev_pass = !self.config.allow_repeat_entries
            && entry_pass
            && i > 0
            && self.entry_pass(&ind, i - 1).unwrap_or(false);
        if prev_pass {
            reasons.push(REASON_NOT_FIRST_PASS.to_string());
        }

        debug!(
            date = %bars[i].trade_date,
            entry_pass,
            prev_pass,
            breakout = gate.breakout,
            pullback = gate.pullback,
            "point evaluation"
        );

        if entry_pass && !prev_pass {
            let signal = build_signal(bars[i].trade_date, &bar, &ind, &self.config);
            EvaluationResult::passed(signal, reasons)
        } else {
            EvaluationResult::failed(EvaluationStatus::Rejected, reasons)
        }
    }
}
