//! Entry gate: breakout or pullback-reclaim trigger on the decision bar.

use crate::config::SwingConfig;
use crate::domain::EntryMode;

use super::precompute::BarSnapshot;

/// Trigger evaluation for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateOutcome {
    pub breakout: bool,
    pub pullback: bool,
    /// Whether the gate lets the bar through, after `require_entry_gate`.
    pub pass: bool,
}

impl GateOutcome {
    pub fn reason(&self) -> String {
        format!(
            "entry gate failed (breakout:{}, pullback:{})",
            self.breakout, self.pullback
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EntryGate {
    pub mode: EntryMode,
    pub near_pct50: f64,
    pub required: bool,
}

impl EntryGate {
    pub fn from_config(config: &SwingConfig) -> Self {
        Self {
            mode: config.entry_mode,
            near_pct50: config.near_pct50,
            required: config.require_entry_gate,
        }
    }

    pub fn evaluate(&self, bar: &BarSnapshot) -> GateOutcome {
        // Prior-bar high: today's own high never counts.
        let breakout = bar.close > bar.prior_high;

        let near_sma50 = bar.pct_above_50.abs() <= self.near_pct50;
        let reclaim_ema20 = bar.close > bar.ema20 && bar.prev_close <= bar.prev_ema20;
        let pullback = near_sma50 && reclaim_ema20 && bar.rsi > bar.prev_rsi;

        let raw = match self.mode {
            EntryMode::Breakout => breakout,
            EntryMode::Pullback => pullback,
            EntryMode::Any => breakout || pullback,
        };

        GateOutcome {
            breakout,
            pullback,
            pass: !self.required || raw,
        }
    }
}
