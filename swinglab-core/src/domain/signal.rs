//! Swing entry signals and point-evaluation results.
//!
//! A `Signal` is an immutable value: it describes the bar on which an entry
//! condition newly became true together with the derived levels. It carries no
//! identity beyond its fields.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::date::TradeDate;

/// Which entry trigger the gate looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryMode {
    /// Close above the prior-bar 20-day high.
    Breakout,
    /// Near the 50-day average, reclaiming the 20-day EMA with rising RSI.
    Pullback,
    /// Either trigger.
    Any,
}

impl EntryMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Breakout => "breakout",
            Self::Pullback => "pullback",
            Self::Any => "any",
        }
    }
}

impl fmt::Display for EntryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "breakout" => Ok(Self::Breakout),
            "pullback" => Ok(Self::Pullback),
            "any" => Ok(Self::Any),
            other => Err(format!("unknown entry mode '{other}'")),
        }
    }
}

/// Context captured on the firing bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalMeta {
    pub rsi: f64,
    pub rel_vol: f64,
    pub pct_above_50: f64,
    pub entry_mode: EntryMode,
}

/// Entry signal with stop and R-multiple targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub date: TradeDate,
    pub entry_px: f64,
    pub stop: f64,
    /// Targets at 1.0R, 1.5R and 2.0R above entry.
    pub targets: [f64; 3],
    /// Reward to the recent swing high, in units of risk per share.
    pub rr_to_swing: f64,
    pub meta: SignalMeta,
}

impl Signal {
    /// Entry minus stop, floored at the smallest positive `f64` like the
    /// risk used to place the targets.
    pub fn risk_per_share(&self) -> f64 {
        (self.entry_px - self.stop).max(f64::MIN_POSITIVE)
    }
}

/// Outcome category of a point evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStatus {
    Passed,
    /// Indicators were available but at least one predicate failed.
    Rejected,
    /// Unknown ticker, or the requested date is absent from the fetched window.
    NotFound,
    /// No bars, or not enough bars for the indicator lookbacks.
    InsufficientHistory,
    /// The bar store failed while serving this evaluation.
    Error,
}

/// Result of evaluating one ticker on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub passed: bool,
    pub status: EvaluationStatus,
    /// Failure reasons; under verbose mode also the predicates that held.
    pub reasons: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal: Option<Signal>,
}

impl EvaluationResult {
    pub fn passed(signal: Signal, reasons: Vec<String>) -> Self {
        Self {
            passed: true,
            status: EvaluationStatus::Passed,
            reasons,
            signal: Some(signal),
        }
    }

    pub fn failed(status: EvaluationStatus, reasons: Vec<String>) -> Self {
        debug_assert!(status != EvaluationStatus::Passed);
        Self {
            passed: false,
            status,
            reasons,
            signal: None,
        }
    }

    /// Single-reason failure.
    pub fn failure(status: EvaluationStatus, reason: impl Into<String>) -> Self {
        Self::failed(status, vec![reason.into()])
    }
}
