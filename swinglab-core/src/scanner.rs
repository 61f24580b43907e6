//! Fleet scan: point evaluation of every tracked ticker on one date.
//!
//! Each ticker is an independent call with its own failure boundary. A store
//! failure for one ticker is logged and downgraded to a failing outcome; it
//! never aborts the rest of the scan. Only the ticker directory lookup itself
//! can fail the whole run.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::Preset;
use crate::domain::{EvaluationResult, EvaluationStatus, Signal, Ticker, TickerId, TradeDate};
use crate::error::SwingError;
use crate::evaluator::Evaluator;
use crate::indicators::median;
use crate::store::{BarStore, StoreError};

/// Calendar days of history fetched per ticker, ending on the scan date.
pub const LOOKBACK_CALENDAR_DAYS: i64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parallelism {
    /// One ticker at a time; bounds concurrent load on the bar store.
    #[default]
    Sequential,
    /// Evaluate on a dedicated rayon pool of this many threads.
    Threads(usize),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Include failing tickers, with their reasons, in the outcomes.
    pub verbose: bool,
    pub parallelism: Parallelism,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TickerOutcome {
    Passed {
        id: TickerId,
        symbol: String,
        signal: Signal,
        next_entry_date: TradeDate,
    },
    Failed {
        id: TickerId,
        symbol: String,
        status: EvaluationStatus,
        reasons: Vec<String>,
    },
}

impl TickerOutcome {
    pub fn symbol(&self) -> &str {
        match self {
            Self::Passed { symbol, .. } | Self::Failed { symbol, .. } => symbol,
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ScanSummary {
    pub evaluated: usize,
    pub passed: usize,
    /// Evaluated without error but not passing (includes not-found and
    /// insufficient-history results).
    pub rejected: usize,
    /// Store failures.
    pub errored: usize,
    /// Failure reason label (numbers stripped) to occurrence count.
    pub reason_counts: BTreeMap<String, usize>,
    /// Median reward-to-swing across passing signals; `None` when none passed.
    pub median_rr_to_swing: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReport {
    pub date: TradeDate,
    pub preset: Preset,
    /// Ties the report to the exact thresholds that produced it.
    pub config_fingerprint: String,
    pub outcomes: Vec<TickerOutcome>,
    pub summary: ScanSummary,
}

impl ScanReport {
    pub fn passed(&self) -> impl Iterator<Item = &TickerOutcome> {
        self.outcomes.iter().filter(|o| o.is_passed())
    }
}

/// Reason text with its numeric tokens removed, so that e.g.
/// `"rsi 71.3 outside 45-60"` and `"rsi 38.0 outside 45-60"` share a label.
pub fn reason_label(reason: &str) -> String {
    reason
        .split_whitespace()
        .filter(|tok| {
            !tok.chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Apply `f` to every ticker, on a dedicated rayon pool under
/// `Parallelism::Threads`. Results follow the input order in both modes.
pub(crate) fn map_tickers<T, F>(tickers: &[Ticker], parallelism: Parallelism, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(&Ticker) -> T + Send + Sync,
{
    let pool = match parallelism {
        Parallelism::Threads(n) if n > 1 => {
            match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
                Ok(pool) => Some(pool),
                Err(e) => {
                    warn!(error = %e, "failed to build ticker thread pool, running sequentially");
                    None
                }
            }
        }
        _ => None,
    };

    match pool {
        Some(pool) => pool.install(|| tickers.par_iter().map(&f).collect()),
        None => tickers.iter().map(&f).collect(),
    }
}

fn evaluate_ticker<S: BarStore>(
    store: &S,
    evaluator: &Evaluator,
    ticker: &Ticker,
    date: TradeDate,
    verbose: bool,
) -> Result<EvaluationResult, StoreError> {
    let from = date.add_days(-LOOKBACK_CALENDAR_DAYS);
    let bars = store.fetch_bars(ticker.id, from, date)?;
    Ok(evaluator.evaluate_date(&bars, date, verbose))
}

/// Scan every tracked ticker on `date`.
///
/// Outcomes follow the store's ticker order in both execution modes.
pub fn scan_tickers<S: BarStore>(
    store: &S,
    evaluator: &Evaluator,
    date: TradeDate,
    options: ScanOptions,
) -> Result<ScanReport, SwingError> {
    let tickers = store.list_tracked_tickers()?;
    info!(
        %date,
        tickers = tickers.len(),
        preset = %evaluator.config().preset,
        verbose = options.verbose,
        "fleet scan started"
    );

    let results = map_tickers(&tickers, options.parallelism, |t| {
        evaluate_ticker(store, evaluator, t, date, options.verbose)
    });

    let mut outcomes = Vec::new();
    let mut summary = ScanSummary::default();
    let mut rr = Vec::new();

    for (ticker, result) in tickers.into_iter().zip(results) {
        summary.evaluated += 1;
        match result {
            Ok(EvaluationResult {
                passed: true,
                signal: Some(signal),
                ..
            }) => {
                summary.passed += 1;
                rr.push(signal.rr_to_swing);
                outcomes.push(TickerOutcome::Passed {
                    id: ticker.id,
                    symbol: ticker.symbol,
                    next_entry_date: date.add_days(1),
                    signal,
                });
            }
            Ok(result) => {
                summary.rejected += 1;
                for reason in result.reasons.iter().filter(|r| !r.ends_with(" ok")) {
                    *summary.reason_counts.entry(reason_label(reason)).or_default() += 1;
                }
                if options.verbose {
                    outcomes.push(TickerOutcome::Failed {
                        id: ticker.id,
                        symbol: ticker.symbol,
                        status: result.status,
                        reasons: result.reasons,
                    });
                }
            }
            Err(e) => {
                let err = SwingError::from(e);
                warn!(
                    symbol = %ticker.symbol,
                    error = %err,
                    transient = err.is_transient(),
                    "ticker evaluation failed"
                );
                summary.errored += 1;
                *summary.reason_counts.entry("upstream failure".to_string()).or_default() += 1;
                if options.verbose {
                    outcomes.push(TickerOutcome::Failed {
                        id: ticker.id,
                        symbol: ticker.symbol,
                        status: EvaluationStatus::Error,
                        reasons: vec![err.to_string()],
                    });
                }
            }
        }
    }

    summary.median_rr_to_swing = (!rr.is_empty()).then(|| median(&rr));

    info!(
        %date,
        evaluated = summary.evaluated,
        passed = summary.passed,
        rejected = summary.rejected,
        errored = summary.errored,
        "fleet scan finished"
    );

    Ok(ScanReport {
        date,
        preset: evaluator.config().preset,
        config_fingerprint: evaluator.config().fingerprint(),
        outcomes,
        summary,
    })
}
