//! Daily swing-candidate scoring and the ranked daily scan.
//!
//! A lighter screen than the entry evaluator. Each ticker gets a composite
//! score in [0, 1] built from trend, volatility contraction and close
//! structure, plus a pivot entry and a suggested stop. Illiquid names and
//! scores under the floor are dropped; the scan keeps the best `top_n`.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ConfigError;
use crate::domain::{BarColumns, PriceBar, TickerId, TradeDate};
use crate::error::SwingError;
use crate::indicators::{atr, clamp, ema, median, value_at};
use crate::scanner::{map_tickers, Parallelism};
use crate::store::BarStore;

/// Fewest bars a ticker needs before it is scored.
pub const MIN_DAILY_BARS: usize = 50;
/// Sessions in the median dollar-volume window.
pub const LIQUIDITY_WINDOW: usize = 40;
pub const DAILY_LOOKBACK_CALENDAR_DAYS: i64 = 120;
pub const DEFAULT_TOP_N: usize = 20;

const TREND_WEIGHT: f64 = 0.45;
const CONTRACTION_WEIGHT: f64 = 0.35;
const STRUCTURE_WEIGHT: f64 = 0.2;
/// ATR(5)/ATR(20) at or below this scores full contraction.
const CONTRACTION_BEST: f64 = 0.6;
/// ...and at or above this scores none.
const CONTRACTION_WORST: f64 = 0.9;
/// Close position within the bar's range that counts as a strong close.
const UPPER_CLOSE_POS: f64 = 0.6;
const STRUCTURE_BARS: usize = 3;
const PIVOT_BARS: usize = 5;
const STOP_ATR_MULT: f64 = 1.5;
const MIN_RISK_PER_SHARE: f64 = 0.01;

/// Floors a candidate must clear.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DailyParams {
    /// Median of close x volume over the last 40 sessions.
    pub min_median_dollar_volume: f64,
    pub min_daily_score: f64,
}

impl Default for DailyParams {
    fn default() -> Self {
        Self {
            min_median_dollar_volume: 2_000_000.0,
            min_daily_score: 0.6,
        }
    }
}

impl DailyParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("min_median_dollar_volume", self.min_median_dollar_volume),
            ("min_daily_score", self.min_daily_score),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidInput {
                    field,
                    reason: format!("{value} is not a non-negative number"),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyCandidate {
    pub symbol: String,
    pub daily_score: f64,
    /// 1 when close > EMA20 > EMA50, else 0.
    pub trend_score: f64,
    pub contraction_score: f64,
    pub structure_score: f64,
    /// Highest high of the last five bars; the suggested entry.
    pub pivot_high: f64,
    pub stop_suggestion: f64,
    pub atr14: f64,
    pub risk_per_share: f64,
    pub median_dollar_volume_40: f64,
}

fn last(series: &[f64]) -> Option<f64> {
    series.len().checked_sub(1).and_then(|i| value_at(series, i))
}

/// Score the latest bar of an ascending history.
///
/// `None` under 50 bars or when the ATR is not yet defined. No floor is
/// applied; see [`evaluate_daily_candidate`].
pub fn score_daily(symbol: &str, bars: &[PriceBar]) -> Option<DailyCandidate> {
    let n = bars.len();
    if n < MIN_DAILY_BARS {
        return None;
    }
    debug_assert!(crate::domain::is_ascending(bars));

    let cols = BarColumns::from_bars(bars);
    let last_close = cols.closes[n - 1];

    let dollar_volumes: Vec<f64> = bars[n - LIQUIDITY_WINDOW..]
        .iter()
        .map(|b| b.close * b.volume.max(1) as f64)
        .collect();
    let median_dollar_volume_40 = median(&dollar_volumes);

    let e20 = last(&ema(&cols.closes, 20))?;
    let e50 = last(&ema(&cols.closes, 50))?;
    let a14 = last(&atr(&cols.highs, &cols.lows, &cols.closes, 14))?;
    let a5 = last(&atr(&cols.highs, &cols.lows, &cols.closes, 5));
    let a20 = last(&atr(&cols.highs, &cols.lows, &cols.closes, 20));

    let trend_score = if last_close > e20 && e20 > e50 { 1.0 } else { 0.0 };

    let contraction_score = match (a5, a20) {
        (Some(a5), Some(a20)) if a20 > 0.0 => {
            let ratio = a5 / a20;
            clamp(
                1.0 - (ratio - CONTRACTION_BEST) / (CONTRACTION_WORST - CONTRACTION_BEST),
                0.0,
                1.0,
            )
        }
        _ => 0.0,
    };

    let strong_closes = bars[n - STRUCTURE_BARS..]
        .iter()
        .filter(|b| (b.close - b.low) / (b.high - b.low).max(1e-9) >= UPPER_CLOSE_POS)
        .count();
    let upper_close_score = strong_closes as f64 / STRUCTURE_BARS as f64;
    // half a point each for a non-negative 10-bar and 20-bar return
    let momentum_score = [10, 20]
        .into_iter()
        .filter(|&k| last_close / cols.closes[n - 1 - k] - 1.0 >= 0.0)
        .count() as f64
        * 0.5;
    let structure_score = 0.6 * upper_close_score + 0.4 * momentum_score;

    let daily_score = TREND_WEIGHT * trend_score
        + CONTRACTION_WEIGHT * contraction_score
        + STRUCTURE_WEIGHT * structure_score;

    let recent = &bars[n - PIVOT_BARS..];
    let pivot_high = recent.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    let recent_low = recent.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let stop_suggestion = recent_low.min(last_close - STOP_ATR_MULT * a14);

    Some(DailyCandidate {
        symbol: symbol.to_string(),
        daily_score,
        trend_score,
        contraction_score,
        structure_score,
        pivot_high,
        stop_suggestion,
        atr14: a14,
        risk_per_share: (pivot_high - stop_suggestion).max(MIN_RISK_PER_SHARE),
        median_dollar_volume_40,
    })
}

/// [`score_daily`] plus the liquidity and score floors.
pub fn evaluate_daily_candidate(
    symbol: &str,
    bars: &[PriceBar],
    params: &DailyParams,
) -> Option<DailyCandidate> {
    let candidate = score_daily(symbol, bars)?;
    if candidate.median_dollar_volume_40 < params.min_median_dollar_volume {
        debug!(
            symbol,
            median_dollar_volume = candidate.median_dollar_volume_40,
            "below liquidity floor"
        );
        return None;
    }
    (candidate.daily_score >= params.min_daily_score).then_some(candidate)
}

// ── Ranked scan ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct DailyScanOptions {
    /// Calendar days of history fetched per ticker, ending on the scan date.
    pub lookback_calendar_days: i64,
    pub top_n: usize,
    pub parallelism: Parallelism,
}

impl Default for DailyScanOptions {
    fn default() -> Self {
        Self {
            lookback_calendar_days: DAILY_LOOKBACK_CALENDAR_DAYS,
            top_n: DEFAULT_TOP_N,
            parallelism: Parallelism::Sequential,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPick {
    pub id: TickerId,
    #[serde(flatten)]
    pub candidate: DailyCandidate,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DailySummary {
    pub evaluated: usize,
    /// Cleared both floors; may exceed the number of picks kept.
    pub candidates: usize,
    /// Too little history, illiquid, or under the score floor.
    pub rejected: usize,
    pub errored: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyReport {
    pub date: TradeDate,
    pub params: DailyParams,
    /// Highest score first; ties broken by symbol.
    pub picks: Vec<DailyPick>,
    pub summary: DailySummary,
}

/// Score every tracked ticker on `date` and keep the best `top_n`.
///
/// A failed fetch is logged and counted; it never aborts the rest of the
/// scan.
pub fn scan_daily<S: BarStore>(
    store: &S,
    date: TradeDate,
    params: &DailyParams,
    options: DailyScanOptions,
) -> Result<DailyReport, SwingError> {
    params.validate()?;
    if options.top_n == 0 {
        return Err(ConfigError::InvalidInput {
            field: "top_n",
            reason: "must be at least 1".to_string(),
        }
        .into());
    }

    let tickers = store.list_tracked_tickers()?;
    info!(%date, tickers = tickers.len(), top_n = options.top_n, "daily scan started");

    let from = date.add_days(-options.lookback_calendar_days);
    let results = map_tickers(&tickers, options.parallelism, |t| {
        let bars = store.fetch_bars(t.id, from, date)?;
        Ok::<_, SwingError>(evaluate_daily_candidate(&t.symbol, &bars, params))
    });

    let mut picks = Vec::new();
    let mut summary = DailySummary::default();
    for (ticker, result) in tickers.iter().zip(results) {
        summary.evaluated += 1;
        match result {
            Ok(Some(candidate)) => {
                debug!(symbol = %ticker.symbol, score = candidate.daily_score, "daily candidate");
                picks.push(DailyPick {
                    id: ticker.id,
                    candidate,
                });
            }
            Ok(None) => summary.rejected += 1,
            Err(err) => {
                warn!(
                    symbol = %ticker.symbol,
                    error = %err,
                    transient = err.is_transient(),
                    "daily scoring failed"
                );
                summary.errored += 1;
            }
        }
    }

    summary.candidates = picks.len();
    picks.sort_by(|a, b| {
        b.candidate
            .daily_score
            .total_cmp(&a.candidate.daily_score)
            .then_with(|| a.candidate.symbol.cmp(&b.candidate.symbol))
    });
    picks.truncate(options.top_n);

    info!(
        %date,
        evaluated = summary.evaluated,
        candidates = summary.candidates,
        kept = picks.len(),
        errored = summary.errored,
        "daily scan finished"
    );

    Ok(DailyReport {
        date,
        params: *params,
        picks,
        summary,
    })
}
