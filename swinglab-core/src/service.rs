//! `SwingService`: the operations exposed to a serving layer.
//!
//! Each call resolves its configuration first (invalid overrides fail before
//! any store access), then fetches a bounded bar window and evaluates it.
//! Nothing is cached between calls.

use tracing::debug;

use crate::config::{ConfigOverrides, Preset, SwingConfig};
use crate::daily::{scan_daily, DailyParams, DailyReport, DailyScanOptions};
use crate::domain::{EvaluationResult, EvaluationStatus, Signal, TradeDate};
use crate::error::SwingError;
use crate::evaluator::Evaluator;
use crate::scanner::{scan_tickers, ScanOptions, ScanReport, LOOKBACK_CALENDAR_DAYS};
use crate::store::{BarStore, DEFAULT_RECENT_BARS};

pub const REASON_TICKER_NOT_FOUND: &str = "ticker not found";

pub struct SwingService<S: BarStore> {
    store: S,
}

impl<S: BarStore> SwingService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn evaluator(
        preset: Preset,
        overrides: Option<&ConfigOverrides>,
    ) -> Result<Evaluator, SwingError> {
        Ok(Evaluator::new(SwingConfig::resolve(preset, overrides)?))
    }

    /// Signals that fired between `from` and `to` inclusive.
    ///
    /// Scans the most recent 500 bars on or before `to`; an unknown ticker
    /// yields an empty list.
    pub fn analyze_swing(
        &self,
        symbol: &str,
        from: TradeDate,
        to: TradeDate,
        preset: Preset,
        overrides: Option<&ConfigOverrides>,
    ) -> Result<Vec<Signal>, SwingError> {
        let evaluator = Self::evaluator(preset, overrides)?;
        let Some(ticker) = self.store.lookup_ticker(symbol)? else {
            debug!(symbol, "analyze: ticker not found");
            return Ok(Vec::new());
        };

        let bars = self
            .store
            .fetch_recent_bars_before(ticker.id, to, DEFAULT_RECENT_BARS)?;
        let signals: Vec<Signal> = evaluator
            .scan(&bars)
            .into_iter()
            .filter(|s| from <= s.date && s.date <= to)
            .collect();

        debug!(
            symbol,
            bars = bars.len(),
            signals = signals.len(),
            %from,
            %to,
            "analyze complete"
        );
        Ok(signals)
    }

    /// Point evaluation of one ticker on `date`.
    pub fn evaluate_ticker_for_date(
        &self,
        symbol: &str,
        date: TradeDate,
        preset: Preset,
        overrides: Option<&ConfigOverrides>,
        verbose: bool,
    ) -> Result<EvaluationResult, SwingError> {
        let evaluator = Self::evaluator(preset, overrides)?;
        let Some(ticker) = self.store.lookup_ticker(symbol)? else {
            return Ok(EvaluationResult::failure(
                EvaluationStatus::NotFound,
                REASON_TICKER_NOT_FOUND,
            ));
        };

        let bars = self.store.fetch_bars(
            ticker.id,
            date.add_days(-LOOKBACK_CALENDAR_DAYS),
            date,
        )?;
        Ok(evaluator.evaluate_date(&bars, date, verbose))
    }

    /// Fleet scan of every tracked ticker on `date`.
    pub fn scan_tickers_for_date(
        &self,
        date: TradeDate,
        preset: Preset,
        overrides: Option<&ConfigOverrides>,
        options: ScanOptions,
    ) -> Result<ScanReport, SwingError> {
        let evaluator = Self::evaluator(preset, overrides)?;
        scan_tickers(&self.store, &evaluator, date, options)
    }

    /// Ranked daily candidates across every tracked ticker on `date`.
    pub fn daily_scan_for_date(
        &self,
        date: TradeDate,
        params: &DailyParams,
        options: DailyScanOptions,
    ) -> Result<DailyReport, SwingError> {
        scan_daily(&self.store, date, params, options)
    }
}
