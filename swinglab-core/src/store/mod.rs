//! Bar and ticker store: the only I/O boundary of the core.
//!
//! The `BarStore` trait abstracts over wherever bars live (a database, a CSV
//! import, synthetic data) so the service can be driven by any backend and
//! mocked in tests. Stores own ordering and de-duplication: every bar slice
//! they return is ascending by date with no repeated dates.

pub mod memory;

use thiserror::Error;

use crate::domain::{PriceBar, Ticker, TickerId, TradeDate};

pub use memory::MemoryStore;

/// Cap on bars returned by `fetch_recent_bars_before` when callers have no
/// better number.
pub const DEFAULT_RECENT_BARS: usize = 500;

/// Structured store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("bar store unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("store error: {0}")]
    Other(String),
}

/// Read interface over the ticker directory and the daily bar history.
///
/// Calls are synchronous and may block; implementations decide their own
/// retry policy. The trait is `Send + Sync` so a fleet scan may fan out over
/// a thread pool.
pub trait BarStore: Send + Sync {
    fn lookup_ticker(&self, symbol: &str) -> Result<Option<Ticker>, StoreError>;

    /// Tickers included in fleet scans, in a stable order.
    fn list_tracked_tickers(&self) -> Result<Vec<Ticker>, StoreError>;

    /// Bars with `from <= trade_date <= to`, ascending.
    fn fetch_bars(
        &self,
        id: TickerId,
        from: TradeDate,
        to: TradeDate,
    ) -> Result<Vec<PriceBar>, StoreError>;

    /// The most recent `max_count` bars dated on or before `on_or_before`,
    /// ascending.
    fn fetch_recent_bars_before(
        &self,
        id: TickerId,
        on_or_before: TradeDate,
        max_count: usize,
    ) -> Result<Vec<PriceBar>, StoreError>;
}

impl<S: BarStore + ?Sized> BarStore for &S {
    fn lookup_ticker(&self, symbol: &str) -> Result<Option<Ticker>, StoreError> {
        (**self).lookup_ticker(symbol)
    }

    fn list_tracked_tickers(&self) -> Result<Vec<Ticker>, StoreError> {
        (**self).list_tracked_tickers()
    }

    fn fetch_bars(
        &self,
        id: TickerId,
        from: TradeDate,
        to: TradeDate,
    ) -> Result<Vec<PriceBar>, StoreError> {
        (**self).fetch_bars(id, from, to)
    }

    fn fetch_recent_bars_before(
        &self,
        id: TickerId,
        on_or_before: TradeDate,
        max_count: usize,
    ) -> Result<Vec<PriceBar>, StoreError> {
        (**self).fetch_recent_bars_before(id, on_or_before, max_count)
    }
}
