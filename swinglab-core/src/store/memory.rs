//! In-memory bar store.
//!
//! Backs the CLI (after a CSV import), the demo command and the tests. Bars
//! are kept per ticker in a `BTreeMap` keyed by date, so every fetch is
//! ascending and duplicate-free by construction.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::domain::{PriceBar, Ticker, TickerId, TradeDate};

use super::{BarStore, StoreError};

#[derive(Debug, Clone)]
struct TickerEntry {
    ticker: Ticker,
    tracked: bool,
    bars: BTreeMap<TradeDate, PriceBar>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<TickerId, TickerEntry>,
    by_symbol: BTreeMap<String, TickerId>,
    next_id: u32,
}

fn normalize(symbol: &str) -> String {
    symbol.trim().to_ascii_uppercase()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `symbol`, or return the existing ticker when already known.
    /// Symbols are matched case-insensitively and stored upper-case.
    pub fn insert_ticker(&mut self, symbol: &str, tracked: bool) -> Ticker {
        let symbol = normalize(symbol);
        if let Some(id) = self.by_symbol.get(&symbol) {
            if let Some(entry) = self.entries.get(id) {
                return entry.ticker.clone();
            }
        }

        self.next_id += 1;
        let ticker = Ticker::new(self.next_id, symbol.clone());
        self.by_symbol.insert(symbol, ticker.id);
        self.entries.insert(
            ticker.id,
            TickerEntry {
                ticker: ticker.clone(),
                tracked,
                bars: BTreeMap::new(),
            },
        );
        ticker
    }

    pub fn set_tracked(&mut self, id: TickerId, tracked: bool) {
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.tracked = tracked;
        }
    }

    /// Insert bars for `id`. A date already present keeps its first bar.
    /// Returns how many bars were dropped as duplicates.
    pub fn insert_bars(
        &mut self,
        id: TickerId,
        bars: impl IntoIterator<Item = PriceBar>,
    ) -> Result<usize, StoreError> {
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or_else(|| StoreError::Other(format!("unknown ticker id {id}")))?;

        let mut duplicates = 0;
        for bar in bars {
            match entry.bars.entry(bar.trade_date) {
                Entry::Vacant(slot) => {
                    slot.insert(bar);
                }
                Entry::Occupied(_) => duplicates += 1,
            }
        }
        Ok(duplicates)
    }

    /// Convenience: register a tracked ticker and load its bars.
    pub fn with_ticker(mut self, symbol: &str, bars: Vec<PriceBar>) -> Self {
        let ticker = self.insert_ticker(symbol, true);
        if let Some(entry) = self.entries.get_mut(&ticker.id) {
            for bar in bars {
                entry.bars.entry(bar.trade_date).or_insert(bar);
            }
        }
        self
    }

    pub fn ticker_count(&self) -> usize {
        self.entries.len()
    }
}

impl BarStore for MemoryStore {
    fn lookup_ticker(&self, symbol: &str) -> Result<Option<Ticker>, StoreError> {
        Ok(self
            .by_symbol
            .get(&normalize(symbol))
            .and_then(|id| self.entries.get(id))
            .map(|e| e.ticker.clone()))
    }

    fn list_tracked_tickers(&self) -> Result<Vec<Ticker>, StoreError> {
        Ok(self
            .entries
            .values()
            .filter(|e| e.tracked)
            .map(|e| e.ticker.clone())
            .collect())
    }

    fn fetch_bars(
        &self,
        id: TickerId,
        from: TradeDate,
        to: TradeDate,
    ) -> Result<Vec<PriceBar>, StoreError> {
        if from > to {
            return Ok(Vec::new());
        }
        Ok(self
            .entries
            .get(&id)
            .map(|e| e.bars.range(from..=to).map(|(_, b)| b.clone()).collect())
            .unwrap_or_default())
    }

    fn fetch_recent_bars_before(
        &self,
        id: TickerId,
        on_or_before: TradeDate,
        max_count: usize,
    ) -> Result<Vec<PriceBar>, StoreError> {
        let Some(entry) = self.entries.get(&id) else {
            return Ok(Vec::new());
        };
        let mut bars: Vec<PriceBar> = entry
            .bars
            .range(..=on_or_before)
            .rev()
            .take(max_count)
            .map(|(_, b)| b.clone())
            .collect();
        bars.reverse();
        Ok(bars)
    }
}
