//! Seeded synthetic bars for demos, benches and tests.
//!
//! Each symbol gets its own RNG stream derived from the master seed with
//! BLAKE3, so a symbol's bars do not depend on which other symbols are
//! generated alongside it.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::{PriceBar, TradeDate};
use crate::store::MemoryStore;

/// Shape of a generated random walk.
#[derive(Debug, Clone)]
pub struct SyntheticSpec {
    pub start: TradeDate,
    /// Number of weekday bars to generate.
    pub bars: usize,
    pub start_price: f64,
    /// Mean daily return.
    pub drift: f64,
    /// Half-width of the uniform daily return noise.
    pub volatility: f64,
    pub base_volume: u64,
    /// Probability of a 3x volume day.
    pub spike_prob: f64,
}

impl Default for SyntheticSpec {
    fn default() -> Self {
        Self {
            start: TradeDate::from(NaiveDate::from_ymd_opt(2022, 1, 3).unwrap_or_default()),
            bars: 400,
            start_price: 100.0,
            drift: 0.0008,
            volatility: 0.02,
            base_volume: 1_000_000,
            spike_prob: 0.05,
        }
    }
}

/// Per-symbol seed derived from the master seed.
pub fn symbol_seed(seed: u64, symbol: &str) -> u64 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&seed.to_le_bytes());
    hasher.update(symbol.as_bytes());
    let hash = hasher.finalize();
    let mut first = [0u8; 8];
    first.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(first)
}

fn is_weekend(date: TradeDate) -> bool {
    matches!(date.as_naive().weekday(), Weekday::Sat | Weekday::Sun)
}

/// Ascending weekday bars for `symbol`. Identical inputs give identical bars.
pub fn synthetic_bars(symbol: &str, seed: u64, spec: &SyntheticSpec) -> Vec<PriceBar> {
    let mut rng = StdRng::seed_from_u64(symbol_seed(seed, symbol));
    let mut bars = Vec::with_capacity(spec.bars);
    let mut date = spec.start;
    let mut prev_close = spec.start_price.max(0.01);

    while bars.len() < spec.bars {
        if is_weekend(date) {
            date = date.add_days(1);
            continue;
        }

        let ret = spec.drift + spec.volatility * rng.gen_range(-1.0..=1.0);
        let open = prev_close;
        let close = (prev_close * (1.0 + ret)).max(0.01);
        let wick = spec.volatility * 0.5;
        let high = open.max(close) * (1.0 + wick * rng.gen::<f64>());
        let low = open.min(close) * (1.0 - wick * rng.gen::<f64>());

        let mut volume = spec.base_volume as f64 * rng.gen_range(0.5..1.5);
        if rng.gen_bool(spec.spike_prob.clamp(0.0, 1.0)) {
            volume *= 3.0;
        }

        bars.push(PriceBar {
            trade_date: date,
            open,
            high,
            low,
            close,
            volume: volume.round() as u64,
        });
        prev_close = close;
        date = date.add_days(1);
    }

    bars
}

/// A store with one tracked ticker per symbol, each a seeded random walk.
pub fn synthetic_store(symbols: &[&str], seed: u64, spec: &SyntheticSpec) -> MemoryStore {
    symbols.iter().fold(MemoryStore::new(), |store, symbol| {
        store.with_ticker(symbol, synthetic_bars(symbol, seed, spec))
    })
}
