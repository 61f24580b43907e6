//! SwingLab Core: swing-entry signal detection over daily price bars.
//!
//! This crate contains the detection engine and its store boundary:
//! - Domain types (trade dates, bars, tickers, signals, evaluation results)
//! - Indicator library (SMA, EMA, RSI, ATR, rolling high, percentile/median)
//! - Config resolver (base defaults, named presets, caller overrides)
//! - Signal evaluator (daily filter chain, entry gate, first-pass de-duplication)
//! - Fleet scanner with per-ticker failure isolation
//! - Daily candidate scoring and a ranked daily scan
//! - `BarStore` trait with in-memory, CSV and synthetic backends
//! - `SwingService`, the facade a serving layer calls

pub mod config;
pub mod daily;
pub mod data;
pub mod domain;
pub mod error;
pub mod evaluator;
pub mod indicators;
pub mod scanner;
pub mod service;
pub mod store;

pub use config::{ConfigError, ConfigOverrides, Preset, SwingConfig, SwingRequest};
pub use daily::{DailyCandidate, DailyParams, DailyReport};
pub use domain::{EntryMode, EvaluationResult, EvaluationStatus, PriceBar, Signal, Ticker, TradeDate};
pub use error::SwingError;
pub use evaluator::Evaluator;
pub use scanner::{Parallelism, ScanOptions, ScanReport, TickerOutcome};
pub use service::SwingService;
pub use store::{BarStore, MemoryStore, StoreError};
