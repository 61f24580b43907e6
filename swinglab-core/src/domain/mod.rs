//! Domain types for SwingLab

pub mod bar;
pub mod date;
pub mod signal;
pub mod ticker;

pub use bar::{is_ascending, BarColumns, PriceBar};
pub use date::{DateError, TradeDate};
pub use signal::{EntryMode, EvaluationResult, EvaluationStatus, Signal, SignalMeta};
pub use ticker::{Ticker, TickerId};
