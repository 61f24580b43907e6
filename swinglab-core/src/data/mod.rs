//! Bar sources that feed a `MemoryStore`: CSV files and seeded synthetic data.

pub mod csv_import;
pub mod synthetic;

pub use csv_import::{import_csv_path, import_csv_reader, ImportSummary, InvalidRow};
pub use synthetic::{synthetic_bars, synthetic_store, SyntheticSpec};
