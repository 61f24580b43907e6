//! CSV import of daily bars into a `MemoryStore`.
//!
//! Expected columns: `ticker,tradeDate,open,high,low,close,volume`. The
//! upload-style names (`symbol`, `date`, `openPrice`, `closePrice`, ...) are
//! accepted as well; extra columns are ignored. Bad rows are skipped and
//! reported, they never abort the import.

use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{PriceBar, TradeDate};
use crate::store::{MemoryStore, StoreError};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default, alias = "symbol", alias = "Ticker", alias = "Symbol")]
    ticker: Option<String>,
    #[serde(default, alias = "tradeDate", alias = "date", alias = "Date")]
    trade_date: Option<String>,
    #[serde(default, alias = "openPrice", alias = "Open")]
    open: Option<String>,
    #[serde(default, alias = "highPrice", alias = "High")]
    high: Option<String>,
    #[serde(default, alias = "lowPrice", alias = "Low")]
    low: Option<String>,
    #[serde(default, alias = "closePrice", alias = "Close")]
    close: Option<String>,
    #[serde(default, alias = "Volume")]
    volume: Option<String>,
}

/// A skipped row and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidRow {
    /// 1-based line in the file, header included.
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Data rows read, valid or not.
    pub rows: usize,
    pub imported: usize,
    /// Rows repeating a `(ticker, date)` pair; the first occurrence wins.
    pub duplicates: usize,
    pub tickers: usize,
    pub invalid: Vec<InvalidRow>,
}

pub fn import_csv_path(path: &Path, store: &mut MemoryStore) -> Result<ImportSummary, StoreError> {
    let file = std::fs::File::open(path)?;
    let summary = import_csv_reader(file, store)?;
    info!(
        path = %path.display(),
        rows = summary.rows,
        imported = summary.imported,
        duplicates = summary.duplicates,
        invalid = summary.invalid.len(),
        "CSV import complete"
    );
    Ok(summary)
}

pub fn import_csv_reader<R: io::Read>(
    reader: R,
    store: &mut MemoryStore,
) -> Result<ImportSummary, StoreError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut summary = ImportSummary::default();
    let mut seen: HashSet<(String, TradeDate)> = HashSet::new();
    let mut by_ticker: BTreeMap<String, Vec<PriceBar>> = BTreeMap::new();

    for (idx, record) in rdr.deserialize::<CsvRow>().enumerate() {
        let line = idx + 2;
        summary.rows += 1;

        let row = match record {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                summary.invalid.push(InvalidRow {
                    line,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let (symbol, bar) = match parse_row(row) {
            Ok(parsed) => parsed,
            Err(reason) => {
                summary.invalid.push(InvalidRow {
                    line,
                    reason: reason.to_string(),
                });
                continue;
            }
        };

        if !seen.insert((symbol.clone(), bar.trade_date)) {
            summary.duplicates += 1;
            continue;
        }
        by_ticker.entry(symbol).or_default().push(bar);
    }

    for (symbol, bars) in by_ticker {
        let ticker = store.insert_ticker(&symbol, true);
        let count = bars.len();
        let dropped = store.insert_bars(ticker.id, bars)?;
        summary.duplicates += dropped;
        summary.imported += count - dropped;
        summary.tickers += 1;
    }

    Ok(summary)
}

fn parse_row(row: CsvRow) -> Result<(String, PriceBar), &'static str> {
    let symbol = row
        .ticker
        .map(|s| s.trim().to_ascii_uppercase())
        .filter(|s| !s.is_empty())
        .ok_or("missing ticker symbol")?;

    let trade_date: TradeDate = row
        .trade_date
        .as_deref()
        .and_then(|s| s.parse().ok())
        .ok_or("invalid tradeDate")?;

    let number = |field: Option<String>| -> Option<f64> {
        field.and_then(|s| s.parse::<f64>().ok()).filter(|v| v.is_finite())
    };
    const BAD_NUMBERS: &str = "price or volume fields contain invalid numbers";

    let open = number(row.open).ok_or(BAD_NUMBERS)?;
    let high = number(row.high).ok_or(BAD_NUMBERS)?;
    let low = number(row.low).ok_or(BAD_NUMBERS)?;
    let close = number(row.close).ok_or(BAD_NUMBERS)?;
    let volume = match row.volume.as_deref().map(str::trim) {
        None | Some("") => 0.0,
        Some(v) => v
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .ok_or(BAD_NUMBERS)?,
    };

    let bar = PriceBar {
        trade_date,
        open,
        high,
        low,
        close,
        volume: volume.round() as u64,
    };
    if !bar.is_sane() {
        return Err("inconsistent OHLC prices");
    }
    Ok((symbol, bar))
}
