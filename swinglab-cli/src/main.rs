//! SwingLab CLI: swing-entry analysis over daily bars.
//!
//! Commands:
//! - `analyze`: signals that fired for one ticker within a date range
//! - `evaluate`: point evaluation of one ticker on one date, with reasons
//! - `scan`: fleet scan of every tracked ticker on one date
//! - `daily`: ranked daily swing candidates on one date
//! - `demo`: fleet scan over seeded synthetic bars, no input files needed
//!
//! Bars come from a CSV file (`--bars`) or from the synthetic generator
//! (`--synthetic SPY,QQQ --seed 7`). Results are printed to stdout as JSON.

mod logging;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use swinglab_core::config::{ConfigOverrides, Preset, SwingRequest};
use swinglab_core::daily::{
    DailyParams, DailyScanOptions, DAILY_LOOKBACK_CALENDAR_DAYS, DEFAULT_TOP_N,
};
use swinglab_core::data::{import_csv_path, synthetic_bars, synthetic_store, SyntheticSpec};
use swinglab_core::domain::TradeDate;
use swinglab_core::scanner::{Parallelism, ScanOptions, ScanReport};
use swinglab_core::service::SwingService;
use swinglab_core::store::MemoryStore;

#[derive(Parser)]
#[command(
    name = "swinglab",
    about = "SwingLab CLI: swing-entry signal detection over daily bars"
)]
struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the signals that fired for one ticker between two dates.
    Analyze {
        symbol: String,

        /// First date (YYYY-MM-DD or YYYYMMDD), inclusive.
        #[arg(long)]
        from: TradeDate,

        /// Last date, inclusive.
        #[arg(long)]
        to: TradeDate,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Explain whether one ticker passes on one date.
    Evaluate {
        symbol: String,

        #[arg(long)]
        date: TradeDate,

        /// Also report the checks that passed.
        #[arg(long, default_value_t = false)]
        verbose: bool,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Scan every tracked ticker on one date.
    Scan {
        #[arg(long)]
        date: TradeDate,

        /// Include rejected and failed tickers in the output.
        #[arg(long, default_value_t = false)]
        verbose: bool,

        /// Worker threads. Omit for a sequential scan.
        #[arg(long)]
        threads: Option<usize>,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Rank tracked tickers by daily swing score on one date.
    Daily {
        #[arg(long)]
        date: TradeDate,

        /// Keep this many of the best-scoring tickers.
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top: usize,

        /// Score floor, 0 to 1.
        #[arg(long, default_value_t = 0.6)]
        min_score: f64,

        /// Floor on the 40-session median of close x volume.
        #[arg(long, default_value_t = 2_000_000.0)]
        min_dollar_volume: f64,

        /// Calendar days of history per ticker.
        #[arg(long, default_value_t = DAILY_LOOKBACK_CALENDAR_DAYS)]
        lookback_days: i64,

        #[arg(long)]
        threads: Option<usize>,

        #[command(flatten)]
        source: SourceArgs,
    },
    /// Scan synthetic tickers on their last generated date.
    Demo {
        /// Symbols to generate.
        #[arg(long, value_delimiter = ',', default_value = "SPY,QQQ,IWM,DIA,XLK,XLF")]
        symbols: Vec<String>,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Weekday bars per symbol.
        #[arg(long, default_value_t = 400)]
        bars: usize,

        #[arg(long, default_value_t = false)]
        verbose: bool,

        #[command(flatten)]
        config: ConfigArgs,
    },
}

/// Where bars come from.
#[derive(Args, Debug, Clone)]
struct SourceArgs {
    /// CSV with `ticker,tradeDate,open,high,low,close,volume` rows.
    #[arg(long, conflicts_with = "synthetic")]
    bars: Option<PathBuf>,

    /// Generate bars for these symbols instead of reading a file.
    #[arg(long, value_delimiter = ',')]
    synthetic: Vec<String>,

    /// Seed for `--synthetic`.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Preset and overrides for one command.
#[derive(Args, Debug, Clone, Default)]
struct ConfigArgs {
    /// Named preset: manual, aggressive, balanced, conservative, debug.
    #[arg(long, conflicts_with = "config")]
    preset: Option<Preset>,

    /// Caller overrides as JSON, e.g. '{"rsi_min":50}'.
    #[arg(long)]
    overrides: Option<String>,

    /// TOML request file with `preset` and an `[overrides]` table.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_json);

    match cli.command {
        Commands::Analyze {
            symbol,
            from,
            to,
            source,
            config,
        } => run_analyze(&symbol, from, to, &source, &config),
        Commands::Evaluate {
            symbol,
            date,
            verbose,
            source,
            config,
        } => run_evaluate(&symbol, date, verbose, &source, &config),
        Commands::Scan {
            date,
            verbose,
            threads,
            source,
            config,
        } => run_scan(date, verbose, threads, &source, &config),
        Commands::Daily {
            date,
            top,
            min_score,
            min_dollar_volume,
            lookback_days,
            threads,
            source,
        } => {
            let params = DailyParams {
                min_median_dollar_volume: min_dollar_volume,
                min_daily_score: min_score,
            };
            let options = DailyScanOptions {
                lookback_calendar_days: lookback_days,
                top_n: top,
                parallelism: parallelism(threads)?,
            };
            run_daily(date, &params, options, &source)
        }
        Commands::Demo {
            symbols,
            seed,
            bars,
            verbose,
            config,
        } => run_demo(&symbols, seed, bars, verbose, &config),
    }
}

// ── Commands ─────────────────────────────────────────────────────────

fn run_analyze(
    symbol: &str,
    from: TradeDate,
    to: TradeDate,
    source: &SourceArgs,
    config: &ConfigArgs,
) -> Result<()> {
    if from > to {
        bail!("--from {from} is after --to {to}");
    }
    let (preset, overrides) = config.load()?;
    let service = SwingService::new(load_store(source)?);
    let signals = service.analyze_swing(symbol, from, to, preset, Some(&overrides))?;
    info!(symbol, %preset, signals = signals.len(), "analyze finished");
    print_json(&signals)
}

fn run_evaluate(
    symbol: &str,
    date: TradeDate,
    verbose: bool,
    source: &SourceArgs,
    config: &ConfigArgs,
) -> Result<()> {
    let (preset, overrides) = config.load()?;
    let service = SwingService::new(load_store(source)?);
    let result = service.evaluate_ticker_for_date(symbol, date, preset, Some(&overrides), verbose)?;
    print_json(&result)
}

fn run_scan(
    date: TradeDate,
    verbose: bool,
    threads: Option<usize>,
    source: &SourceArgs,
    config: &ConfigArgs,
) -> Result<()> {
    let (preset, overrides) = config.load()?;
    let service = SwingService::new(load_store(source)?);
    let options = ScanOptions {
        verbose,
        parallelism: parallelism(threads)?,
    };
    let report = service.scan_tickers_for_date(date, preset, Some(&overrides), options)?;
    log_passes(&report);
    print_json(&report)
}

fn run_daily(
    date: TradeDate,
    params: &DailyParams,
    options: DailyScanOptions,
    source: &SourceArgs,
) -> Result<()> {
    if options.lookback_calendar_days < 1 {
        bail!("--lookback-days must be at least 1");
    }
    let service = SwingService::new(load_store(source)?);
    let report = service.daily_scan_for_date(date, params, options)?;
    for pick in &report.picks {
        info!(
            symbol = %pick.candidate.symbol,
            score = pick.candidate.daily_score,
            entry = pick.candidate.pivot_high,
            stop = pick.candidate.stop_suggestion,
            "daily pick"
        );
    }
    print_json(&report)
}

fn run_demo(
    symbols: &[String],
    seed: u64,
    bars: usize,
    verbose: bool,
    config: &ConfigArgs,
) -> Result<()> {
    if symbols.is_empty() {
        bail!("--symbols must name at least one ticker");
    }
    let (preset, overrides) = config.load()?;
    let spec = SyntheticSpec {
        bars,
        ..SyntheticSpec::default()
    };
    let Some(last) = synthetic_bars(&symbols[0], seed, &spec).last().map(|b| b.trade_date) else {
        bail!("--bars must be at least 1");
    };

    let refs: Vec<&str> = symbols.iter().map(String::as_str).collect();
    let service = SwingService::new(synthetic_store(&refs, seed, &spec));
    info!(tickers = refs.len(), seed, date = %last, %preset, "demo scan");

    let options = ScanOptions {
        verbose,
        parallelism: Parallelism::Sequential,
    };
    let report = service.scan_tickers_for_date(last, preset, Some(&overrides), options)?;
    log_passes(&report);
    print_json(&report)
}

// ── Helpers ──────────────────────────────────────────────────────────

impl ConfigArgs {
    /// Resolve the preset and caller overrides.
    ///
    /// `--config` supplies both; `--overrides` fields are applied on top of
    /// the file's `[overrides]` table. Validation happens in the core.
    fn load(&self) -> Result<(Preset, ConfigOverrides)> {
        let mut request = match &self.config {
            Some(path) => read_request(path)?,
            None => SwingRequest {
                preset: self.preset.unwrap_or_default(),
                overrides: ConfigOverrides::default(),
            },
        };

        if let Some(json) = &self.overrides {
            let extra = ConfigOverrides::from_json_str(json)
                .context("--overrides is not a valid overrides object")?;
            request.overrides = extra.apply_over(&request.overrides);
        }

        Ok((request.preset, request.overrides))
    }
}

fn read_request(path: &Path) -> Result<SwingRequest> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read config file {}", path.display()))?;
    SwingRequest::from_toml_str(&text)
        .with_context(|| format!("invalid config file {}", path.display()))
}

fn load_store(source: &SourceArgs) -> Result<MemoryStore> {
    if let Some(path) = &source.bars {
        let mut store = MemoryStore::new();
        let summary = import_csv_path(path, &mut store)
            .with_context(|| format!("cannot import bars from {}", path.display()))?;
        for row in &summary.invalid {
            warn!(line = row.line, reason = %row.reason, "skipped csv row");
        }
        if summary.imported == 0 {
            bail!("{} contains no usable bars", path.display());
        }
        info!(
            path = %path.display(),
            tickers = store.ticker_count(),
            bars = summary.imported,
            "bars imported"
        );
        return Ok(store);
    }

    if source.synthetic.is_empty() {
        bail!("one of --bars or --synthetic is required");
    }
    let refs: Vec<&str> = source.synthetic.iter().map(String::as_str).collect();
    Ok(synthetic_store(&refs, source.seed, &SyntheticSpec::default()))
}

fn log_passes(report: &ScanReport) {
    for outcome in report.passed() {
        info!(symbol = outcome.symbol(), date = %report.date, "entry signal");
    }
}

fn parallelism(threads: Option<usize>) -> Result<Parallelism> {
    match threads {
        None => Ok(Parallelism::Sequential),
        Some(0) => bail!("--threads must be at least 1"),
        Some(n) => Ok(Parallelism::Threads(n)),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("cannot serialize output")?;
    println!("{text}");
    Ok(())
}
