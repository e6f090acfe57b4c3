//! QuantLab CLI: run and sweep commands.
//!
//! Commands:
//! - `run`: execute one backtest from a TOML config file and/or flags
//! - `sweep`: run an MA crossover window grid and print a ranked table
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `info`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use quantlab_runner::config::{
    parse_date, StrategyConfig, DEFAULT_LONG_WINDOW, DEFAULT_SHORT_WINDOW,
};
use quantlab_runner::data_loader::CsvBarLoader;
use quantlab_runner::export::{export_json, save_artifacts};
use quantlab_runner::runner::run_backtest;
use quantlab_runner::sweep::{run_sweep, ParamGrid, SweepEntry};
use quantlab_runner::BacktestConfig;

#[derive(Parser)]
#[command(
    name = "quantlab",
    about = "QuantLab CLI: single-asset long-only backtesting engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a backtest from a TOML config file, flags, or both.
    Run {
        #[command(flatten)]
        common: CommonArgs,

        /// Short moving-average window.
        #[arg(long)]
        ma_fast: Option<usize>,

        /// Long moving-average window.
        #[arg(long)]
        ma_slow: Option<usize>,

        /// Save report.json, trades.csv and equity.csv under this directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Print the report as JSON instead of the text summary.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Sweep MA crossover windows and rank the results by Sharpe ratio.
    Sweep {
        #[command(flatten)]
        common: CommonArgs,

        /// Short windows to test (comma separated).
        #[arg(long, value_delimiter = ',', default_values_t = [5usize, 10, 20])]
        fast: Vec<usize>,

        /// Long windows to test (comma separated).
        #[arg(long, value_delimiter = ',', default_values_t = [30usize, 50, 100])]
        slow: Vec<usize>,

        /// Number of ranked rows to print.
        #[arg(long, default_value_t = 10)]
        top: usize,

        /// Run grid points one after another instead of in parallel.
        #[arg(long, default_value_t = false)]
        sequential: bool,

        /// Print the ranked entries as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

/// Flags shared by every command. Each one overrides the config file value.
#[derive(Args, Debug, Default)]
struct CommonArgs {
    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory containing `{SYMBOL}.csv` files.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Symbol to backtest.
    #[arg(long)]
    symbol: Option<String>,

    /// Start date (YYYY-MM-DD), inclusive.
    #[arg(long)]
    start: Option<String>,

    /// End date (YYYY-MM-DD), inclusive.
    #[arg(long)]
    end: Option<String>,

    /// Initial capital.
    #[arg(long)]
    initial: Option<f64>,

    /// Periods per year used to annualize metrics.
    #[arg(long)]
    periods_per_year: Option<f64>,
}

impl CommonArgs {
    /// Load the config file (or defaults) and apply flag overrides.
    fn resolve(&self) -> Result<BacktestConfig> {
        let mut config = match &self.config {
            Some(path) => BacktestConfig::from_file(path)?,
            None => BacktestConfig::default(),
        };
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(symbol) = &self.symbol {
            config.backtest.symbol = symbol.clone();
        }
        if let Some(start) = &self.start {
            parse_date("start_date", start)?;
            config.backtest.start_date = Some(start.clone());
        }
        if let Some(end) = &self.end {
            parse_date("end_date", end)?;
            config.backtest.end_date = Some(end.clone());
        }
        if let Some(initial) = self.initial {
            config.backtest.initial_capital = initial;
        }
        if let Some(ppy) = self.periods_per_year {
            config.backtest.periods_per_year = ppy;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            common,
            ma_fast,
            ma_slow,
            output_dir,
            json,
        } => run_cmd(&common, ma_fast, ma_slow, output_dir, json),
        Commands::Sweep {
            common,
            fast,
            slow,
            top,
            sequential,
            json,
        } => sweep_cmd(&common, fast, slow, top, !sequential, json),
    }
}

fn run_cmd(
    common: &CommonArgs,
    ma_fast: Option<usize>,
    ma_slow: Option<usize>,
    output_dir: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let mut config = common.resolve()?;
    config.strategy = apply_window_overrides(&config.strategy, ma_fast, ma_slow);

    let report = run_backtest(&config)?;

    if json {
        println!("{}", export_json(&report)?);
    } else {
        print!("{}", report.render_summary());
    }

    if let Some(dir) = output_dir {
        let run_dir = save_artifacts(&report, &dir)?;
        info!(path = %run_dir.display(), "artifacts saved");
    }

    Ok(())
}

/// `--ma-fast`/`--ma-slow` select the MA crossover, keeping any window the
/// flags leave out.
fn apply_window_overrides(
    current: &StrategyConfig,
    ma_fast: Option<usize>,
    ma_slow: Option<usize>,
) -> StrategyConfig {
    if ma_fast.is_none() && ma_slow.is_none() {
        return current.clone();
    }
    let (short, long) = match *current {
        StrategyConfig::MaCrossover {
            short_window,
            long_window,
        } => (short_window, long_window),
        StrategyConfig::BuyAndHold => (DEFAULT_SHORT_WINDOW, DEFAULT_LONG_WINDOW),
    };
    StrategyConfig::MaCrossover {
        short_window: ma_fast.unwrap_or(short),
        long_window: ma_slow.unwrap_or(long),
    }
}

fn sweep_cmd(
    common: &CommonArgs,
    fast: Vec<usize>,
    slow: Vec<usize>,
    top: usize,
    parallel: bool,
    json: bool,
) -> Result<()> {
    let config = common.resolve()?;
    config.validate()?;

    let loader = CsvBarLoader::new(config.data_dir.clone());
    let loaded = loader.load(&config.backtest.symbol, config.date_range()?)?;

    let grid = ParamGrid::new(fast, slow);
    let entries = run_sweep(
        &loaded.bars,
        &grid,
        config.backtest.initial_capital,
        config.backtest.periods_per_year,
        parallel,
    )
    .with_context(|| format!("sweep over {} failed", loaded.symbol))?;

    let shown = &entries[..top.min(entries.len())];
    if json {
        println!("{}", serde_json::to_string_pretty(shown)?);
    } else {
        print_sweep_table(&loaded.symbol, loaded.bars.len(), shown);
    }
    Ok(())
}

fn print_sweep_table(symbol: &str, bar_count: usize, entries: &[SweepEntry]) {
    println!("Sweep: {symbol} ({bar_count} bars)");
    println!(
        "{:>4} {:>6} {:>6} {:>8} {:>10} {:>10} {:>8} {:>7}",
        "Rank", "Fast", "Slow", "Sharpe", "Return %", "MaxDD %", "Vol %", "Trades"
    );
    println!("{}", "-".repeat(66));
    for (i, e) in entries.iter().enumerate() {
        println!(
            "{:>4} {:>6} {:>6} {:>8.3} {:>10.2} {:>10.2} {:>8.2} {:>7}",
            i + 1,
            e.short_window,
            e.long_window,
            e.metrics.sharpe_ratio,
            e.total_return * 100.0,
            e.metrics.max_drawdown * 100.0,
            e.metrics.annualized_volatility * 100.0,
            e.trade_count,
        );
    }
}
