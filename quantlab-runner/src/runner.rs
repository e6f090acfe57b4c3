//! Backtest runner: wires together config, data, engine, and metrics.
//!
//! Two entry points:
//! - `run_backtest()`: validates config, loads the CSV, then runs. Used by the CLI.
//! - `run_backtest_from_data()`: takes pre-loaded bars and a built strategy. Used by
//!   the sweep, which shares one bar slice across many runs.

use thiserror::Error;
use tracing::debug;

use quantlab_core::domain::Bar;
use quantlab_core::engine::{Engine, EngineError};
use quantlab_core::strategy::Strategy;

use crate::config::{BacktestConfig, ConfigError};
use crate::data_loader::{CsvBarLoader, LoadError};
use crate::metrics::{total_return, Metrics};
use crate::report::{BacktestReport, SCHEMA_VERSION};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}

/// Run a single backtest from a `BacktestConfig` (loads data from disk).
///
/// Configuration is validated before any file is opened.
pub fn run_backtest(config: &BacktestConfig) -> Result<BacktestReport, RunError> {
    config.validate()?;
    let range = config.date_range()?;
    let mut strategy = config.strategy.build()?;

    let loader = CsvBarLoader::new(config.data_dir.clone());
    let loaded = loader.load(&config.backtest.symbol, range)?;

    run_backtest_from_data(
        &loaded.symbol,
        &loaded.bars,
        strategy.as_mut(),
        config.backtest.initial_capital,
        config.backtest.periods_per_year,
        &loaded.dataset_hash,
    )
}

/// Run a backtest with pre-loaded bars. No I/O.
pub fn run_backtest_from_data<S>(
    symbol: &str,
    bars: &[Bar],
    strategy: &mut S,
    initial_capital: f64,
    periods_per_year: f64,
    dataset_hash: &str,
) -> Result<BacktestReport, RunError>
where
    S: Strategy + ?Sized,
{
    let strategy_name = strategy.name().to_string();
    let result = Engine::new(initial_capital)?.run(bars, strategy)?;
    let metrics = Metrics::compute(&result.equity_curve, periods_per_year);

    let start_date = bars.first().map(|b| b.date.to_string()).unwrap_or_default();
    let end_date = bars.last().map(|b| b.date.to_string()).unwrap_or_default();

    debug!(
        symbol,
        strategy = %strategy_name,
        trades = result.trades.len(),
        final_equity = result.final_equity,
        sharpe = metrics.sharpe_ratio,
        "report assembled"
    );

    Ok(BacktestReport {
        schema_version: SCHEMA_VERSION,
        symbol: symbol.to_string(),
        strategy: strategy_name,
        start_date,
        end_date,
        bar_count: bars.len(),
        initial_capital,
        final_equity: result.final_equity,
        total_return: total_return(initial_capital, result.final_equity),
        periods_per_year,
        metrics,
        signal_count: result.signal_count,
        trades: result.trades,
        dates: bars.iter().map(|b| b.date).collect(),
        equity_curve: result.equity_curve,
        dataset_hash: dataset_hash.to_string(),
    })
}
