//! QuantLab Runner: backtest orchestration, data loading, metrics, reporting.
//!
//! This crate builds on `quantlab-core` to provide:
//! - TOML configuration with validation
//! - CSV bar loading with date-range filtering and dataset hashing
//! - Single-backtest runner and a parallel MA parameter sweep
//! - Performance metrics and report export (JSON, CSV, text)

pub mod config;
pub mod data_loader;
pub mod export;
pub mod metrics;
pub mod report;
pub mod runner;
pub mod sweep;

pub use config::{BacktestConfig, BacktestSection, ConfigError, StrategyConfig};
pub use data_loader::{CsvBarLoader, DateRange, LoadError, LoadedData};
pub use metrics::{Metrics, DEFAULT_PERIODS_PER_YEAR};
pub use report::{BacktestReport, SCHEMA_VERSION};
pub use runner::{run_backtest, run_backtest_from_data, RunError};
pub use sweep::{run_sweep, ParamGrid, SweepEntry};
