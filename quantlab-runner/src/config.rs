//! Backtest configuration: TOML file, explicit defaults, validation.
//!
//! Configuration is read once at the edge and handed to constructors; nothing
//! below the runner consults global state.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use quantlab_core::strategy::{BuyAndHold, MaCrossover, Strategy, StrategyError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data_loader::DateRange;
use crate::metrics::DEFAULT_PERIODS_PER_YEAR;

/// Default MA crossover windows.
pub const DEFAULT_SHORT_WINDOW: usize = 10;
pub const DEFAULT_LONG_WINDOW: usize = 30;

/// ISO 8601 calendar date format used for every date in config and on the CLI.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors raised while reading or validating configuration.
///
/// All of these are detected before any bar is simulated.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid {field} '{value}': expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },

    #[error("start date {start} is after end date {end}")]
    InvertedDateRange { start: NaiveDate, end: NaiveDate },

    #[error("initial capital must be positive, got {0}")]
    NonPositiveCapital(f64),

    #[error("periods per year must be positive, got {0}")]
    NonPositivePeriods(f64),

    #[error("symbol must not be empty")]
    EmptySymbol,

    #[error("invalid strategy parameters: {0}")]
    Strategy(#[from] StrategyError),
}

/// Full configuration for one backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// Directory containing `{symbol}.csv` files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub backtest: BacktestSection,
    #[serde(default)]
    pub strategy: StrategyConfig,
}

/// The `[backtest]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSection {
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Inclusive lower bound, `YYYY-MM-DD`. Unbounded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Inclusive upper bound, `YYYY-MM-DD`. Unbounded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default = "default_initial_capital")]
    pub initial_capital: f64,
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: f64,
}

/// The `[strategy]` table (serializable enum, tagged by `type`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyConfig {
    /// Short trailing average crosses the long one.
    MaCrossover {
        #[serde(default = "default_short_window")]
        short_window: usize,
        #[serde(default = "default_long_window")]
        long_window: usize,
    },

    /// Buy on the first bar, hold to the end.
    BuyAndHold,
}

fn default_short_window() -> usize {
    DEFAULT_SHORT_WINDOW
}

fn default_long_window() -> usize {
    DEFAULT_LONG_WINDOW
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_symbol() -> String {
    "BTC-USD".to_string()
}

fn default_initial_capital() -> f64 {
    10_000.0
}

fn default_periods_per_year() -> f64 {
    DEFAULT_PERIODS_PER_YEAR
}

impl Default for BacktestSection {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            start_date: None,
            end_date: None,
            initial_capital: default_initial_capital(),
            periods_per_year: default_periods_per_year(),
        }
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig::MaCrossover {
            short_window: DEFAULT_SHORT_WINDOW,
            long_window: DEFAULT_LONG_WINDOW,
        }
    }
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            backtest: BacktestSection::default(),
            strategy: StrategyConfig::default(),
        }
    }
}

impl BacktestConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string. Missing keys take their defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize back to TOML (used by `--print-config` style tooling and tests).
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Parse the optional start/end bounds.
    pub fn date_range(&self) -> Result<DateRange, ConfigError> {
        let start = parse_optional_date("start_date", self.backtest.start_date.as_deref())?;
        let end = parse_optional_date("end_date", self.backtest.end_date.as_deref())?;
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(ConfigError::InvertedDateRange { start, end });
            }
        }
        Ok(DateRange { start, end })
    }

    /// Check every parameter that would otherwise fail mid-run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backtest.symbol.trim().is_empty() {
            return Err(ConfigError::EmptySymbol);
        }
        let capital = self.backtest.initial_capital;
        if !capital.is_finite() || capital <= 0.0 {
            return Err(ConfigError::NonPositiveCapital(capital));
        }
        let ppy = self.backtest.periods_per_year;
        if !ppy.is_finite() || ppy <= 0.0 {
            return Err(ConfigError::NonPositivePeriods(ppy));
        }
        self.date_range()?;
        self.strategy.validate()?;
        Ok(())
    }
}

impl StrategyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            StrategyConfig::MaCrossover {
                short_window,
                long_window,
            } => {
                MaCrossover::new(short_window, long_window)?;
                Ok(())
            }
            StrategyConfig::BuyAndHold => Ok(()),
        }
    }

    /// Build a fresh strategy instance. Each run gets its own.
    pub fn build(&self) -> Result<Box<dyn Strategy>, ConfigError> {
        Ok(match *self {
            StrategyConfig::MaCrossover {
                short_window,
                long_window,
            } => Box::new(MaCrossover::new(short_window, long_window)?),
            StrategyConfig::BuyAndHold => Box::new(BuyAndHold::new()),
        })
    }
}

/// Parse a `YYYY-MM-DD` string.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| ConfigError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

fn parse_optional_date(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<NaiveDate>, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => parse_date(field, v).map(Some),
        _ => Ok(None),
    }
}
