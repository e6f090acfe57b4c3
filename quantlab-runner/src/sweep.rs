//! Parameter sweep over MA crossover windows.
//!
//! Every grid point is an independent backtest: each worker builds its own
//! `Engine` and `MaCrossover` and only the bar slice is shared.

use std::cmp::Ordering;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use quantlab_core::domain::Bar;
use quantlab_core::strategy::MaCrossover;

use crate::config::ConfigError;
use crate::metrics::Metrics;
use crate::runner::{run_backtest_from_data, RunError};

/// Parameter grid specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamGrid {
    /// MA crossover short periods to test
    pub short_windows: Vec<usize>,

    /// MA crossover long periods to test
    pub long_windows: Vec<usize>,
}

impl ParamGrid {
    pub fn new(short_windows: Vec<usize>, long_windows: Vec<usize>) -> Self {
        Self {
            short_windows,
            long_windows,
        }
    }

    /// Short periods 5, 10, 20; long periods 30, 50, 100.
    pub fn ma_crossover_default() -> Self {
        Self::new(vec![5, 10, 20], vec![30, 50, 100])
    }

    /// Valid (short, long) pairs, ascending. Repeated windows are collapsed;
    /// zero windows and short >= long are skipped.
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        let shorts = sorted_unique(&self.short_windows);
        let longs = sorted_unique(&self.long_windows);

        let mut pairs = Vec::new();
        for &short in &shorts {
            for &long in &longs {
                if short == 0 || short >= long {
                    continue;
                }
                pairs.push((short, long));
            }
        }
        pairs
    }

    /// Number of valid configurations in this grid.
    pub fn size(&self) -> usize {
        self.pairs().len()
    }
}

fn sorted_unique(windows: &[usize]) -> Vec<usize> {
    let mut out = windows.to_vec();
    out.sort_unstable();
    out.dedup();
    out
}

impl Default for ParamGrid {
    fn default() -> Self {
        Self::ma_crossover_default()
    }
}

/// Outcome of one grid point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepEntry {
    pub short_window: usize,
    pub long_window: usize,
    pub final_equity: f64,
    pub total_return: f64,
    pub trade_count: usize,
    pub metrics: Metrics,
}

/// Run every valid grid point over `bars` and rank the results.
///
/// Ranking is by Sharpe ratio (descending), then total return (descending),
/// then window pair (ascending), so the output is identical whether or not
/// the sweep runs in parallel.
pub fn run_sweep(
    bars: &[Bar],
    grid: &ParamGrid,
    initial_capital: f64,
    periods_per_year: f64,
    parallel: bool,
) -> Result<Vec<SweepEntry>, RunError> {
    let pairs = grid.pairs();
    info!(
        configs = pairs.len(),
        bars = bars.len(),
        parallel,
        "starting parameter sweep"
    );

    let run_one = |&(short, long): &(usize, usize)| -> Result<SweepEntry, RunError> {
        let mut strategy = MaCrossover::new(short, long).map_err(ConfigError::from)?;
        let report = run_backtest_from_data(
            "sweep",
            bars,
            &mut strategy,
            initial_capital,
            periods_per_year,
            "",
        )?;
        debug!(short, long, sharpe = report.metrics.sharpe_ratio, "grid point done");
        Ok(SweepEntry {
            short_window: short,
            long_window: long,
            final_equity: report.final_equity,
            total_return: report.total_return,
            trade_count: report.trades.len(),
            metrics: report.metrics,
        })
    };

    let mut entries: Vec<SweepEntry> = if parallel {
        pairs.par_iter().map(run_one).collect::<Result<Vec<_>, _>>()?
    } else {
        pairs.iter().map(run_one).collect::<Result<Vec<_>, _>>()?
    };

    entries.sort_by(rank_order);
    Ok(entries)
}

fn rank_order(a: &SweepEntry, b: &SweepEntry) -> Ordering {
    b.metrics
        .sharpe_ratio
        .total_cmp(&a.metrics.sharpe_ratio)
        .then_with(|| b.total_return.total_cmp(&a.total_return))
        .then_with(|| a.short_window.cmp(&b.short_window))
        .then_with(|| a.long_window.cmp(&b.long_window))
}
