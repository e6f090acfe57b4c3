//! Performance metrics: pure functions over a completed equity curve.
//!
//! Every metric is a pure function: equity curve in, scalar out. No shared
//! state, so independent curves can be scored concurrently.

use serde::{Deserialize, Serialize};

/// Trading days per year for daily bars.
pub const DEFAULT_PERIODS_PER_YEAR: f64 = 252.0;

/// Risk/return summary of one equity curve.
///
/// A curve with fewer than two points has no returns; every field is then 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// `(1 + mean periodic return)^periods_per_year - 1`.
    pub annualized_return: f64,
    /// Population std-dev of periodic returns scaled by `sqrt(periods_per_year)`.
    pub annualized_volatility: f64,
    /// `annualized_return / annualized_volatility`, 0 when volatility is 0.
    pub sharpe_ratio: f64,
    /// Largest peak-to-trough decline as a positive fraction (0.15 = 15%).
    pub max_drawdown: f64,
}

impl Metrics {
    /// Compute all metrics from an equity curve.
    pub fn compute(equity_curve: &[f64], periods_per_year: f64) -> Self {
        if equity_curve.len() < 2 {
            return Self::default();
        }

        let returns = simple_returns(equity_curve);
        let mean = mean(&returns);
        let std = population_std_dev(&returns);

        let annualized_return = (1.0 + mean).powf(periods_per_year) - 1.0;
        let annualized_volatility = std * periods_per_year.sqrt();
        let sharpe_ratio = if annualized_volatility > 0.0 {
            annualized_return / annualized_volatility
        } else {
            0.0
        };

        Self {
            annualized_return,
            annualized_volatility,
            sharpe_ratio,
            max_drawdown: max_drawdown(equity_curve),
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Per-period simple returns: `r_i = e[i] / e[i-1] - 1`.
///
/// A non-positive previous value yields 0 rather than inf/NaN.
pub fn simple_returns(equity_curve: &[f64]) -> Vec<f64> {
    equity_curve
        .windows(2)
        .map(|w| if w[0] > 0.0 { w[1] / w[0] - 1.0 } else { 0.0 })
        .collect()
}

/// Arithmetic mean, 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by `n`, not `n - 1`).
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Maximum drawdown as a positive fraction of the running peak.
///
/// 0 for a non-decreasing curve. Points whose running peak is non-positive
/// are skipped.
pub fn max_drawdown(equity_curve: &[f64]) -> f64 {
    let Some(&first) = equity_curve.first() else {
        return 0.0;
    };
    let mut peak = first;
    let mut max_dd = 0.0_f64;

    for &eq in equity_curve {
        if eq > peak {
            peak = eq;
        }
        if peak > 0.0 {
            let dd = (peak - eq) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Total return as a fraction: (final - initial) / initial.
pub fn total_return(initial: f64, final_equity: f64) -> f64 {
    if initial <= 0.0 {
        return 0.0;
    }
    (final_equity - initial) / initial
}
