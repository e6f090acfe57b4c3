//! Account state and run result types.

use crate::domain::{Trade, TradeSide};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What the account holds between bars.
///
/// The engine trades all-in/all-out, so the account is always either entirely
/// cash or entirely the asset. Encoding that as two variants makes a partially
/// invested account unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Holdings {
    Flat { cash: f64 },
    Long { quantity: f64 },
}

impl Holdings {
    pub fn cash(&self) -> f64 {
        match *self {
            Holdings::Flat { cash } => cash,
            Holdings::Long { .. } => 0.0,
        }
    }

    pub fn position(&self) -> f64 {
        match *self {
            Holdings::Flat { .. } => 0.0,
            Holdings::Long { quantity } => quantity,
        }
    }

    pub fn is_long(&self) -> bool {
        matches!(self, Holdings::Long { .. })
    }

    /// Marked-to-market value at `price`: cash + position * price.
    pub fn equity(&self, price: f64) -> f64 {
        self.cash() + self.position() * price
    }

    /// Flat → Long: spend all cash at `price`.
    ///
    /// Returns the fill, or `None` if already long.
    pub(crate) fn buy_all(&mut self, date: NaiveDate, bar_index: usize, price: f64) -> Option<Trade> {
        let Holdings::Flat { cash } = *self else {
            return None;
        };
        let quantity = cash / price;
        *self = Holdings::Long { quantity };
        Some(Trade {
            date,
            bar_index,
            side: TradeSide::Buy,
            price,
            quantity,
            cash_after: 0.0,
            position_after: quantity,
        })
    }

    /// Long → Flat: liquidate the whole position at `price`.
    ///
    /// Returns the fill, or `None` if already flat.
    pub(crate) fn sell_all(&mut self, date: NaiveDate, bar_index: usize, price: f64) -> Option<Trade> {
        let Holdings::Long { quantity } = *self else {
            return None;
        };
        let cash = quantity * price;
        *self = Holdings::Flat { cash };
        Some(Trade {
            date,
            bar_index,
            side: TradeSide::Sell,
            price,
            quantity,
            cash_after: cash,
            position_after: 0.0,
        })
    }
}

/// Everything a completed run produces. Outlives the engine that built it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Fills in execution order; empty if the strategy never triggered.
    pub trades: Vec<Trade>,
    /// One marked-to-market value per bar.
    pub equity_curve: Vec<f64>,
    pub final_equity: f64,
    /// Account state after the last bar.
    pub final_holdings: Holdings,
    /// Non-Hold signals received, whether or not they produced a trade.
    pub signal_count: usize,
}
