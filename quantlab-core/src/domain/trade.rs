//! Trade: a single executed fill in the engine's trade log.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of an executed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSide::Buy => f.write_str("BUY"),
            TradeSide::Sell => f.write_str("SELL"),
        }
    }
}

/// An all-in or all-out fill at a bar's close.
///
/// Records the account state right after the fill so every entry can be
/// reconciled against the equity curve: `cash_after + position_after * price`
/// equals the equity of the bar it was executed on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub date: NaiveDate,
    /// Index of the bar the fill happened on.
    pub bar_index: usize,
    pub side: TradeSide,
    pub price: f64,
    pub quantity: f64,
    pub cash_after: f64,
    pub position_after: f64,
}

impl Trade {
    /// Account value immediately after the fill.
    pub fn equity_after(&self) -> f64 {
        self.cash_after + self.position_after * self.price
    }
}
