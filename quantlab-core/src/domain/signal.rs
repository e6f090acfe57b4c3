//! Signal: a strategy's per-bar instruction to the engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Buy (+1), Hold (0) or Sell (-1).
///
/// One signal is produced per bar. The engine keeps no signal history; any
/// memory lives inside the strategy that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Buy,
    #[default]
    Hold,
    Sell,
}

impl Signal {
    /// Signed integer encoding: +1 buy, 0 hold, -1 sell.
    pub fn value(self) -> i8 {
        match self {
            Signal::Buy => 1,
            Signal::Hold => 0,
            Signal::Sell => -1,
        }
    }

    /// Inverse of [`Signal::value`]: positive → Buy, negative → Sell, zero → Hold.
    pub fn from_value(value: i8) -> Self {
        match value.signum() {
            1 => Signal::Buy,
            -1 => Signal::Sell,
            _ => Signal::Hold,
        }
    }

    pub fn is_hold(self) -> bool {
        self == Signal::Hold
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Signal::Buy => "BUY",
            Signal::Hold => "HOLD",
            Signal::Sell => "SELL",
        };
        f.write_str(s)
    }
}
