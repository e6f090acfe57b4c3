//! Buy-and-hold baseline: buy on the first bar, never sell.

use crate::domain::{Bar, Signal};

use super::Strategy;

#[derive(Debug, Clone, Default)]
pub struct BuyAndHold {
    bought: bool,
}

impl BuyAndHold {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Strategy for BuyAndHold {
    fn name(&self) -> &str {
        "buy_and_hold"
    }

    fn on_bar(&mut self, _bar: &Bar) -> Signal {
        if self.bought {
            Signal::Hold
        } else {
            self.bought = true;
            Signal::Buy
        }
    }
}
