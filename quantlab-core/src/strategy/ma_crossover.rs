//! Moving average crossover: emits a signal only when the relation between
//! the short and long trailing averages changes.
//!
//! The relation has three states: above (+1), below (-1) and equal (0).
//! A change into "above" emits Buy, a change into "below" emits Sell, a change
//! into "equal" emits Hold but is still remembered. Staying in the same state
//! emits Hold, so a Buy is never repeated while the short average stays on top.

use crate::domain::{Bar, Signal};
use crate::indicators::Sma;

use super::{Strategy, StrategyError};

/// Short/long simple-moving-average crossover.
///
/// # Parameters
/// - `short_period`: fast window (e.g., 10)
/// - `long_period`: slow window (e.g., 30), strictly greater than `short_period`
#[derive(Debug, Clone)]
pub struct MaCrossover {
    short: Sma,
    long: Sma,
    /// Last relation state seen after warmup: +1, 0 or -1.
    last_state: i8,
    name: String,
}

impl MaCrossover {
    pub fn new(short_period: usize, long_period: usize) -> Result<Self, StrategyError> {
        if short_period == 0 || long_period == 0 {
            return Err(StrategyError::ZeroWindow {
                short: short_period,
                long: long_period,
            });
        }
        if short_period >= long_period {
            return Err(StrategyError::WindowOrder {
                short: short_period,
                long: long_period,
            });
        }

        Ok(Self {
            short: Sma::new(short_period),
            long: Sma::new(long_period),
            last_state: 0,
            name: format!("MA{short_period}/{long_period}"),
        })
    }

}

impl Strategy for MaCrossover {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_bar(&mut self, bar: &Bar) -> Signal {
        let short = self.short.update(bar.close);
        let long = self.long.update(bar.close);

        let (Some(short), Some(long)) = (short, long) else {
            return Signal::Hold;
        };

        let state: i8 = if short > long {
            1
        } else if short < long {
            -1
        } else {
            0
        };

        if state == self.last_state {
            return Signal::Hold;
        }
        self.last_state = state;
        Signal::from_value(state)
    }
}
