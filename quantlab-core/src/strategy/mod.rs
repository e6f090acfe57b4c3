//! Strategies: turn a stream of bars into buy/hold/sell signals.
//!
//! A strategy sees each bar exactly once, in order, and may keep bounded
//! internal state (rolling windows, the last emitted direction). It never sees
//! the engine's cash or position, and it never sees a future bar.

pub mod buy_and_hold;
pub mod ma_crossover;
pub mod scripted;

use crate::domain::{Bar, Signal};
use thiserror::Error;

pub use buy_and_hold::BuyAndHold;
pub use ma_crossover::MaCrossover;
pub use scripted::ScriptedSignals;

/// Trait for signal-producing strategies.
///
/// # Architecture invariant
/// `on_bar` receives only the current bar. Anything a strategy needs from
/// earlier bars it must have kept itself. The engine is swapped between
/// strategies without knowing which one it drives.
pub trait Strategy: Send {
    /// Human-readable identity (e.g., "MA10/30").
    fn name(&self) -> &str;

    /// Consume the next bar and produce this bar's signal.
    fn on_bar(&mut self, bar: &Bar) -> Signal;
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn on_bar(&mut self, bar: &Bar) -> Signal {
        (**self).on_bar(bar)
    }
}

/// Invalid strategy parameters, rejected at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StrategyError {
    #[error("moving-average window lengths must be >= 1 (short={short}, long={long})")]
    ZeroWindow { short: usize, long: usize },

    #[error("short window ({short}) must be strictly less than long window ({long})")]
    WindowOrder { short: usize, long: usize },
}
