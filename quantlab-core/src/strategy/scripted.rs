//! Scripted strategy: replays a fixed signal sequence, one entry per bar.
//!
//! Lets callers drive the engine through an exact set of transitions
//! (tests, what-if replays of an externally computed signal column).

use crate::domain::{Bar, Signal};

use super::Strategy;

#[derive(Debug, Clone)]
pub struct ScriptedSignals {
    signals: Vec<Signal>,
    cursor: usize,
}

impl ScriptedSignals {
    /// Replays `signals` in order; bars past the end of the script get Hold.
    pub fn new(signals: Vec<Signal>) -> Self {
        Self { signals, cursor: 0 }
    }

    /// Build from the signed encoding (+1 / 0 / -1).
    pub fn from_values(values: &[i8]) -> Self {
        Self::new(values.iter().copied().map(Signal::from_value).collect())
    }

    /// Signals Buy at `buy_index`, Sell at `sell_index`, Hold elsewhere.
    pub fn round_trip(len: usize, buy_index: usize, sell_index: usize) -> Self {
        let mut signals = vec![Signal::Hold; len];
        if let Some(s) = signals.get_mut(buy_index) {
            *s = Signal::Buy;
        }
        if let Some(s) = signals.get_mut(sell_index) {
            *s = Signal::Sell;
        }
        Self::new(signals)
    }
}

impl Strategy for ScriptedSignals {
    fn name(&self) -> &str {
        "scripted"
    }

    fn on_bar(&mut self, _bar: &Bar) -> Signal {
        let signal = self.signals.get(self.cursor).copied().unwrap_or_default();
        self.cursor += 1;
        signal
    }
}
