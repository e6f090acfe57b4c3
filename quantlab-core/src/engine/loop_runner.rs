//! Bar-by-bar simulation loop.
//!
//! Per bar:
//! 1. Ask the strategy for a signal (it sees only this bar)
//! 2. Apply the Flat/Long transition at the bar's close
//! 3. Mark to market and append to the equity curve

use crate::domain::{Bar, Signal};
use crate::strategy::Strategy;
use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info};

use super::state::{Holdings, RunResult};

/// Errors that abort a run before any result is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("initial capital must be a positive finite number, got {0}")]
    NonPositiveCapital(f64),

    #[error("no bars to simulate")]
    EmptyInput,

    #[error("bar {index} ({date}) has unusable close price {close}")]
    InvalidClose {
        index: usize,
        date: NaiveDate,
        close: f64,
    },
}

/// All-in/all-out market-on-close simulator.
///
/// `run` consumes the engine: a second backtest needs a fresh `Engine`, so no
/// cash or position can leak from one run into the next.
#[derive(Debug, Clone)]
pub struct Engine {
    initial_cash: f64,
}

impl Engine {
    pub fn new(initial_cash: f64) -> Result<Self, EngineError> {
        if !initial_cash.is_finite() || initial_cash <= 0.0 {
            return Err(EngineError::NonPositiveCapital(initial_cash));
        }
        Ok(Self { initial_cash })
    }

    /// Simulate `strategy` over `bars`.
    ///
    /// Every bar is validated before the strategy sees the first one, so an
    /// error never leaves a half-run strategy or a partial trade log behind.
    pub fn run<S>(self, bars: &[Bar], strategy: &mut S) -> Result<RunResult, EngineError>
    where
        S: Strategy + ?Sized,
    {
        if bars.is_empty() {
            return Err(EngineError::EmptyInput);
        }
        if let Some((index, bar)) = bars
            .iter()
            .enumerate()
            .find(|(_, b)| !b.has_tradable_close())
        {
            return Err(EngineError::InvalidClose {
                index,
                date: bar.date,
                close: bar.close,
            });
        }

        let mut holdings = Holdings::Flat {
            cash: self.initial_cash,
        };
        let mut trades = Vec::new();
        let mut equity_curve = Vec::with_capacity(bars.len());
        let mut signal_count = 0;

        for (t, bar) in bars.iter().enumerate() {
            let signal = strategy.on_bar(bar);
            if !signal.is_hold() {
                signal_count += 1;
            }

            let price = bar.close;
            let fill = match signal {
                Signal::Buy => holdings.buy_all(bar.date, t, price),
                Signal::Sell => holdings.sell_all(bar.date, t, price),
                Signal::Hold => None,
            };
            if let Some(trade) = fill {
                debug!(
                    date = %trade.date,
                    side = %trade.side,
                    price = trade.price,
                    quantity = trade.quantity,
                    cash_after = trade.cash_after,
                    "fill"
                );
                trades.push(trade);
            }

            equity_curve.push(holdings.equity(price));
        }

        let final_equity = equity_curve.last().copied().unwrap_or(self.initial_cash);
        info!(
            strategy = strategy.name(),
            bars = bars.len(),
            trades = trades.len(),
            final_equity,
            "backtest complete"
        );

        Ok(RunResult {
            trades,
            equity_curve,
            final_equity,
            final_holdings: holdings,
            signal_count,
        })
    }
}
