//! Backtest report: engine output plus metrics, ready to print or persist.

use std::fmt::Write as _;

use chrono::NaiveDate;
use quantlab_core::domain::Trade;
use serde::{Deserialize, Serialize};

use crate::metrics::Metrics;

/// Current schema version for persisted reports.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result of a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub symbol: String,
    /// Strategy identity, e.g. "MA10/30".
    pub strategy: String,
    pub start_date: String,
    pub end_date: String,
    pub bar_count: usize,
    pub initial_capital: f64,
    pub final_equity: f64,
    /// (final - initial) / initial, as a fraction.
    pub total_return: f64,
    pub periods_per_year: f64,
    pub metrics: Metrics,
    /// Non-Hold signals the strategy emitted.
    pub signal_count: usize,
    pub trades: Vec<Trade>,
    /// Bar dates, aligned index-for-index with `equity_curve`.
    pub dates: Vec<NaiveDate>,
    pub equity_curve: Vec<f64>,
    pub dataset_hash: String,
}

/// Default schema version for serde deserialization of older JSON without the field.
fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl BacktestReport {
    /// Human-readable summary followed by the trade log.
    pub fn render_summary(&self) -> String {
        let m = &self.metrics;
        let mut out = String::with_capacity(512 + self.trades.len() * 64);

        // Writing to a String cannot fail.
        let _ = writeln!(out, "=== Summary ===");
        let _ = writeln!(out, "Symbol: {}", self.symbol);
        let _ = writeln!(out, "Strategy: {}", self.strategy);
        let _ = writeln!(out, "Period: {} to {}", self.start_date, self.end_date);
        let _ = writeln!(out, "Bars: {}", self.bar_count);
        let _ = writeln!(out, "Initial capital: {:.2}", self.initial_capital);
        let _ = writeln!(out, "Final equity: {:.2}", self.final_equity);
        let _ = writeln!(out, "Total return: {:.2}%", self.total_return * 100.0);
        let _ = writeln!(out, "Max Drawdown: {:.2}%", m.max_drawdown * 100.0);
        let _ = writeln!(out, "Annualized Return: {:.2}%", m.annualized_return * 100.0);
        let _ = writeln!(
            out,
            "Annualized Volatility: {:.2}%",
            m.annualized_volatility * 100.0
        );
        let _ = writeln!(out, "Sharpe: {:.3}", m.sharpe_ratio);
        let _ = writeln!(out, "Trades:");
        for t in &self.trades {
            let _ = writeln!(out, "{}", format_trade_line(t));
        }
        out
    }
}

/// One trade-log line: `YYYY-MM-DD SIDE qty=... price=... cash=...`.
pub fn format_trade_line(t: &Trade) -> String {
    format!(
        "{} {} qty={:.4} price={:.2} cash={:.2}",
        t.date.format("%Y-%m-%d"),
        t.side,
        t.quantity,
        t.price,
        t.cash_after
    )
}
