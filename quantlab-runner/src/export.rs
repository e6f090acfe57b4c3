//! Report export: JSON, CSV, and plain-text artifact generation.
//!
//! All persisted artifacts include a `schema_version` field. Newer versions
//! are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use quantlab_core::domain::Trade;

use crate::report::{BacktestReport, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `BacktestReport` to pretty JSON.
pub fn export_json(report: &BacktestReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize BacktestReport to JSON")
}

/// Deserialize a `BacktestReport` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<BacktestReport> {
    let report: BacktestReport =
        serde_json::from_str(json).context("failed to deserialize BacktestReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export the trade log as CSV.
///
/// Columns: date, bar_index, side, quantity, price, cash_after, position_after
pub fn export_trades_csv(trades: &[Trade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "date",
        "bar_index",
        "side",
        "quantity",
        "price",
        "cash_after",
        "position_after",
    ])?;

    for t in trades {
        wtr.write_record([
            &t.date.to_string(),
            &t.bar_index.to_string(),
            &t.side.to_string(),
            &format!("{:.6}", t.quantity),
            &format!("{:.6}", t.price),
            &format!("{:.2}", t.cash_after),
            &format!("{:.6}", t.position_after),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export an equity curve as CSV with date and equity columns.
///
/// `dates` and `equity_curve` must be aligned bar-for-bar.
pub fn export_equity_csv(dates: &[NaiveDate], equity_curve: &[f64]) -> Result<String> {
    if dates.len() != equity_curve.len() {
        bail!(
            "equity curve has {} points but {} dates",
            equity_curve.len(),
            dates.len()
        );
    }
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "equity"])?;
    for (date, eq) in dates.iter().zip(equity_curve) {
        wtr.write_record([&date.to_string(), &format!("{:.2}", eq)])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for a single backtest run.
///
/// Creates a directory named `{symbol}_{timestamp}/` under `output_dir`
/// containing:
/// - `report.json`: the full `BacktestReport`
/// - `trades.csv`: trade log
/// - `equity.csv`: bar-by-bar equity curve
/// - `summary.txt`: the text summary
///
/// Returns the path to the created directory.
pub fn save_artifacts(report: &BacktestReport, output_dir: &Path) -> Result<PathBuf> {
    let dirname = format!(
        "{}_{}",
        report.symbol,
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let run_dir = output_dir.join(dirname);
    write_artifacts(report, &run_dir)?;
    Ok(run_dir)
}

/// Write the artifact set into an explicit directory (created if missing).
pub fn write_artifacts(report: &BacktestReport, run_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    std::fs::write(run_dir.join("report.json"), export_json(report)?)?;
    std::fs::write(run_dir.join("trades.csv"), export_trades_csv(&report.trades)?)?;
    std::fs::write(
        run_dir.join("equity.csv"),
        export_equity_csv(&report.dates, &report.equity_curve)?,
    )?;
    std::fs::write(run_dir.join("summary.txt"), report.render_summary())?;
    Ok(())
}

/// Load a `BacktestReport` from an artifact directory's report.json.
///
/// Rejects unknown schema versions.
pub fn load_artifacts(dir: &Path) -> Result<BacktestReport> {
    let path = dir.join("report.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}
