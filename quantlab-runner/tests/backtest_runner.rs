//! End-to-end runner tests: TOML config, CSV on disk, report out.

use std::path::Path;

use quantlab_core::engine::EngineError;
use quantlab_runner::config::{BacktestConfig, StrategyConfig};
use quantlab_runner::data_loader::LoadError;
use quantlab_runner::export::{load_artifacts, save_artifacts};
use quantlab_runner::runner::{run_backtest, RunError};

/// 60 trading-day-like bars: a decline, a rally, then a decline again, so a
/// short MA crossover enters and exits at least once.
fn write_fixture(dir: &Path, symbol: &str) {
    let mut csv = String::from("Date,Open,High,Low,Close,Volume\n");
    let base = chrono::NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    for i in 0..60i64 {
        let close = match i {
            0..=19 => 100.0 - i as f64,
            20..=39 => 81.0 + (i - 19) as f64 * 2.0,
            _ => 121.0 - (i - 39) as f64 * 1.5,
        };
        let date = base + chrono::Duration::days(i);
        csv.push_str(&format!(
            "{},{c},{h},{l},{c},1000\n",
            date.format("%Y-%m-%d"),
            c = close,
            h = close + 1.0,
            l = close - 1.0,
        ));
    }
    std::fs::write(dir.join(format!("{symbol}.csv")), csv).unwrap();
}

fn config_for(dir: &Path, body: &str) -> BacktestConfig {
    let toml = format!("data_dir = {:?}\n{body}", dir.display().to_string());
    BacktestConfig::from_toml(&toml).unwrap()
}

#[test]
fn ma_crossover_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "TEST");
    let config = config_for(
        dir.path(),
        r#"
[backtest]
symbol = "TEST"
initial_capital = 10000.0

[strategy]
type = "ma_crossover"
short_window = 3
long_window = 8
"#,
    );

    let report = run_backtest(&config).unwrap();
    assert_eq!(report.symbol, "TEST");
    assert_eq!(report.strategy, "MA3/8");
    assert_eq!(report.bar_count, 60);
    assert_eq!(report.equity_curve.len(), 60);
    assert_eq!(report.start_date, "2023-01-02");
    assert!(!report.trades.is_empty());

    for t in &report.trades {
        let eq = report.equity_curve[t.bar_index];
        assert!((t.equity_after() - eq).abs() < 1e-6 * eq.max(1.0));
    }
    let last = *report.equity_curve.last().unwrap();
    assert!((report.final_equity - last).abs() < 1e-9);
    assert!(report.metrics.max_drawdown >= 0.0 && report.metrics.max_drawdown <= 1.0);
}

#[test]
fn buy_and_hold_tracks_price() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "TEST");
    let config = config_for(
        dir.path(),
        r#"
[backtest]
symbol = "TEST"
initial_capital = 1000.0

[strategy]
type = "buy_and_hold"
"#,
    );

    let report = run_backtest(&config).unwrap();
    assert_eq!(report.trades.len(), 1);
    // Bought at 100 on the first bar; last close is 121 - 20 * 1.5 = 91.
    assert!((report.final_equity - 910.0).abs() < 1e-9);
    assert!((report.total_return + 0.09).abs() < 1e-12);
}

#[test]
fn date_range_limits_bars() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "TEST");
    let config = config_for(
        dir.path(),
        r#"
[backtest]
symbol = "TEST"
start_date = "2023-01-05"
end_date = "2023-01-14"

[strategy]
type = "buy_and_hold"
"#,
    );

    let report = run_backtest(&config).unwrap();
    assert_eq!(report.bar_count, 10);
    assert_eq!(report.start_date, "2023-01-05");
    assert_eq!(report.end_date, "2023-01-14");
}

#[test]
fn range_with_no_bars_is_empty_input() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "TEST");
    let config = config_for(
        dir.path(),
        r#"
[backtest]
symbol = "TEST"
start_date = "2030-01-01"
"#,
    );

    let err = run_backtest(&config).unwrap_err();
    assert!(matches!(err, RunError::Engine(EngineError::EmptyInput)));
}

#[test]
fn missing_symbol_is_data_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), "[backtest]\nsymbol = \"GHOST\"\n");
    let err = run_backtest(&config).unwrap_err();
    assert!(matches!(err, RunError::Data(LoadError::Open { .. })));
}

#[test]
fn inverted_windows_fail_before_loading() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_for(dir.path(), "[backtest]\nsymbol = \"GHOST\"\n");
    config.strategy = StrategyConfig::MaCrossover {
        short_window: 30,
        long_window: 10,
    };
    let err = run_backtest(&config).unwrap_err();
    assert!(matches!(err, RunError::Config(_)));
}

#[test]
fn report_survives_artifact_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "TEST");
    let config = config_for(
        dir.path(),
        "[backtest]\nsymbol = \"TEST\"\n\n[strategy]\ntype = \"ma_crossover\"\nshort_window = 3\nlong_window = 8\n",
    );
    let report = run_backtest(&config).unwrap();

    let out = tempfile::tempdir().unwrap();
    let run_dir = save_artifacts(&report, out.path()).unwrap();
    let name = run_dir.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("TEST_"));

    let equity_csv = std::fs::read_to_string(run_dir.join("equity.csv")).unwrap();
    assert_eq!(equity_csv.lines().count(), 61);
    assert!(equity_csv.starts_with("date,equity\n2023-01-02,"));

    let trades_csv = std::fs::read_to_string(run_dir.join("trades.csv")).unwrap();
    assert_eq!(trades_csv.lines().count(), report.trades.len() + 1);

    let loaded = load_artifacts(&run_dir).unwrap();
    assert_eq!(loaded.trades.len(), report.trades.len());
    for (a, b) in loaded.trades.iter().zip(&report.trades) {
        assert_eq!(a.bar_index, b.bar_index);
        assert_eq!(a.side, b.side);
        assert!((a.quantity - b.quantity).abs() < 1e-9 * b.quantity.max(1.0));
    }
    assert_eq!(loaded.dates, report.dates);
    assert_eq!(loaded.bar_count, report.bar_count);
}

fn workspace_root() -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .to_path_buf()
}

#[test]
fn shipped_example_config_runs_on_demo_data() {
    let root = workspace_root();
    let mut config = BacktestConfig::from_file(&root.join("configs/example.toml")).unwrap();
    config.data_dir = root.join(&config.data_dir);

    let report = run_backtest(&config).unwrap();
    assert_eq!(report.symbol, "DEMO");
    assert_eq!(report.strategy, "MA10/30");
    assert_eq!(report.bar_count, 260);
    assert!(!report.trades.is_empty());
    assert!(report.render_summary().starts_with("=== Summary ===\n"));
}
