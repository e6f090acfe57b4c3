//! Integration tests for the runner's data pipeline.
//!
//! Each test writes its own CSV fixture into a temp directory and loads it
//! through `CsvBarLoader`.

use std::path::Path;

use chrono::NaiveDate;
use quantlab_runner::data_loader::{CsvBarLoader, DateRange, LoadError};

const SAMPLE: &str = "\
Date,Open,High,Low,Close,Volume
2024-01-02,100,101,99,100.5,1000
2024-01-03,100.5,102,100,101.5,1100
2024-01-04,101.5,103,101,102.5,1200
2024-01-05,102.5,104,102,103.5,1300
2024-01-08,103.5,105,103,104.5,1400
";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn write_symbol(dir: &Path, symbol: &str, content: &str) {
    std::fs::write(dir.join(format!("{symbol}.csv")), content).unwrap();
}

#[test]
fn loads_every_row_without_filter() {
    let dir = tempfile::tempdir().unwrap();
    write_symbol(dir.path(), "SPY", SAMPLE);

    let loaded = CsvBarLoader::new(dir.path())
        .load("SPY", DateRange::unbounded())
        .unwrap();

    assert_eq!(loaded.symbol, "SPY");
    assert_eq!(loaded.bars.len(), 5);
    assert_eq!(loaded.rows_read, 5);
    assert_eq!(loaded.bars[0].date, date(2024, 1, 2));
    assert!((loaded.bars[4].close - 104.5).abs() < 1e-12);
    assert!(!loaded.dataset_hash.is_empty());
}

#[test]
fn date_filter_is_inclusive() {
    let dir = tempfile::tempdir().unwrap();
    write_symbol(dir.path(), "SPY", SAMPLE);

    let range = DateRange::new(Some(date(2024, 1, 3)), Some(date(2024, 1, 5)));
    let loaded = CsvBarLoader::new(dir.path()).load("SPY", range).unwrap();

    let dates: Vec<NaiveDate> = loaded.bars.iter().map(|b| b.date).collect();
    assert_eq!(dates, vec![date(2024, 1, 3), date(2024, 1, 4), date(2024, 1, 5)]);
    assert_eq!(loaded.rows_read, 5);
}

#[test]
fn filter_outside_data_yields_no_bars() {
    let dir = tempfile::tempdir().unwrap();
    write_symbol(dir.path(), "SPY", SAMPLE);

    let range = DateRange::new(Some(date(2030, 1, 1)), None);
    let loaded = CsvBarLoader::new(dir.path()).load("SPY", range).unwrap();
    assert!(loaded.bars.is_empty());
}

#[test]
fn hash_depends_on_filtered_bars() {
    let dir = tempfile::tempdir().unwrap();
    write_symbol(dir.path(), "SPY", SAMPLE);
    let loader = CsvBarLoader::new(dir.path());

    let all = loader.load("SPY", DateRange::unbounded()).unwrap();
    let again = loader.load("SPY", DateRange::unbounded()).unwrap();
    let part = loader
        .load("SPY", DateRange::new(None, Some(date(2024, 1, 4))))
        .unwrap();

    assert_eq!(all.dataset_hash, again.dataset_hash);
    assert_ne!(all.dataset_hash, part.dataset_hash);
}

#[test]
fn columns_found_by_name_in_any_order() {
    let dir = tempfile::tempdir().unwrap();
    write_symbol(
        dir.path(),
        "ALT",
        "Volume,Close,Adj Close,Date,Low,High,Open\n500,10.5,10.4,2024-02-01,9,11,10\n",
    );

    let loaded = CsvBarLoader::new(dir.path())
        .load("ALT", DateRange::unbounded())
        .unwrap();
    let bar = &loaded.bars[0];
    assert_eq!(bar.date, date(2024, 2, 1));
    assert_eq!(bar.open, 10.0);
    assert_eq!(bar.high, 11.0);
    assert_eq!(bar.low, 9.0);
    assert_eq!(bar.close, 10.5);
    assert_eq!(bar.volume, 500.0);
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let err = CsvBarLoader::new(dir.path())
        .load("NOPE", DateRange::unbounded())
        .unwrap_err();
    match err {
        LoadError::Open { path, .. } => assert!(path.ends_with("NOPE.csv")),
        other => panic!("expected Open error, got {other:?}"),
    }
}

#[test]
fn missing_column_is_named() {
    let dir = tempfile::tempdir().unwrap();
    write_symbol(
        dir.path(),
        "BAD",
        "Date,Open,High,Low,Volume\n2024-01-02,1,1,1,1\n",
    );
    let err = CsvBarLoader::new(dir.path())
        .load("BAD", DateRange::unbounded())
        .unwrap_err();
    assert!(matches!(err, LoadError::MissingColumn { column: "Close" }));
}

#[test]
fn bad_number_reports_row_and_field() {
    let dir = tempfile::tempdir().unwrap();
    write_symbol(
        dir.path(),
        "BAD",
        "Date,Open,High,Low,Close,Volume\n2024-01-02,1,1,1,1,1\n2024-01-03,1,1,1,abc,1\n",
    );
    let err = CsvBarLoader::new(dir.path())
        .load("BAD", DateRange::unbounded())
        .unwrap_err();
    match err {
        LoadError::ParseField { row, field, value } => {
            assert_eq!(row, 2);
            assert_eq!(field, "Close");
            assert_eq!(value, "abc");
        }
        other => panic!("expected ParseField, got {other:?}"),
    }
}

#[test]
fn bad_date_reports_row() {
    let dir = tempfile::tempdir().unwrap();
    write_symbol(
        dir.path(),
        "BAD",
        "Date,Open,High,Low,Close,Volume\n01/02/2024,1,1,1,1,1\n",
    );
    let err = CsvBarLoader::new(dir.path())
        .load("BAD", DateRange::unbounded())
        .unwrap_err();
    assert!(matches!(
        err,
        LoadError::ParseField {
            row: 1,
            field: "Date",
            ..
        }
    ));
}

#[test]
fn header_only_file_has_no_rows() {
    let dir = tempfile::tempdir().unwrap();
    write_symbol(dir.path(), "EMPTY", "Date,Open,High,Low,Close,Volume\n");
    let err = CsvBarLoader::new(dir.path())
        .load("EMPTY", DateRange::unbounded())
        .unwrap_err();
    assert!(matches!(err, LoadError::NoRows { .. }));
}
