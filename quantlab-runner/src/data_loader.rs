//! CSV bar loading for the runner.
//!
//! One file per symbol: `{data_dir}/{symbol}.csv` with a header row. Columns
//! are located by name (`Date, Open, High, Low, Close, Volume`), so their order
//! is free and extra columns are ignored. Rows are kept in file order; the
//! loader warns about, but never repairs, out-of-order dates.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use quantlab_core::domain::Bar;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::DATE_FORMAT;

/// Required header names, in the order they are reported when missing.
pub const REQUIRED_COLUMNS: [&str; 6] = ["Date", "Open", "High", "Low", "Close", "Volume"];

/// Errors from the data loading layer.
///
/// Row numbers are 1-based data rows (the header is row 0).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read CSV from {source_name}: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    #[error("{source_name} has no data rows")]
    NoRows { source_name: String },

    #[error("missing required column: {column}")]
    MissingColumn { column: &'static str },

    #[error("row {row}: missing value for {field}")]
    MissingField { row: usize, field: &'static str },

    #[error("row {row}: cannot parse {field} '{value}'")]
    ParseField {
        row: usize,
        field: &'static str,
        value: String,
    },
}

/// Inclusive date filter. `None` on either side means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}

/// Result of loading bars, including a reproducibility fingerprint.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub symbol: String,
    /// Filtered bars in file order.
    pub bars: Vec<Bar>,
    /// BLAKE3 over the filtered bars.
    pub dataset_hash: String,
    /// Rows parsed before date filtering.
    pub rows_read: usize,
}

/// Loads `{symbol}.csv` files from a fixed directory.
#[derive(Debug, Clone)]
pub struct CsvBarLoader {
    data_dir: PathBuf,
}

impl CsvBarLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path a symbol is read from.
    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.data_dir.join(format!("{symbol}.csv"))
    }

    /// Load and filter one symbol's bars.
    pub fn load(&self, symbol: &str, range: DateRange) -> Result<LoadedData, LoadError> {
        let path = self.path_for(symbol);
        info!(symbol, path = %path.display(), "loading bars");

        let file = File::open(&path).map_err(|source| LoadError::Open {
            path: path.clone(),
            source,
        })?;
        let all = parse_bars(file, &path.display().to_string())?;
        let rows_read = all.len();

        let bars: Vec<Bar> = all.into_iter().filter(|b| range.contains(b.date)).collect();
        if bars.is_empty() {
            warn!(symbol, rows_read, "no bars left after date filtering");
        } else {
            info!(
                symbol,
                bars = bars.len(),
                first = %bars[0].date,
                last = %bars[bars.len() - 1].date,
                "loaded bars"
            );
        }

        Ok(LoadedData {
            symbol: symbol.to_string(),
            dataset_hash: compute_dataset_hash(symbol, &bars),
            bars,
            rows_read,
        })
    }
}

/// Parse OHLCV bars from any CSV source with a header row.
///
/// `source_name` only labels errors and log lines.
pub fn parse_bars<R: Read>(reader: R, source_name: &str) -> Result<Vec<Bar>, LoadError> {
    let csv_err = |source| LoadError::Csv {
        source_name: source_name.to_string(),
        source,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().map_err(csv_err)?.clone();
    let mut columns = [0usize; 6];
    for (slot, name) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == name)
            .ok_or(LoadError::MissingColumn { column: name })?;
    }
    let [date_col, open_col, high_col, low_col, close_col, volume_col] = columns;

    let mut bars: Vec<Bar> = Vec::new();
    let mut out_of_order = 0usize;
    for (i, record) in rdr.records().enumerate() {
        let row = i + 1;
        let record = record.map_err(csv_err)?;

        let date_str = field(&record, row, date_col, "Date")?;
        let date = NaiveDate::parse_from_str(date_str, DATE_FORMAT).map_err(|_| {
            LoadError::ParseField {
                row,
                field: "Date",
                value: date_str.to_string(),
            }
        })?;

        let bar = Bar::new(
            date,
            number(&record, row, open_col, "Open")?,
            number(&record, row, high_col, "High")?,
            number(&record, row, low_col, "Low")?,
            number(&record, row, close_col, "Close")?,
            number(&record, row, volume_col, "Volume")?,
        );

        if bars.last().is_some_and(|prev| bar.date <= prev.date) {
            out_of_order += 1;
        }
        bars.push(bar);
    }

    if bars.is_empty() {
        return Err(LoadError::NoRows {
            source_name: source_name.to_string(),
        });
    }
    if out_of_order > 0 {
        warn!(
            source = source_name,
            out_of_order, "dates are not strictly increasing; bars are used in file order"
        );
    }
    let insane = insane_rows(&bars);
    if !insane.is_empty() {
        warn!(
            source = source_name,
            count = insane.len(),
            rows = ?&insane[..insane.len().min(10)],
            "bars fail the OHLC sanity check; loaded as-is"
        );
    }

    Ok(bars)
}

/// 1-based data rows whose OHLCV values are inconsistent (high below low,
/// open/close outside the high/low range, non-positive close, negative volume).
pub fn insane_rows(bars: &[Bar]) -> Vec<usize> {
    bars.iter()
        .enumerate()
        .filter(|(_, b)| !b.is_sane())
        .map(|(i, _)| i + 1)
        .collect()
}

fn field<'r>(
    record: &'r csv::StringRecord,
    row: usize,
    col: usize,
    name: &'static str,
) -> Result<&'r str, LoadError> {
    match record.get(col) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(LoadError::MissingField { row, field: name }),
    }
}

fn number(
    record: &csv::StringRecord,
    row: usize,
    col: usize,
    name: &'static str,
) -> Result<f64, LoadError> {
    let raw = field(record, row, col, name)?;
    raw.parse::<f64>().map_err(|_| LoadError::ParseField {
        row,
        field: name,
        value: raw.to_string(),
    })
}

/// Compute a deterministic BLAKE3 hash over a symbol's bars.
fn compute_dataset_hash(symbol: &str, bars: &[Bar]) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(symbol.as_bytes());
    for bar in bars {
        hasher.update(bar.date.to_string().as_bytes());
        hasher.update(&bar.open.to_le_bytes());
        hasher.update(&bar.high.to_le_bytes());
        hasher.update(&bar.low.to_le_bytes());
        hasher.update(&bar.close.to_le_bytes());
        hasher.update(&bar.volume.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
