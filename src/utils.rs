use chrono::{NaiveDate, NaiveDateTime};
use tracing::warn;

#[derive(Debug)]
pub enum TableError {
    LengthMismatch { labels: usize, rows: usize },
    InvalidDateLabel { label: String, row: usize },
}

impl std::fmt::Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableError::LengthMismatch { labels, rows } => write!(
                f,
                "table length mismatch: {} row labels vs {} rows",
                labels, rows
            ),
            TableError::InvalidDateLabel { label, row } => {
                write!(f, "row {} label {:?} is not a recognized date", row, label)
            }
        }
    }
}

impl std::error::Error for TableError {}

/// A 2-D table of observations: rows indexed by date, columns by asset label.
///
/// Cells hold `f64::NAN` where an observation is undefined. The table does
/// not enforce monotone or unique dates; callers own data sanity.
#[derive(Clone, Debug)]
pub struct TimeSeriesTable {
    pub dates: Vec<NaiveDate>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl TimeSeriesTable {
    pub fn new(
        dates: Vec<NaiveDate>,
        columns: Vec<String>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self, TableError> {
        if dates.len() != rows.len() {
            return Err(TableError::LengthMismatch {
                labels: dates.len(),
                rows: rows.len(),
            });
        }

        let rows = coerce_row_widths(columns.len(), rows);

        Ok(Self {
            dates,
            columns,
            rows,
        })
    }

    /// Parse raw row labels into dates and build the table.
    ///
    /// Any label no recognized date format accepts fails the whole call;
    /// there is no partial recovery.
    pub fn from_records(
        labels: Vec<String>,
        columns: Vec<String>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self, TableError> {
        let mut dates = Vec::with_capacity(labels.len());
        for (row, label) in labels.into_iter().enumerate() {
            match parse_date_label(&label) {
                Some(date) => dates.push(date),
                None => return Err(TableError::InvalidDateLabel { label, row }),
            }
        }

        Self::new(dates, columns, rows)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Number of asset columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Values of one column in index order.
    pub fn column_values(&self, idx: usize) -> Vec<f64> {
        self.rows
            .iter()
            .map(|row| row.get(idx).copied().unwrap_or(f64::NAN))
            .collect()
    }
}

/// Pad or truncate rows that do not match the column count.
///
/// Mismatched input is accepted on a best-effort basis; the signal is a
/// single warning, not a failure.
fn coerce_row_widths(width: usize, mut rows: Vec<Vec<f64>>) -> Vec<Vec<f64>> {
    let ragged = rows.iter().filter(|row| row.len() != width).count();
    if ragged > 0 {
        warn!(
            ragged,
            width, "input rows do not match the column count; padding or truncating"
        );
        for row in rows.iter_mut() {
            row.resize(width, f64::NAN);
        }
    }
    rows
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y%m%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"];

pub fn parse_date_label(label: &str) -> Option<NaiveDate> {
    let trimmed = label.trim();

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.date());
        }
    }

    None
}
