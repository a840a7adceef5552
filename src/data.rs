use std::fs::File;
use std::io::Read;
use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx, XlsxError};

use crate::utils::{TableError, TimeSeriesTable};

const EXAMPLE_RETURNS_CSV: &str = include_str!("../data/returns.csv");

#[derive(Debug)]
pub enum IngestError {
    Io(std::io::Error),
    Csv(csv::Error),
    Xlsx(XlsxError),
    /// The file extension is neither of the two recognized encodings.
    UnsupportedFormat(String),
    EmptyWorkbook,
    Table(TableError),
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        IngestError::Io(err)
    }
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        IngestError::Csv(err)
    }
}

impl From<XlsxError> for IngestError {
    fn from(err: XlsxError) -> Self {
        IngestError::Xlsx(err)
    }
}

impl From<TableError> for IngestError {
    fn from(err: TableError) -> Self {
        IngestError::Table(err)
    }
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::Io(e) => write!(f, "io error: {e}"),
            IngestError::Csv(e) => write!(f, "csv error: {e}"),
            IngestError::Xlsx(e) => write!(f, "xlsx error: {e}"),
            IngestError::UnsupportedFormat(ext) => {
                write!(f, "unsupported file format: {ext:?} (expected csv or xlsx)")
            }
            IngestError::EmptyWorkbook => write!(f, "workbook has no worksheets"),
            IngestError::Table(e) => write!(f, "table error: {e}"),
        }
    }
}

impl std::error::Error for IngestError {}

/// Load a tabular file into a time-indexed table.
///
/// The first column holds row labels (dates), every other column one numeric
/// series per asset. Recognized encodings are delimited text (`.csv`) and
/// spreadsheet binary (`.xlsx`); anything else is `UnsupportedFormat`, which
/// surfaces expect to report and then skip the chart stages.
pub fn load_table(path: &Path) -> Result<TimeSeriesTable, IngestError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => read_csv(File::open(path)?),
        "xlsx" => read_xlsx(path),
        other => Err(IngestError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse delimited text from any reader.
pub fn read_csv<R: Read>(reader: R) -> Result<TimeSeriesTable, IngestError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

    let mut labels = Vec::new();
    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let mut cells = record.iter();
        labels.push(cells.next().unwrap_or("").to_string());
        rows.push(cells.map(parse_cell).collect());
    }

    Ok(TimeSeriesTable::from_records(labels, columns, rows)?)
}

fn read_xlsx(path: &Path) -> Result<TimeSeriesTable, IngestError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IngestError::EmptyWorkbook)??;

    let mut sheet_rows = range.rows();
    let columns: Vec<String> = match sheet_rows.next() {
        Some(header) => header.iter().skip(1).map(label_text).collect(),
        None => Vec::new(),
    };

    let mut labels = Vec::new();
    let mut rows = Vec::new();
    for sheet_row in sheet_rows {
        labels.push(sheet_row.first().map(label_text).unwrap_or_default());
        rows.push(sheet_row.iter().skip(1).map(numeric_cell).collect());
    }

    Ok(TimeSeriesTable::from_records(labels, columns, rows)?)
}

fn parse_cell(cell: &str) -> f64 {
    if cell.is_empty() {
        f64::NAN
    } else {
        cell.parse().unwrap_or(f64::NAN)
    }
}

fn label_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|t| t.date().format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) => s.clone(),
        other => other.to_string(),
    }
}

fn numeric_cell(cell: &Data) -> f64 {
    match cell {
        Data::Float(v) => *v,
        Data::Int(v) => *v as f64,
        Data::String(s) => parse_cell(s.trim()),
        _ => f64::NAN,
    }
}

/// The bundled example dataset: daily returns of a portfolio and its
/// benchmark index. Surfaces that want a fallback pass this in explicitly;
/// the library never reaches for it on its own.
pub fn example_returns() -> TimeSeriesTable {
    read_csv(EXAMPLE_RETURNS_CSV.as_bytes()).expect("bundled example data is valid")
}
