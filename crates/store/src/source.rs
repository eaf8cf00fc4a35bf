//! Tabular source readers.
//!
//! Spreadsheet workbooks are read with `calamine` (first worksheet only, which
//! must not be blank);
//! delimited text with `csv`. Either way the first row is a header and is
//! dropped, and every remaining row comes back as positional [`Cell`]s.

use calamine::{open_workbook_auto, Data, Reader};
use matprice_core::{Error, ErrorCode, Result};
use std::path::Path;

/// One spreadsheet cell, reduced to what the import pipeline inspects.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

/// One data row, indexed by absolute column position.
pub type Row = Vec<Cell>;

impl Cell {
    /// Trimmed text content; `None` for empty or whitespace-only cells.
    ///
    /// Integral numbers render without a fractional part, so a month typed
    /// into a numeric cell (`202301.0`) reads back as `202301`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Cell::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                Some(format!("{}", *n as i64))
            }
            Cell::Number(n) => Some(n.to_string()),
        }
    }

    /// Numeric content; text cells are parsed after trimming.
    pub fn number(&self) -> Option<f64> {
        match self {
            Cell::Empty => None,
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse().ok(),
        }
    }

    fn from_data(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Number(*f),
            #[allow(clippy::cast_precision_loss)]
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Bool(b) => Cell::Text(b.to_string()),
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
            _ => Cell::Empty,
        }
    }

    fn from_field(field: &str) -> Self {
        if field.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(field.to_string())
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::from_field(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// Container formats the importer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Any workbook calamine can open: xlsx, xlsm, xlsb, xls, ods
    Workbook,
    /// Comma-separated text
    Csv,
    /// Tab-separated text
    Tsv,
}

impl SourceFormat {
    /// Pick a format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Self::Workbook),
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            _ => Err(Error::unsupported_format(path)),
        }
    }
}

/// Read every data row of a source file, header excluded.
pub fn read_rows(path: &Path) -> Result<Vec<Row>> {
    if !path.is_file() {
        return Err(Error::file_not_found(path));
    }

    match SourceFormat::from_path(path)? {
        SourceFormat::Workbook => read_workbook(path),
        SourceFormat::Csv => read_delimited(path, b','),
        SourceFormat::Tsv => read_delimited(path, b'\t'),
    }
}

fn read_workbook(path: &Path) -> Result<Vec<Row>> {
    let mut workbook = open_workbook_auto(path).map_err(|e| unreadable(path, e))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| {
            Error::new(
                ErrorCode::EmptyWorkbook,
                format!("No worksheet found in {}", path.display()),
            )
        })?
        .map_err(|e| unreadable(path, e))?;

    if range.is_empty() {
        return Err(Error::new(
            ErrorCode::EmptyWorkbook,
            format!("The first worksheet of {} is empty", path.display()),
        ));
    }

    // The used range may begin right of column A; pad so indices stay absolute.
    let offset = range.start().map_or(0, |(_, col)| col as usize);

    Ok(range
        .rows()
        .skip(1)
        .map(|cells| {
            let mut row = vec![Cell::Empty; offset];
            row.extend(cells.iter().map(Cell::from_data));
            row
        })
        .collect())
}

fn read_delimited(path: &Path, delimiter: u8) -> Result<Vec<Row>> {
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8(bytes).map_err(|e| {
        unreadable(path, e).with_suggestion("Save the file as UTF-8 text")
    })?;
    let text = text.trim_start_matches('\u{FEFF}');

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| unreadable(path, e))?;
        rows.push(record.iter().map(Cell::from_field).collect());
    }
    Ok(rows)
}

fn unreadable(path: &Path, err: impl std::error::Error + Send + Sync + 'static) -> Error {
    Error::new(
        ErrorCode::SourceUnreadable,
        format!("Could not read {}: {err}", path.display()),
    )
    .with_source(err)
}
