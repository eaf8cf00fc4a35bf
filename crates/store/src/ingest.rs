//! Row validation and deduplication for imports.
//!
//! Each row goes through four checks in a fixed order, and the first one that
//! fails decides which counter is bumped:
//!
//! 1. material name or specification missing: skipped
//! 2. price missing, not numeric, negative or non-finite: invalid price
//! 3. year-month not a six-character `YYYYMM`: invalid date
//! 4. (year-month, name, specification) already stored or seen earlier in
//!    the batch: duplicate

use crate::record::{DedupKey, MaterialRecord, YearMonth};
use crate::source::Cell;
use chrono::NaiveDate;
use matprice_core::{Error, ErrorCode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Write as _;

/// Positional column layout of a source row.
pub mod columns {
    pub const YEAR_MONTH: usize = 0;
    pub const MATERIAL_NAME: usize = 2;
    pub const SPECIFICATION: usize = 3;
    pub const UNIT: usize = 4;
    pub const UNIT_PRICE: usize = 6;
}

/// Per-import counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStats {
    pub imported_count: usize,
    pub duplicate_count: usize,
    pub invalid_price_count: usize,
    pub invalid_date_count: usize,
    /// Rows without a material name or specification
    pub skipped_count: usize,
    pub total_rows: usize,
}

impl ImportStats {
    /// Rows that passed validation, whether new or duplicate.
    pub fn valid_rows(&self) -> usize {
        self.imported_count + self.duplicate_count
    }

    /// Multi-line human-readable summary.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Imported {} of {} rows",
            self.imported_count, self.total_rows
        );
        let lines = [
            ("New records", self.imported_count),
            ("Duplicates skipped", self.duplicate_count),
            ("Invalid price", self.invalid_price_count),
            ("Invalid year-month", self.invalid_date_count),
            ("Missing name/spec", self.skipped_count),
            ("Total rows", self.total_rows),
        ];
        for (label, count) in lines {
            let _ = write!(out, "\n  {label:<20}{count}");
        }
        out
    }
}

/// Result of an import as handed back to the UI layer.
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    pub success: bool,
    pub summary: String,
    /// Present whenever the source could be read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ImportStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,
}

impl ImportOutcome {
    pub fn succeeded(stats: ImportStats) -> Self {
        Self {
            success: true,
            summary: stats.summary(),
            stats: Some(stats),
            error_code: None,
        }
    }

    pub fn failed(error: &Error, stats: Option<ImportStats>) -> Self {
        Self {
            success: false,
            summary: format!("Import failed: {error}"),
            stats,
            error_code: Some(error.code),
        }
    }
}

/// What happened to a single row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowVerdict {
    Accepted,
    Skipped,
    InvalidPrice,
    InvalidDate,
    Duplicate,
}

/// Accumulates accepted records for one import batch.
pub struct Ingestor {
    seen: HashSet<DedupKey>,
    accepted: Vec<MaterialRecord>,
    stats: ImportStats,
    import_date: Option<NaiveDate>,
}

impl Ingestor {
    /// Start a batch on top of the records already stored.
    pub fn new(existing: &[MaterialRecord]) -> Self {
        Self {
            seen: existing.iter().map(MaterialRecord::dedup_key).collect(),
            accepted: Vec::new(),
            stats: ImportStats::default(),
            import_date: None,
        }
    }

    /// Stamp accepted records with the date of the import.
    #[must_use]
    pub fn with_import_date(mut self, date: NaiveDate) -> Self {
        self.import_date = Some(date);
        self
    }

    /// Run one row through the checks.
    pub fn push(&mut self, row: &[Cell]) -> RowVerdict {
        self.stats.total_rows += 1;

        let verdict = match parse_row(row) {
            Err(verdict) => verdict,
            Ok(record) => {
                if self.seen.insert(record.dedup_key()) {
                    let record = match self.import_date {
                        Some(date) => record.imported_on(date),
                        None => record,
                    };
                    self.accepted.push(record);
                    RowVerdict::Accepted
                } else {
                    RowVerdict::Duplicate
                }
            }
        };

        match verdict {
            RowVerdict::Accepted => self.stats.imported_count += 1,
            RowVerdict::Skipped => self.stats.skipped_count += 1,
            RowVerdict::InvalidPrice => self.stats.invalid_price_count += 1,
            RowVerdict::InvalidDate => self.stats.invalid_date_count += 1,
            RowVerdict::Duplicate => self.stats.duplicate_count += 1,
        }

        if self.stats.total_rows % 100 == 0 {
            tracing::debug!(rows = self.stats.total_rows, "Import progress");
        }

        verdict
    }

    pub fn stats(&self) -> ImportStats {
        self.stats
    }

    /// Close the batch, returning the accepted records in source order.
    pub fn finish(self) -> (Vec<MaterialRecord>, ImportStats) {
        (self.accepted, self.stats)
    }
}

fn cell(row: &[Cell], index: usize) -> Option<&Cell> {
    row.get(index)
}

fn text_at(row: &[Cell], index: usize) -> Option<String> {
    cell(row, index).and_then(Cell::text)
}

fn parse_row(row: &[Cell]) -> Result<MaterialRecord, RowVerdict> {
    let (Some(name), Some(spec)) = (
        text_at(row, columns::MATERIAL_NAME),
        text_at(row, columns::SPECIFICATION),
    ) else {
        return Err(RowVerdict::Skipped);
    };

    let price = cell(row, columns::UNIT_PRICE)
        .and_then(Cell::number)
        .filter(|p| p.is_finite() && *p >= 0.0)
        .ok_or(RowVerdict::InvalidPrice)?;

    let year_month = text_at(row, columns::YEAR_MONTH)
        .and_then(|raw| YearMonth::parse_compact(&raw))
        .ok_or(RowVerdict::InvalidDate)?;

    let unit = text_at(row, columns::UNIT).unwrap_or_default();

    Ok(MaterialRecord::new(year_month, name, spec, unit, price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn row(ym: &str, name: &str, spec: &str, price: &str) -> Vec<Cell> {
        vec![
            ym.into(),
            "1".into(),
            name.into(),
            spec.into(),
            "吨".into(),
            "".into(),
            price.into(),
        ]
    }

    #[test]
    fn test_accepts_and_normalizes() {
        let mut ingestor = Ingestor::new(&[]);
        assert_eq!(ingestor.push(&row("202301", "水泥", "P.O 42.5", "450")), RowVerdict::Accepted);

        let (records, stats) = ingestor.finish();
        assert_eq!(stats.imported_count, 1);
        assert_eq!(records[0].year_month().as_str(), "2023-01");
        assert_eq!(records[0].unit(), "吨");
        assert!((records[0].unit_price() - 450.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_price() {
        let mut ingestor = Ingestor::new(&[]);
        assert_eq!(ingestor.push(&row("202301", "水泥", "P.O 42.5", "abc")), RowVerdict::InvalidPrice);
        assert_eq!(ingestor.push(&row("202301", "水泥", "P.O 42.5", "")), RowVerdict::InvalidPrice);
        assert_eq!(ingestor.push(&row("202301", "水泥", "P.O 42.5", "-3")), RowVerdict::InvalidPrice);
        assert_eq!(ingestor.stats().invalid_price_count, 3);
        assert_eq!(ingestor.stats().imported_count, 0);
    }

    #[test]
    fn test_invalid_date() {
        let mut ingestor = Ingestor::new(&[]);
        assert_eq!(ingestor.push(&row("23-01", "水泥", "P.O 42.5", "450")), RowVerdict::InvalidDate);
        assert_eq!(ingestor.push(&row("abcdef", "水泥", "P.O 42.5", "450")), RowVerdict::InvalidDate);
        assert_eq!(ingestor.stats().invalid_date_count, 2);
    }

    #[test]
    fn test_month_cell_is_trimmed_before_length_check() {
        let mut ingestor = Ingestor::new(&[]);
        assert_eq!(ingestor.push(&row(" 202301 ", "水泥", "P.O 42.5", "450")), RowVerdict::Accepted);
        assert_eq!(ingestor.push(&row("\t202301", "水泥", "P.O 42.5", "450")), RowVerdict::Duplicate);
        assert_eq!(ingestor.push(&row("2023 01", "水泥", "P.O 42.5", "450")), RowVerdict::InvalidDate);

        let (records, _) = ingestor.finish();
        assert_eq!(records[0].year_month().as_str(), "2023-01");
    }

    #[test]
    fn test_check_order_price_before_date() {
        let mut ingestor = Ingestor::new(&[]);
        assert_eq!(ingestor.push(&row("bad", "水泥", "P.O 42.5", "bad")), RowVerdict::InvalidPrice);
        assert_eq!(ingestor.push(&row("bad", "", "P.O 42.5", "bad")), RowVerdict::Skipped);
        let stats = ingestor.stats();
        assert_eq!(stats.invalid_date_count, 0);
        assert_eq!(stats.skipped_count, 1);
    }

    #[test]
    fn test_numeric_cells() {
        let mut ingestor = Ingestor::new(&[]);
        let row = vec![
            Cell::Number(202_306.0),
            Cell::Empty,
            "钢筋".into(),
            "HRB400 φ16".into(),
            Cell::Empty,
            Cell::Empty,
            Cell::Number(5200.5),
        ];
        assert_eq!(ingestor.push(&row), RowVerdict::Accepted);
        let (records, _) = ingestor.finish();
        assert_eq!(records[0].year_month().as_str(), "2023-06");
        assert_eq!(records[0].unit(), "");
    }

    #[test]
    fn test_short_row_without_price() {
        let mut ingestor = Ingestor::new(&[]);
        let short = vec!["202301".into(), "1".into(), "中砂".into(), "细".into()];
        assert_eq!(ingestor.push(&short), RowVerdict::InvalidPrice);
    }

    #[test]
    fn test_duplicates_within_batch_and_store() {
        let existing = vec![MaterialRecord::new(
            YearMonth::parse_compact("202301").unwrap(),
            "水泥",
            "P.O 42.5",
            "吨",
            450.0,
        )];
        let mut ingestor = Ingestor::new(&existing);

        assert_eq!(ingestor.push(&row("202301", "水泥", "P.O 42.5", "460")), RowVerdict::Duplicate);
        assert_eq!(ingestor.push(&row("202302", "水泥", "P.O 42.5", "455")), RowVerdict::Accepted);
        assert_eq!(ingestor.push(&row("202302", "水泥", "P.O 42.5", "999")), RowVerdict::Duplicate);

        let (records, stats) = ingestor.finish();
        assert_eq!(stats.duplicate_count, 2);
        assert_eq!(records.len(), 1);
        assert!((records[0].unit_price() - 455.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_import_date_stamp() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let mut ingestor = Ingestor::new(&[]).with_import_date(date);
        ingestor.push(&row("202301", "水泥", "P.O 42.5", "450"));
        let (records, _) = ingestor.finish();
        assert_eq!(records[0].import_date(), Some(date));
    }

    #[test]
    fn test_summary_lists_every_counter() {
        let stats = ImportStats {
            imported_count: 3,
            duplicate_count: 1,
            invalid_price_count: 2,
            invalid_date_count: 0,
            skipped_count: 1,
            total_rows: 7,
        };
        let summary = stats.summary();
        assert!(summary.starts_with("Imported 3 of 7 rows"));
        assert_eq!(summary.lines().count(), 7);
        assert!(summary.contains("Invalid price"));
    }

    proptest! {
        #[test]
        fn prop_counters_partition_rows(
            rows in proptest::collection::vec(
                (0u32..3, 0u32..3, prop_oneof!["202301", "202302", "2023", "x"], prop_oneof!["1", "abc", ""]),
                0..40,
            )
        ) {
            let mut ingestor = Ingestor::new(&[]);
            for (name, spec, ym, price) in &rows {
                let name = if *name == 0 { String::new() } else { format!("m{name}") };
                ingestor.push(&row(ym, &name, &format!("s{spec}"), price));
            }
            let stats = ingestor.stats();
            prop_assert_eq!(
                stats.imported_count + stats.duplicate_count + stats.invalid_price_count
                    + stats.invalid_date_count + stats.skipped_count,
                rows.len()
            );

            // Replaying the batch against its own output only finds duplicates.
            let (records, first) = ingestor.finish();
            let mut replay = Ingestor::new(&records);
            for (name, spec, ym, price) in &rows {
                let name = if *name == 0 { String::new() } else { format!("m{name}") };
                replay.push(&row(ym, &name, &format!("s{spec}"), price));
            }
            prop_assert_eq!(replay.stats().imported_count, 0);
            prop_assert_eq!(replay.stats().duplicate_count, first.valid_rows());
        }
    }
}
