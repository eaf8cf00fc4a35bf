//! Material price records and the year-month type they are keyed by.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar month in canonical `YYYY-MM` form.
///
/// Values built through [`YearMonth::parse_compact`] or [`YearMonth::parse`]
/// are always canonical. Deserialization keeps the stored text as-is, so a
/// hand-edited blob may hold text that [`YearMonth::parts`] cannot parse.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YearMonth(String);

impl YearMonth {
    /// Parse the compact import form: exactly six ASCII digits, `YYYYMM`.
    ///
    /// ```
    /// use matprice_store::YearMonth;
    ///
    /// assert_eq!(YearMonth::parse_compact("202301").unwrap().as_str(), "2023-01");
    /// assert!(YearMonth::parse_compact("23-01").is_none());
    /// ```
    pub fn parse_compact(raw: &str) -> Option<Self> {
        let (year, month) = split_compact(raw)?;
        Some(Self(format!("{year:04}-{month:02}")))
    }

    /// Parse either `YYYY-MM` or `YYYYMM`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        match raw.split_once('-') {
            Some((year, month)) if year.len() == 4 && month.len() == 2 => {
                Self::parse_compact(&format!("{year}{month}"))
            }
            Some(_) => None,
            None => Self::parse_compact(raw),
        }
    }

    /// Canonical text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `(year, month)` after stripping separators, if the text is a valid month.
    pub fn parts(&self) -> Option<(i32, u32)> {
        let compact: String = self.0.chars().filter(char::is_ascii_digit).collect();
        if compact.len() != self.0.chars().filter(|c| !matches!(c, '-' | '/' | '.')).count() {
            return None;
        }
        split_compact(&compact)
    }

    /// Sortable `YYYYMM` number, if the text is a valid month.
    pub fn ordinal(&self) -> Option<u32> {
        self.parts()
            .and_then(|(year, month)| u32::try_from(year).ok().map(|y| y * 100 + month))
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn split_compact(raw: &str) -> Option<(i32, u32)> {
    if raw.len() != 6 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = raw[..4].parse().ok()?;
    let month: u32 = raw[4..].parse().ok()?;
    if year < 1 {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, 1).map(|_| (year, month))
}

/// Identity of an observation: the same material and specification in the
/// same month is one observation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub year_month: YearMonth,
    pub material_name: String,
    pub specification: String,
}

/// One priced observation of a material in a given month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRecord {
    year_month: YearMonth,
    material_name: String,
    specification: String,
    unit: String,
    unit_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    imported_on: Option<NaiveDate>,
}

impl MaterialRecord {
    pub fn new(
        year_month: YearMonth,
        material_name: impl Into<String>,
        specification: impl Into<String>,
        unit: impl Into<String>,
        unit_price: f64,
    ) -> Self {
        Self {
            year_month,
            material_name: material_name.into(),
            specification: specification.into(),
            unit: unit.into(),
            unit_price,
            imported_on: None,
        }
    }

    /// Stamp the date the record entered the store.
    #[must_use]
    pub fn imported_on(mut self, date: NaiveDate) -> Self {
        self.imported_on = Some(date);
        self
    }

    pub fn year_month(&self) -> &YearMonth {
        &self.year_month
    }

    pub fn material_name(&self) -> &str {
        &self.material_name
    }

    pub fn specification(&self) -> &str {
        &self.specification
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    pub fn import_date(&self) -> Option<NaiveDate> {
        self.imported_on
    }

    pub fn dedup_key(&self) -> DedupKey {
        DedupKey {
            year_month: self.year_month.clone(),
            material_name: self.material_name.clone(),
            specification: self.specification.clone(),
        }
    }
}
