//! Read-only queries over the store: filters, date ranges and history.

use crate::record::{MaterialRecord, YearMonth};
use crate::store::Store;
use matprice_core::validation::Validator;
use matprice_core::{Error, ErrorCode, Result};
use matprice_search::{contains_folded, matches_filter};

impl Store {
    /// Records matching every non-empty filter, newest month first.
    ///
    /// Name and specification filters are case-insensitive substrings; the
    /// month filter is a plain substring of the canonical `YYYY-MM` text.
    pub fn search(&self, name: &str, spec: &str, year_month: &str) -> Vec<MaterialRecord> {
        let year_month = year_month.trim();
        let mut found: Vec<MaterialRecord> = self
            .records()
            .iter()
            .filter(|r| matches_filter(r.material_name(), name))
            .filter(|r| matches_filter(r.specification(), spec))
            .filter(|r| year_month.is_empty() || r.year_month().as_str().contains(year_month))
            .cloned()
            .collect();
        sort_newest_first(&mut found);
        found
    }

    /// Records whose month lies within `start..=end`, both given as `YYYYMM`.
    pub fn search_by_date_range(&self, start: &str, end: &str) -> Result<Vec<MaterialRecord>> {
        let (start, end) = (start.trim(), end.trim());
        let start_month = YearMonth::parse_compact(start);
        let end_month = YearMonth::parse_compact(end);

        Validator::new()
            .required("start", start)
            .exact_length("start", start, 6)
            .check("start", start_month.is_some(), "Not a valid year-month", "YYYYMM, e.g. 202301")
            .required("end", end)
            .exact_length("end", end, 6)
            .check("end", end_month.is_some(), "Not a valid year-month", "YYYYMM, e.g. 202312")
            .validate()
            .to_result_with(ErrorCode::InvalidYearMonth)?;

        let (Some(lo), Some(hi)) = (
            start_month.as_ref().and_then(YearMonth::ordinal),
            end_month.as_ref().and_then(YearMonth::ordinal),
        ) else {
            return Err(Error::new(ErrorCode::InvalidYearMonth, "Range bounds are not valid months"));
        };

        if lo > hi {
            return Err(Error::new(
                ErrorCode::InvalidRange,
                format!("Range start {start} is after end {end}"),
            )
            .with_suggestion("Swap the two bounds"));
        }

        let mut found: Vec<MaterialRecord> = self
            .records()
            .iter()
            .filter(|r| r.year_month().ordinal().is_some_and(|m| (lo..=hi).contains(&m)))
            .cloned()
            .collect();
        sort_newest_first(&mut found);
        Ok(found)
    }

    /// Records whose name or specification contains `keyword`, optionally
    /// restricted to one month (`YYYY-MM` or `YYYYMM`).
    ///
    /// An empty keyword matches nothing. A month that cannot be parsed
    /// matches nothing either.
    pub fn search_keyword(&self, keyword: &str, year_month: Option<&str>) -> Vec<MaterialRecord> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Vec::new();
        }

        let month = match year_month.map(str::trim).filter(|m| !m.is_empty()) {
            None => None,
            Some(raw) => match YearMonth::parse(raw) {
                Some(month) => Some(month),
                None => return Vec::new(),
            },
        };

        let mut found: Vec<MaterialRecord> = self
            .records()
            .iter()
            .filter(|r| {
                contains_folded(r.material_name(), keyword)
                    || contains_folded(r.specification(), keyword)
            })
            .filter(|r| month.as_ref().is_none_or(|m| r.year_month() == m))
            .cloned()
            .collect();
        sort_newest_first(&mut found);
        found
    }

    /// Every record for exactly this material, oldest month first.
    pub fn history(&self, name: &str, spec: &str) -> Vec<MaterialRecord> {
        let mut found: Vec<MaterialRecord> = self
            .records()
            .iter()
            .filter(|r| r.material_name() == name && r.specification() == spec)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.year_month().cmp(b.year_month()));
        found
    }
}

/// Keep the newest `n` records, newest first.
pub fn most_recent(mut records: Vec<MaterialRecord>, n: usize) -> Vec<MaterialRecord> {
    sort_newest_first(&mut records);
    records.truncate(n);
    records
}

fn sort_newest_first(records: &mut [MaterialRecord]) {
    records.sort_by(|a, b| b.year_month().cmp(a.year_month()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::source::{Cell, Row};

    fn row(ym: &str, name: &str, spec: &str, price: f64) -> Row {
        vec![ym.into(), Cell::Empty, name.into(), spec.into(), "吨".into(), Cell::Empty, price.into()]
    }

    fn store() -> Store {
        let mut store = Store::open(MemoryBackend::new());
        store
            .import_rows(vec![
                row("202301", "水泥", "P.O 42.5", 450.0),
                row("202306", "钢筋", "HRB400 φ16", 5100.0),
                row("202401", "钢筋", "HRB400 φ16", 5000.0),
                row("202302", "水泥", "P.O 42.5", 455.0),
                row("202306", "沙子", "中砂", 120.0),
                row("202212", "水泥", "P.O 52.5", 520.0),
            ])
            .unwrap();
        store
    }

    fn months(records: &[MaterialRecord]) -> Vec<&str> {
        records.iter().map(|r| r.year_month().as_str()).collect()
    }

    #[test]
    fn test_empty_filters_return_everything_descending() {
        let store = store();
        let all = store.search("", "", "");
        assert_eq!(all.len(), 6);
        assert_eq!(months(&all), ["2024-01", "2023-06", "2023-06", "2023-02", "2023-01", "2022-12"]);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let all = store().search("", "", "2023-06");
        let names: Vec<&str> = all.iter().map(MaterialRecord::material_name).collect();
        assert_eq!(names, ["钢筋", "沙子"]);
    }

    #[test]
    fn test_name_filter() {
        let found = store().search("钢筋", "", "");
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|r| r.material_name() == "钢筋"));
    }

    #[test]
    fn test_spec_filter_is_case_insensitive() {
        let found = store().search("", "hrb400", "");
        assert_eq!(found.len(), 2);
        assert_eq!(store().search("  ", " p.o 42 ", "").len(), 2);
    }

    #[test]
    fn test_year_month_substring() {
        assert_eq!(store().search("", "", "2023").len(), 4);
        assert!(store().search("", "", "202301").is_empty());
    }

    #[test]
    fn test_date_range_inclusive() {
        let found = store().search_by_date_range("202301", "202306").unwrap();
        assert_eq!(months(&found), ["2023-06", "2023-06", "2023-02", "2023-01"]);
    }

    #[test]
    fn test_date_range_excludes_outside() {
        let found = store().search_by_date_range("202301", "202312").unwrap();
        assert!(found.iter().all(|r| r.year_month().as_str() != "2024-01"));
    }

    #[test]
    fn test_date_range_rejects_bad_bounds() {
        let store = store();
        for (start, end) in [("", "202312"), ("2023-01", "202312"), ("202313", "202312"), ("202301", "abcdef")] {
            let err = store.search_by_date_range(start, end).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidYearMonth, "{start}..{end}");
        }
    }

    #[test]
    fn test_date_range_reversed_bounds() {
        let err = store().search_by_date_range("202312", "202301").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRange);
    }

    #[test]
    fn test_date_range_skips_unparsable_stored_months() {
        let records: Vec<MaterialRecord> = serde_json::from_str(
            r#"[
                {"year_month":"2023-05","material_name":"水泥","specification":"P.O 42.5","unit":"吨","unit_price":450.0},
                {"year_month":"May 2023","material_name":"水泥","specification":"P.O 42.5","unit":"吨","unit_price":451.0}
            ]"#,
        )
        .unwrap();
        let blob = crate::snapshot::encode(&records).unwrap();
        let store = Store::open(MemoryBackend::with_blob(blob));

        let found = store.search_by_date_range("202301", "202312").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(store.search("", "", "").len(), 2);
    }

    #[test]
    fn test_keyword_matches_name_or_spec() {
        let store = store();
        assert_eq!(store.search_keyword("砂", None).len(), 1);
        assert_eq!(store.search_keyword("hrb", None).len(), 2);
        assert_eq!(store.search_keyword("水泥", Some("202301")).len(), 1);
        assert_eq!(store.search_keyword("水泥", Some("2023-02")).len(), 1);
        assert!(store.search_keyword("水泥", Some("Jan")).is_empty());
        assert!(store.search_keyword("  ", None).is_empty());
    }

    #[test]
    fn test_history_ascending_exact_match() {
        let history = store().history("水泥", "P.O 42.5");
        assert_eq!(months(&history), ["2023-01", "2023-02"]);
        assert!(store().history("水泥", "P.O").is_empty());
    }

    #[test]
    fn test_most_recent_matches_search_order() {
        let store = store();
        let recent = most_recent(store.history("钢筋", "HRB400 φ16"), 12);
        let searched = store.search("钢筋", "HRB400 φ16", "");
        assert_eq!(recent, searched);
        assert_eq!(most_recent(store.history("钢筋", "HRB400 φ16"), 1).len(), 1);
    }
}
