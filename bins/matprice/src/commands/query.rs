//! Search commands - filters, keyword and date range

use crate::app::{print_json, App};
use crate::OutputFormat;
use anyhow::Result;
use matprice_cli::output::print_records;
use matprice_store::MaterialRecord;
use std::process::ExitCode;

/// Run search command
pub fn search(app: &App, name: &str, spec: &str, month: &str, format: OutputFormat) -> Result<ExitCode> {
    let records = app.store.search(name, spec, month);
    tracing::debug!(name, spec, month, found = records.len(), "Search");
    emit(&records, format)
}

/// Run keyword command
pub fn keyword(app: &App, keyword: &str, month: Option<&str>, format: OutputFormat) -> Result<ExitCode> {
    let records = app.store.search_keyword(keyword, month);
    tracing::debug!(keyword, month, found = records.len(), "Keyword search");
    emit(&records, format)
}

/// Run range command
pub fn range(app: &App, start: &str, end: &str, format: OutputFormat) -> Result<ExitCode> {
    let records = app.store.search_by_date_range(start, end)?;
    emit(&records, format)
}

pub(crate) fn emit(records: &[MaterialRecord], format: OutputFormat) -> Result<ExitCode> {
    match format {
        OutputFormat::Json => print_json(&records)?,
        OutputFormat::Text => print_records(records),
    }
    Ok(ExitCode::SUCCESS)
}
