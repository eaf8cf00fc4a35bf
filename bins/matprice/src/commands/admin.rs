//! Store maintenance commands - count, info and delete-all

use crate::app::{print_json, App};
use crate::OutputFormat;
use anyhow::Result;
use matprice_cli::output::{format_count, Status};
use matprice_core::{Error, ErrorCode};
use matprice_store::{LoadStatus, MirrorStatus, StoreStats};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Serialize)]
struct JsonCount {
    records: usize,
}

#[derive(Debug, Serialize)]
struct JsonInfo<'a> {
    data_file: &'a PathBuf,
    shared_file: Option<&'a PathBuf>,
    config_file: Option<&'a PathBuf>,
    load_status: &'a LoadStatus,
    #[serde(flatten)]
    stats: StoreStats,
}

/// Run count command
pub fn count(app: &App, format: OutputFormat) -> Result<ExitCode> {
    let records = app.store.record_count();
    match format {
        OutputFormat::Json => print_json(&JsonCount { records })?,
        OutputFormat::Text => println!("{records}"),
    }
    Ok(ExitCode::SUCCESS)
}

/// Run info command
pub fn info(app: &App, format: OutputFormat) -> Result<ExitCode> {
    let storage = &app.config.schema.storage;
    let stats = app.store.stats();

    if format == OutputFormat::Json {
        print_json(&JsonInfo {
            data_file: &storage.data_file,
            shared_file: storage.shared_file.as_ref(),
            config_file: app.config.path.as_ref(),
            load_status: app.store.load_status(),
            stats,
        })?;
        return Ok(ExitCode::SUCCESS);
    }

    Status::header("Material price store");
    println!("  {:<14} {}", "Data file:".dimmed(), storage.data_file.display());
    if let Some(shared) = &storage.shared_file {
        println!("  {:<14} {}", "Shared copy:".dimmed(), shared.display());
    }
    if let Some(path) = &app.config.path {
        println!("  {:<14} {}", "Config:".dimmed(), path.display());
    }
    println!("  {:<14} {}", "Records:".dimmed(), stats.records);
    println!("  {:<14} {}", "Materials:".dimmed(), stats.materials);
    if let (Some(earliest), Some(latest)) = (&stats.earliest, &stats.latest) {
        println!("  {:<14} {earliest} to {latest}", "Months:".dimmed());
    }
    Ok(ExitCode::SUCCESS)
}

/// Run delete-all command
pub fn delete_all(app: &mut App, yes: bool, format: OutputFormat) -> Result<ExitCode> {
    if !yes {
        return Err(Error::new(ErrorCode::InvalidInput, "Refusing to delete without confirmation")
            .with_suggestion("Re-run with --yes to delete every record")
            .into());
    }

    let removed = app.store.record_count();
    let report = app.store.delete_all()?;

    if format == OutputFormat::Json {
        print_json(&serde_json::json!({ "removed": removed, "save": report }))?;
        return Ok(ExitCode::SUCCESS);
    }

    Status::success(&format!("Deleted {}", format_count(removed, "record", "records")));
    if let MirrorStatus::Failed(reason) = &report.mirror {
        Status::warning(&format!("Shared copy not updated: {reason}"));
    }
    Ok(ExitCode::SUCCESS)
}
