//! History and suggestion commands

use crate::app::{print_json, App};
use crate::commands::query::emit;
use crate::OutputFormat;
use anyhow::Result;
use matprice_cli::output::{format_price, print_records, Status};
use matprice_store::most_recent;
use owo_colors::OwoColorize;
use std::process::ExitCode;

/// Run history command
///
/// With a window the newest months come first; without one the full history
/// is shown oldest first.
pub fn history(app: &App, name: &str, spec: &str, window: Option<usize>, format: OutputFormat) -> Result<ExitCode> {
    let mut records = app.store.history(name, spec);
    if let Some(n) = window {
        records = most_recent(records, n);
    }

    if format == OutputFormat::Json {
        return emit(&records, format);
    }

    Status::header(&format!("{name} {spec}"));
    print_records(&records);

    let prices: Vec<f64> = records.iter().map(|r| r.unit_price()).collect();
    if let (Some(low), Some(high)) = (
        prices.iter().copied().reduce(f64::min),
        prices.iter().copied().reduce(f64::max),
    ) {
        println!(
            "{} {} - {}",
            "Price range:".dimmed(),
            format_price(low),
            format_price(high)
        );
    }
    Ok(ExitCode::SUCCESS)
}

/// Run suggest command
pub fn suggest(app: &App, query: &str, limit: usize, format: OutputFormat) -> Result<ExitCode> {
    let suggestions = app.store.suggest(query, limit);

    if format == OutputFormat::Json {
        print_json(&suggestions)?;
        return Ok(ExitCode::SUCCESS);
    }

    if suggestions.matches.is_empty() {
        if suggestions.did_you_mean.is_empty() {
            Status::info(&format!("No materials match \"{query}\""));
        } else {
            Status::info(&format!("Did you mean: {}", suggestions.did_you_mean.join(", ")));
        }
        return Ok(ExitCode::SUCCESS);
    }

    for ranked in &suggestions.matches {
        println!(
            "  {}  {}",
            ranked.item.name.bold(),
            ranked.item.specification
        );
    }
    Ok(ExitCode::SUCCESS)
}
