//! Import command - read a spreadsheet into the store

use crate::app::{print_json, App};
use crate::OutputFormat;
use anyhow::Result;
use matprice_cli::output::{format_duration, Status};
use matprice_cli::progress;
use matprice_core::error::exit_codes;
use matprice_telemetry::Timer;
use owo_colors::OwoColorize;
use std::path::Path;
use std::process::ExitCode;

/// Run import command
pub fn run(app: &mut App, path: &Path, format: OutputFormat) -> Result<ExitCode> {
    let spinner = progress::spinner(&format!("Importing {}", path.display()));
    let timer = Timer::start("import");
    let outcome = app.store.import(path);
    let elapsed = timer.stop();
    progress::finish(&spinner);

    if format == OutputFormat::Json {
        print_json(&outcome)?;
    } else if outcome.success {
        let mut lines = outcome.summary.lines();
        if let Some(headline) = lines.next() {
            Status::success(&format!("{headline} in {}", format_duration(elapsed)));
        }
        for line in lines {
            println!("{line}");
        }
        println!("  {}", format!("Stored records: {}", app.store.record_count()).dimmed());
    } else {
        Status::error(&outcome.summary);
    }

    if outcome.success {
        return Ok(ExitCode::SUCCESS);
    }
    let code = outcome
        .error_code
        .map_or(exit_codes::IMPORT_ERROR, |c| c.exit_code());
    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}
