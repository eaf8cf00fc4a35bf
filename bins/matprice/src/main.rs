//! matprice - construction material price store
//!
//! Imports monthly price spreadsheets, keeps a deduplicated local record set
//! and answers search, date-range and history queries.

use clap::{Parser, Subcommand, ValueEnum};
use matprice_core::ErrorCode;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

mod app;
mod commands;

use app::App;
use commands::{admin, history, import, query};

/// Construction material price store
#[derive(Parser)]
#[command(name = "matprice")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (defaults to .matprice.toml in the current directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Record file, overriding storage.data_file
    #[arg(long, global = true, env = "MATPRICE_DATA_FILE")]
    data_file: Option<PathBuf>,

    /// Shared copy written after every save, overriding storage.shared_file
    #[arg(long, global = true, env = "MATPRICE_SHARED_FILE")]
    shared_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a price spreadsheet (xlsx, xls, ods, csv, tsv)
    Import {
        /// Source file
        path: PathBuf,
    },

    /// Filter records by name, specification and month
    Search {
        /// Substring of the material name
        #[arg(short, long, default_value = "")]
        name: String,

        /// Substring of the specification
        #[arg(short, long, default_value = "")]
        spec: String,

        /// Substring of the month, e.g. 2023 or 2023-06
        #[arg(short, long, default_value = "")]
        month: String,
    },

    /// Search name or specification for a keyword
    Keyword {
        keyword: String,

        /// Only this month (YYYY-MM or YYYYMM)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Records between two months, inclusive (YYYYMM)
    Range { start: String, end: String },

    /// Price history of one material
    History {
        /// Exact material name
        name: String,

        /// Exact specification
        spec: String,

        /// Number of most recent months to show
        #[arg(short, long, conflicts_with = "all")]
        limit: Option<usize>,

        /// Show every month, oldest first
        #[arg(short, long)]
        all: bool,
    },

    /// Suggest materials for a partial name or specification
    Suggest {
        query: String,

        /// Maximum number of suggestions
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Print the number of stored records
    Count,

    /// Show store location and summary figures
    Info,

    /// Delete every stored record
    DeleteAll {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let format = cli.format;

    let (app, _guard) = match App::init(&cli) {
        Ok(ready) => ready,
        Err(e) => return report(&e, format),
    };

    match run(cli.command, app, format) {
        Ok(code) => code,
        Err(e) => report(&e, format),
    }
}

fn run(command: Commands, mut app: App, format: OutputFormat) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Import { path } => import::run(&mut app, &path, format),
        Commands::Search { name, spec, month } => query::search(&app, &name, &spec, &month, format),
        Commands::Keyword { keyword, month } => {
            query::keyword(&app, &keyword, month.as_deref(), format)
        }
        Commands::Range { start, end } => query::range(&app, &start, &end, format),
        Commands::History { name, spec, limit, all } => {
            let window = if all {
                None
            } else {
                Some(limit.unwrap_or(app.config.schema.display.history_window))
            };
            history::history(&app, &name, &spec, window, format)
        }
        Commands::Suggest { query, limit } => {
            let limit = limit.unwrap_or(app.config.schema.display.suggest_limit);
            history::suggest(&app, &query, limit, format)
        }
        Commands::Count => admin::count(&app, format),
        Commands::Info => admin::info(&app, format),
        Commands::DeleteAll { yes } => admin::delete_all(&mut app, yes, format),
    }
}

/// Print an error and map it to a process exit code.
///
/// With `--format json` the error goes to stdout as an `ErrorReport`.
fn report(error: &anyhow::Error, format: OutputFormat) -> ExitCode {
    let report = match error.downcast_ref::<matprice_core::Error>() {
        Some(e) => e.to_report(),
        None => matprice_core::Error::new(ErrorCode::Unknown, error.to_string()).to_report(),
    };

    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(&serde_json::json!({ "error": report })) {
            Ok(json) => println!("{json}"),
            Err(_) => eprintln!("{} {}", "Error:".red().bold(), error),
        },
        OutputFormat::Text => eprintln!("{} {}", "Error:".red().bold(), error),
    }

    ExitCode::from(u8::try_from(report.code.exit_code()).unwrap_or(1))
}
