//! Shared command context: resolved configuration plus the opened store.

use crate::Cli;
use matprice_cli::output::Status;
use matprice_core::config::Config;
use matprice_store::{LoadStatus, Store};
use matprice_telemetry::{TelemetryConfig, WorkerGuard};
use serde::Serialize;

pub struct App {
    pub config: Config,
    pub store: Store,
}

impl App {
    /// Resolve configuration, start logging and open the store.
    ///
    /// Flags and their environment variables take precedence over the file.
    pub fn init(cli: &Cli) -> anyhow::Result<(Self, Option<WorkerGuard>)> {
        let mut config = Config::load(cli.config.as_deref())?;

        if let Some(data_file) = &cli.data_file {
            config.schema.storage.data_file = data_file.clone();
        }
        if let Some(shared_file) = &cli.shared_file {
            config.schema.storage.shared_file = Some(shared_file.clone());
        }
        config.schema.validate()?;

        let guard = matprice_telemetry::init_with_config(TelemetryConfig::from_logging(
            &config.schema.logging,
            cli.verbose,
        ))?;

        tracing::debug!(
            config = ?config.path,
            data_file = %config.schema.storage.data_file.display(),
            "Configuration resolved"
        );

        let store = Store::from_config(&config.schema.storage);
        if let LoadStatus::Recovered(reason) = store.load_status() {
            Status::warning(&format!("Saved records could not be read, starting empty ({reason})"));
        }

        Ok((Self { config, store }, guard))
    }
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
