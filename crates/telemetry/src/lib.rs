//! Logging for the material price tools
//!
//! This crate provides:
//! - `tracing-subscriber` setup with an `EnvFilter`
//! - Compact or JSON output on stderr
//! - An optional daily rolling log file
//! - A per-run session id for correlating log lines

use matprice_core::config::LoggingConfig;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer, Registry};
use uuid::Uuid;

pub use tracing_appender::non_blocking::WorkerGuard;

/// Global session ID for correlating logs
static SESSION_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// File name prefix of the rolling log
pub const LOG_FILE_PREFIX: &str = "matprice.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize with custom configuration
///
/// The returned guard flushes the log file on drop; keep it alive until exit.
pub fn init_with_config(config: TelemetryConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = if config.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
    };

    let mut layers: Vec<BoxedLayer> = vec![stderr_layer(&config)];

    let guard = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .map_err(|e| anyhow::anyhow!("Failed to create log directory {}: {}", dir.display(), e))?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            layers.push(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(writer)
                    .boxed(),
            );
            Some(guard)
        }
        None => None,
    };

    let subscriber = tracing_subscriber::registry().with(layers).with(filter);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    tracing::debug!(
        session_id = %session_id(),
        version = env!("CARGO_PKG_VERSION"),
        "Telemetry initialized"
    );

    Ok(guard)
}

fn stderr_layer(config: &TelemetryConfig) -> BoxedLayer {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(config.show_target);

    if config.json {
        layer.json().boxed()
    } else {
        layer.compact().boxed()
    }
}

/// Get the current session ID
pub fn session_id() -> &'static str {
    &SESSION_ID
}

/// Telemetry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub json: bool,
    pub verbose: bool,
    pub show_target: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: None,
            json: false,
            verbose: false,
            show_target: false,
        }
    }
}

impl TelemetryConfig {
    /// Build from the `[logging]` config section
    pub fn from_logging(logging: &LoggingConfig, verbose: bool) -> Self {
        Self {
            log_level: logging.level.clone(),
            log_dir: logging.log_dir.clone(),
            json: logging.json,
            verbose,
            show_target: verbose,
        }
    }
}

/// Timer for measuring operation duration
pub struct Timer {
    name: &'static str,
    start: Instant,
}

impl Timer {
    /// Start a new timer
    pub fn start(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
        }
    }

    /// Stop the timer and log the duration
    pub fn stop(self) -> Duration {
        let duration = self.start.elapsed();
        tracing::debug!(
            operation = self.name,
            duration_ms = duration.as_millis(),
            "Timer completed"
        );
        duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_logging() {
        let logging = LoggingConfig {
            level: "info".to_string(),
            log_dir: Some(PathBuf::from("/tmp/logs")),
            json: true,
        };
        let config = TelemetryConfig::from_logging(&logging, true);

        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/logs")));
        assert!(config.json);
        assert!(config.verbose);
    }

    #[test]
    fn test_default_matches_logging_section() {
        let config = TelemetryConfig::default();
        assert_eq!(config.log_level, LoggingConfig::default().level);
        assert!(config.log_dir.is_none());
    }

    // The only test that installs the global subscriber.
    #[test]
    fn test_init_writes_rolling_log_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let log_dir = dir.path().join("logs");
        let config = TelemetryConfig {
            log_dir: Some(log_dir.clone()),
            verbose: true,
            ..TelemetryConfig::default()
        };

        let guard = init_with_config(config).unwrap();
        assert!(guard.is_some());
        tracing::warn!(store = "test", "Saved records unreadable");
        drop(guard);

        let files: Vec<_> = std::fs::read_dir(&log_dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(files.len(), 1);
        assert!(files[0].starts_with(LOG_FILE_PREFIX));

        let contents = std::fs::read_to_string(log_dir.join(&files[0])).unwrap();
        assert!(contents.contains("Saved records unreadable"));
    }

    #[test]
    fn test_timer() {
        let timer = Timer::start("test_operation");
        std::thread::sleep(Duration::from_millis(10));
        let duration = timer.stop();
        assert!(duration.as_millis() >= 10);
    }

    #[test]
    fn test_session_id() {
        let id = session_id();
        assert!(!id.is_empty());
        assert!(Uuid::parse_str(id).is_ok());
        assert_eq!(id, session_id());
    }
}
