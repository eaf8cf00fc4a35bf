//! Configuration schema definitions

use crate::error::{ErrorCode, Result};
use crate::validation::Validator;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConfigSchema {
    /// Reject values the tools cannot work with
    pub fn validate(&self) -> Result<()> {
        Validator::new()
            .required("storage.data_file", &self.storage.data_file.to_string_lossy())
            .check(
                "display.history_window",
                self.display.history_window > 0,
                "Must be at least 1",
                "a positive number of months",
            )
            .check(
                "display.suggest_limit",
                self.display.suggest_limit > 0,
                "Must be at least 1",
                "a positive number of suggestions",
            )
            .validate()
            .to_result_with(ErrorCode::ConfigValidationError)
    }
}

/// Where the record blob lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Primary persisted blob
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Best-effort copy for the companion tool
    #[serde(default)]
    pub shared_file: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            shared_file: None,
        }
    }
}

fn default_data_file() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from(".matprice"))
        .join("matprice")
        .join("material_prices.json")
}

/// Presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Number of months shown by the history view
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Maximum number of suggestions
    #[serde(default = "default_suggest_limit")]
    pub suggest_limit: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            suggest_limit: default_suggest_limit(),
        }
    }
}

fn default_history_window() -> usize {
    12
}

fn default_suggest_limit() -> usize {
    10
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for a daily rolling log file
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Emit JSON lines instead of compact text
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_dir: None,
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
