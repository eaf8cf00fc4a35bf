//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result, ResultExt};
use std::path::{Path, PathBuf};

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path or use defaults
    ///
    /// An explicit path must exist. Without one, the standard locations are
    /// searched and defaults are used when none is present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) if !p.exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(),
        };

        let schema = match config_path {
            Some(ref p) => load_config_file(p)?,
            None => ConfigSchema::default(),
        };
        schema.validate()?;

        Ok(Self {
            schema,
            path: config_path,
        })
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    let candidates = [".matprice.toml", "matprice.toml", ".config/matprice.toml"];

    candidates
        .into_iter()
        .map(PathBuf::from)
        .find(|candidate| candidate.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .map_err(Error::from)
        .context(format!("Failed to read config file {}", path.display()))?;

    let schema: ConfigSchema = toml::from_str(&content)
        .map_err(Error::from)
        .context(format!("Failed to parse config file {}", path.display()))?;

    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("matprice.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.path.is_none());
        assert_eq!(config.schema.display.history_window, 12);
        assert!(config.schema.storage.shared_file.is_none());
    }

    #[test]
    fn test_config_load_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "[storage]\ndata_file = \"/tmp/prices.json\"\n\n[display]\nhistory_window = 6\n",
        );

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.schema.storage.data_file, PathBuf::from("/tmp/prices.json"));
        assert_eq!(config.schema.display.history_window, 6);
        assert_eq!(config.schema.display.suggest_limit, 10);
        assert_eq!(config.schema.logging.level, "info");
    }

    #[test]
    fn test_config_explicit_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigNotFound);
    }

    #[test]
    fn test_config_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[display\nhistory_window = ");
        let err = Config::load(Some(&path)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigParseError);
        assert!(err.context.is_some());
    }

    #[test]
    fn test_config_rejects_zero_window() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[display]\nhistory_window = 0\n");
        let err = Config::load(Some(&path)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigValidationError);
        assert!(err.message.contains("display.history_window"));
    }
}
