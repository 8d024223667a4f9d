use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::AppConfig;

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "taskman.toml";

/// Error type for config loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Read the config file. A missing file yields the defaults; a present but
/// malformed one is an error.
pub fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(AppConfig::default());
    }

    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let config: AppConfig = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    validate(&config)?;

    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    if config.storage.file.trim().is_empty() {
        return Err(ConfigError::Invalid("storage.file must not be empty".into()));
    }
    if config.display.title_width == 0 {
        return Err(ConfigError::Invalid(
            "display.title_width must be at least 1".into(),
        ));
    }
    Ok(())
}
