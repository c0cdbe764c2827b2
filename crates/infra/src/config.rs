//! Environment-driven configuration.

use std::path::PathBuf;

use thiserror::Error;
use toolbox_observability::{LogFormat, ObservabilityConfig};

pub const DATA_PATH_VAR: &str = "TOOLBOX_DATA_PATH";
pub const LOG_FILTER_VAR: &str = "TOOLBOX_LOG";
pub const LOG_FORMAT_VAR: &str = "TOOLBOX_LOG_FORMAT";

pub const DEFAULT_DATA_PATH: &str = "toolbox.json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is set but empty")]
    Empty { var: &'static str },

    #[error("{var} has an invalid value: {message}")]
    Invalid { var: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolboxConfig {
    /// Snapshot file used by the JSON file store.
    pub data_path: PathBuf,
    pub observability: ObservabilityConfig,
}

impl Default for ToolboxConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl ToolboxConfig {
    /// Read configuration from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(DATA_PATH_VAR) {
            config.data_path = PathBuf::from(non_empty(DATA_PATH_VAR, path)?);
        }
        if let Some(filter) = lookup(LOG_FILTER_VAR) {
            config.observability.filter = non_empty(LOG_FILTER_VAR, filter)?;
        }
        if let Some(format) = lookup(LOG_FORMAT_VAR) {
            config.observability.format =
                format
                    .parse::<LogFormat>()
                    .map_err(|e| ConfigError::Invalid {
                        var: LOG_FORMAT_VAR,
                        message: e.to_string(),
                    })?;
        }

        Ok(config)
    }
}

fn non_empty(var: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Empty { var });
    }
    Ok(trimmed.to_string())
}
