//! Validator configuration
//!
//! Loaded from a JSON file; every key is optional:
//!
//! ```json
//! { "fragment_mode": "strict", "log_level": "warn" }
//! ```
//!
//! The log threshold is process-wide. It takes effect when a validator is
//! built with `SchemaValidator::with_config` (or on an explicit `apply()`);
//! loading a file never changes it. The last configuration applied wins.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::{log_event_with_fields, Event, Logger, Severity};
use crate::update::FragmentMode;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Settings shared by every operation of a validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Handling of keys without a physical column (default: lenient)
    pub fragment_mode: FragmentMode,
    /// Minimum severity written to the log (default: info)
    pub log_level: Severity,
}

impl ValidatorConfig {
    /// Strict fragment building, other settings default.
    pub fn strict() -> Self {
        Self {
            fragment_mode: FragmentMode::Strict,
            ..Self::default()
        }
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: ValidatorConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let path = path.display().to_string();
        log_event_with_fields(Event::ConfigLoaded, &[("path", &path)]);

        Ok(config)
    }

    /// Applies process-wide settings (the log threshold).
    ///
    /// `SchemaValidator::with_config` calls this; call it directly only when
    /// logging without a validator.
    pub fn apply(&self) {
        Logger::set_min_severity(self.log_level);
    }
}
