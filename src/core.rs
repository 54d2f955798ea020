use std::{
    fmt, io,
    path::{Path, PathBuf},
    result,
};

use thiserror::Error;

use crate::services::{DeliveryError, PulseError};

/// Error types for the soundrelay application.
///
/// Covers configuration loading and validation, plus the fatal errors of
/// the monitoring and delivery subsystems that end the process.
#[derive(Error, Debug)]
pub enum RelayError {
    /// A required setting is absent from both the config file and the CLI
    #[error("FATAL: no \"{key}\" setting configured")]
    MissingSetting {
        /// Dotted key of the setting, e.g. `api.base_url`
        key: String,
    },

    /// Configuration validation error
    #[error("configuration validation failed for '{component}': {details}")]
    ConfigValidation {
        /// Component that failed validation
        component: String,
        /// Validation error details
        details: String,
    },

    /// I/O operation error
    #[error("I/O error on '{path}': {details}")]
    IoError {
        /// Path where I/O error occurred
        path: PathBuf,
        /// I/O error details
        details: String,
    },

    /// Standard I/O operation error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// TOML parsing error with location context
    #[error("failed to parse TOML at '{location}': {details}")]
    TomlParseError {
        /// Location of TOML being parsed (file path or "string")
        location: String,
        /// Parse error details
        details: String,
    },

    /// The audio subsystem adapter failed
    #[error(transparent)]
    Pulse(#[from] PulseError),

    /// The delivery queue could not be started
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

/// A specialized `Result` type for soundrelay operations.
pub type Result<T> = result::Result<T, RelayError>;

impl RelayError {
    /// Creates a TOML parsing error with optional file path context.
    ///
    /// # Arguments
    ///
    /// * `error` - The underlying parsing error
    /// * `path` - Optional path to the file that failed to parse
    pub fn toml_parse(error: impl fmt::Display, path: Option<&Path>) -> Self {
        let location = match path {
            Some(p) => {
                let clean_path = p.canonicalize().unwrap_or_else(|_| p.to_path_buf());
                clean_path.to_string_lossy().to_string()
            }
            None => "string".to_string(),
        };

        RelayError::TomlParseError {
            location,
            details: error.to_string(),
        }
    }

    /// Creates a missing-setting error for the given dotted key.
    pub fn missing(key: &str) -> Self {
        RelayError::MissingSetting {
            key: key.to_string(),
        }
    }
}
