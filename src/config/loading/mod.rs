mod file_creation;

use super::Config;
use crate::{RelayError, Result};
use file_creation::create_default_config_file;
use std::{fs, path::Path};
use tracing::info;

impl Config {
    /// Loads the configuration file at `path`
    ///
    /// A commented default file is written first if none exists.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The default file cannot be created
    /// - The configuration file cannot be read
    /// - The TOML content is invalid
    pub fn load(path: &Path) -> Result<Config> {
        if !path.exists() {
            create_default_config_file(path)?;
            info!("Created default configuration at {}", path.display());
        }

        let content = fs::read_to_string(path).map_err(|e| RelayError::IoError {
            path: path.to_path_buf(),
            details: format!("Failed to read config file: {e}"),
        })?;

        toml::from_str(&content).map_err(|e| RelayError::toml_parse(e, Some(path)))
    }

    /// Parses configuration from a TOML string
    ///
    /// # Errors
    /// Returns error if the TOML content is invalid
    pub fn from_toml_str(content: &str) -> Result<Config> {
        toml::from_str(content).map_err(|e| RelayError::toml_parse(e, None))
    }
}
