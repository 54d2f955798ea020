use crate::{RelayError, Result};
use std::{fs, path::Path};

const DEFAULT_CONFIG: &str = r#"# soundrelay configuration file

[general]
# error | warn | info | debug | trace
log_level = "info"

[api]
# base_url = "http://localhost:5027"
# universal_token = ""
# codespace_name = ""

[delivery]
success_pause_ms = 200
retry_pause_ms = 1500
max_wake_attempts = 15
max_ignored_failures = 45
request_timeout_secs = 10
"#;

/// Creates a default configuration file, including missing parent directories
pub fn create_default_config_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| RelayError::IoError {
            path: parent.to_path_buf(),
            details: format!("Failed to create config directory: {e}"),
        })?;
    }

    fs::write(path, DEFAULT_CONFIG).map_err(|e| RelayError::IoError {
        path: path.to_path_buf(),
        details: format!("Failed to create config file: {e}"),
    })?;

    Ok(())
}
