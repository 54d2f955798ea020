//! Configuration schema and loading.
//!
//! The configuration is a single TOML file with `[general]`, `[api]` and
//! `[delivery]` sections. Every section has defaults except the API
//! connection values, which are checked when delivery settings are built.

mod api;
mod delivery;
mod general;
mod loading;
mod paths;


pub use api::ApiConfig;
pub use delivery::DeliveryConfig;
pub use general::{GeneralConfig, LogLevel};
pub use paths::ConfigPaths;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{RelayError, Result, services::DeliverySettings};

/// Main configuration structure for soundrelay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    /// General application settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// API connection settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Delivery worker timing.
    #[serde(default)]
    pub delivery: DeliveryConfig,
}

impl Config {
    /// Replace the API base URL, e.g. from the command line
    pub fn override_base_url(&mut self, url: Option<String>) {
        if let Some(url) = url {
            self.api.base_url = Some(url);
        }
    }

    /// Validated settings for the delivery queue
    ///
    /// # Errors
    /// Returns [`RelayError::MissingSetting`] naming the first absent or
    /// empty API value, or [`RelayError::ConfigValidation`] if the wake
    /// limits are inconsistent
    pub fn delivery_settings(&self) -> Result<DeliverySettings> {
        let base_url = required(self.api.base_url.as_deref(), "api.base_url")?;
        let universal_token = required(self.api.universal_token.as_deref(), "api.universal_token")?;
        let codespace_name = required(self.api.codespace_name.as_deref(), "api.codespace_name")?;

        if self.delivery.max_ignored_failures < self.delivery.max_wake_attempts {
            return Err(RelayError::ConfigValidation {
                component: "delivery".to_string(),
                details: format!(
                    "max_ignored_failures ({}) must not be below max_wake_attempts ({})",
                    self.delivery.max_ignored_failures, self.delivery.max_wake_attempts
                ),
            });
        }

        let mut settings = DeliverySettings::new(base_url, universal_token, codespace_name);
        settings.success_pause = Duration::from_millis(self.delivery.success_pause_ms);
        settings.retry_pause = Duration::from_millis(self.delivery.retry_pause_ms);
        settings.max_wake_attempts = self.delivery.max_wake_attempts;
        settings.max_ignored_failures = self.delivery.max_ignored_failures;
        settings.request_timeout = Duration::from_secs(self.delivery.request_timeout_secs);

        Ok(settings)
    }
}

fn required<'a>(value: Option<&'a str>, key: &str) -> Result<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| RelayError::missing(key))
}
