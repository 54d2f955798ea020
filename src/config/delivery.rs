use serde::{Deserialize, Serialize};

/// Timing and retry limits of the delivery worker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Pause after a delivered request, in milliseconds.
    pub success_pause_ms: u64,

    /// Pause after a failed request, in milliseconds.
    pub retry_pause_ms: u64,

    /// Consecutive failures that still send a codespace wake request.
    pub max_wake_attempts: u32,

    /// Failure count after which the wake counter starts over.
    pub max_ignored_failures: u32,

    /// HTTP client timeout, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            success_pause_ms: 200,
            retry_pause_ms: 1500,
            max_wake_attempts: 15,
            max_ignored_failures: 45,
            request_timeout_secs: 10,
        }
    }
}
