use std::time::Duration;

/// Path of the device collection below the API base URL
pub const DEVICES_PATH: &str = "/api/AudioDevices";

/// GitHub REST API root used for codespace wake-up
pub const GITHUB_API_URL: &str = "https://api.github.com";

const WAKE_ELIGIBLE_MARKER: &str = ".github.";

/// Pause after a delivered request
pub const DEFAULT_SUCCESS_PAUSE: Duration = Duration::from_millis(200);
/// Pause after a failed request
pub const DEFAULT_RETRY_PAUSE: Duration = Duration::from_millis(1500);
/// Consecutive failures that still trigger a wake request
pub const DEFAULT_MAX_WAKE_ATTEMPTS: u32 = 15;
/// Failure count at which the wake counter starts over
pub const DEFAULT_MAX_IGNORED_FAILURES: u32 = 45;
/// Per-request client timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything the delivery worker needs to know about its backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliverySettings {
    /// Collection URL, e.g. `http://host:5027/api/AudioDevices`
    pub resource_url: String,
    /// Bearer token for the wake request
    pub universal_token: String,
    /// Codespace started by the wake request
    pub codespace_name: String,
    /// Root of the GitHub REST API
    pub wake_api_url: String,
    /// Pause after a delivered request
    pub success_pause: Duration,
    /// Pause after a failed request
    pub retry_pause: Duration,
    /// Consecutive failures that still trigger a wake request
    pub max_wake_attempts: u32,
    /// Failure count at which the wake counter starts over
    pub max_ignored_failures: u32,
    /// Per-request client timeout
    pub request_timeout: Duration,
}

impl DeliverySettings {
    /// Settings with default timings for the API at `base_url`
    ///
    /// A trailing slash is dropped before the collection path is appended.
    pub fn new(
        base_url: &str,
        universal_token: impl Into<String>,
        codespace_name: impl Into<String>,
    ) -> Self {
        Self {
            resource_url: format!("{}{DEVICES_PATH}", base_url.trim_end_matches('/')),
            universal_token: universal_token.into(),
            codespace_name: codespace_name.into(),
            wake_api_url: GITHUB_API_URL.to_string(),
            success_pause: DEFAULT_SUCCESS_PAUSE,
            retry_pause: DEFAULT_RETRY_PAUSE,
            max_wake_attempts: DEFAULT_MAX_WAKE_ATTEMPTS,
            max_ignored_failures: DEFAULT_MAX_IGNORED_FAILURES,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Whether the backend is a GitHub Codespace that may need waking
    pub fn is_wake_eligible(&self) -> bool {
        self.resource_url.contains(WAKE_ELIGIBLE_MARKER)
    }

    /// Full URL for a request suffix
    pub fn url_for(&self, url_suffix: &str) -> String {
        format!("{}{url_suffix}", self.resource_url)
    }

    /// Codespace start endpoint
    pub fn wake_url(&self) -> String {
        format!(
            "{}/user/codespaces/{}/start",
            self.wake_api_url.trim_end_matches('/'),
            self.codespace_name
        )
    }
}
