use serde::{Deserialize, Serialize};

/// Connection settings of the device API.
///
/// All three values are required before delivery can start; they are
/// optional here so that a partially filled file still parses and the
/// missing key can be named in the error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ApiConfig {
    /// Base server URL, e.g. `http://localhost:5027`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Bearer token used to start the codespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub universal_token: Option<String>,

    /// Name of the GitHub Codespace hosting the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codespace_name: Option<String>,
}
