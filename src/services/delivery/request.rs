use std::fmt;

/// HTTP verb of a queued request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// Create a resource
    Post,
    /// Update a resource
    Put,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Post => write!(f, "POST"),
            HttpMethod::Put => write!(f, "PUT"),
        }
    }
}

/// One outbound call, owned by the queue until a terminal outcome
///
/// Cloned before every send so a retry always starts from the original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestItem {
    /// HTTP verb
    pub method: HttpMethod,
    /// Path appended to the resource URL; empty for the collection itself
    pub url_suffix: String,
    /// Serialized JSON body
    pub payload: String,
    /// Headers sent in addition to `Content-Type: application/json`
    pub headers: Vec<(String, String)>,
    /// Human readable description used in logs
    pub hint: String,
}

impl RequestItem {
    /// POST of `payload` to the collection URL
    pub fn post(payload: String, hint: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            url_suffix: String::new(),
            payload,
            headers: Vec::new(),
            hint: hint.into(),
        }
    }

    /// PUT of `payload` to `url_suffix` below the collection URL
    pub fn put(url_suffix: String, payload: String, hint: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Put,
            url_suffix,
            payload,
            headers: Vec::new(),
            hint: hint.into(),
        }
    }

    /// Add a header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}
