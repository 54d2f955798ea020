use std::time::Duration;

use reqwest::{
    StatusCode,
    blocking::{Client, RequestBuilder},
    header::CONTENT_TYPE,
};
use tracing::debug;

use super::{DeliveryError, HttpMethod, RequestItem};

/// Sends one request and reports whether the backend accepted it
///
/// Called from the delivery worker only; implementations may block.
pub trait Transport: Send + Sync {
    /// Send `item` to `url`
    ///
    /// # Errors
    /// Returns the [`DeliveryError`] describing why the request was not
    /// accepted
    fn send(&self, url: &str, item: RequestItem) -> Result<(), DeliveryError>;
}

/// Blocking HTTP transport backed by `reqwest`
///
/// Must be created and dropped outside an async context.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a client with the given per-request timeout
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be initialized
    pub fn new(timeout: Duration) -> Result<Self, DeliveryError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DeliveryError::Unexpected {
                hint: "HTTP client setup".to_string(),
                details: e.to_string(),
            })?;

        Ok(Self { client })
    }

    fn builder(&self, method: HttpMethod, url: &str) -> RequestBuilder {
        match method {
            HttpMethod::Post => self.client.post(url),
            HttpMethod::Put => self.client.put(url),
        }
    }
}

impl Transport for HttpTransport {
    fn send(&self, url: &str, item: RequestItem) -> Result<(), DeliveryError> {
        debug!(method = %item.method, url, "Sending request");

        let mut request = self
            .builder(item.method, url)
            .header(CONTENT_TYPE, "application/json");
        for (name, value) in &item.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .body(item.payload)
            .send()
            .map_err(|e| classify(&item.hint, &e))?;

        let status = response.status();
        if is_success(status) {
            Ok(())
        } else {
            Err(DeliveryError::Status {
                hint: item.hint,
                status: status.as_u16(),
            })
        }
    }
}

/// 200, 201 and 204 are the only accepted answers
pub fn is_success(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT
    )
}

fn classify(hint: &str, error: &reqwest::Error) -> DeliveryError {
    if error.is_connect() || error.is_timeout() || error.is_request() {
        DeliveryError::Transport {
            hint: hint.to_string(),
            details: error.to_string(),
        }
    } else {
        DeliveryError::Unexpected {
            hint: hint.to_string(),
            details: error.to_string(),
        }
    }
}
