use std::io;

/// Delivery failures
///
/// Every variant takes the same retry branch in the worker; the split only
/// matters for logging.
#[derive(thiserror::Error, Debug)]
pub enum DeliveryError {
    /// Connection refused, DNS failure or timeout
    #[error("HTTP exception: {hint}: {details}")]
    Transport {
        /// Request description
        hint: String,
        /// Underlying client error
        details: String,
    },

    /// The server answered with a non-success status
    #[error("Failed to post data {hint} - Status code: {status}")]
    Status {
        /// Request description
        hint: String,
        /// HTTP status code received
        status: u16,
    },

    /// Any other client failure
    #[error("Common exception while sending HTTP request: {hint}: {details}")]
    Unexpected {
        /// Request description
        hint: String,
        /// Underlying client error
        details: String,
    },

    /// The worker thread could not be started
    #[error("Failed to spawn delivery worker: {0}")]
    WorkerSpawn(#[source] io::Error),
}
