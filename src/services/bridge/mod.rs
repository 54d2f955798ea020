mod api;
mod host;
mod logging;
mod payload;

#[cfg(test)]
mod tests;

pub use api::ApiEventBridge;
pub use host::{HostIdentity, UNKNOWN_HOST};
pub use logging::LoggingObserver;
pub use payload::{UPDATE_DATE_FORMAT, update_date};

use crate::services::delivery::RequestItem;

/// Destination for built requests
///
/// Must return quickly: it is called on the registry's thread.
pub trait RequestSink: Send + Sync {
    /// Accept `item` for delivery
    fn enqueue(&self, item: RequestItem);
}
