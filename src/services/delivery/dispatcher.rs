use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use super::{DeliverySettings, RequestItem, Transport};

/// Result of one delivery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The backend accepted the request
    Delivered,
    /// The backend is being woken; the copy goes back to the queue head
    Requeue(RequestItem),
    /// The backend did not wake up; the request is dropped
    Abandoned,
    /// The backend cannot be woken; the request is dropped straight away
    Skipped,
}

/// Retry state machine of the delivery worker
///
/// Sends one item at a time and decides its fate. Owns the consecutive
/// failure counter that drives codespace wake-up; sleeping between
/// attempts is left to the caller.
pub struct Dispatcher {
    settings: DeliverySettings,
    transport: Arc<dyn Transport>,
    wake_attempts: u32,
}

impl Dispatcher {
    /// Create a dispatcher with a zeroed failure counter
    pub fn new(settings: DeliverySettings, transport: Arc<dyn Transport>) -> Self {
        Self {
            settings,
            transport,
            wake_attempts: 0,
        }
    }

    /// Backend configuration in use
    pub fn settings(&self) -> &DeliverySettings {
        &self.settings
    }

    /// Consecutive failures counted toward waking the backend
    pub fn wake_attempts(&self) -> u32 {
        self.wake_attempts
    }

    /// Attempt delivery of `item`
    pub fn dispatch(&mut self, item: RequestItem) -> DispatchOutcome {
        info!("Processing request: {}", item.hint);

        let url = self.settings.url_for(&item.url_suffix);
        let error = match self.transport.send(&url, item.clone()) {
            Ok(()) => {
                info!("Sent successfully: {}", item.hint);
                self.wake_attempts = 0;
                return DispatchOutcome::Delivered;
            }
            Err(error) => error,
        };
        warn!("{error}");

        if !self.settings.is_wake_eligible() {
            warn!(
                "Request sending to \"{}\" unsuccessful. Wake up makes no sense. Skipping request.",
                self.settings.resource_url
            );
            return DispatchOutcome::Skipped;
        }

        self.wake_attempts += 1;
        if self.wake_attempts <= self.settings.max_wake_attempts {
            self.wake_backend();
            return DispatchOutcome::Requeue(item);
        }

        if self.wake_attempts > self.settings.max_ignored_failures {
            info!("Wake-up cooldown over, counter reset");
            self.wake_attempts = 0;
        }
        warn!(
            attempts = self.wake_attempts,
            "Backend did not wake up, dropping: {}", item.hint
        );
        DispatchOutcome::Abandoned
    }

    /// Request a codespace start
    pub fn wake_request(&self) -> RequestItem {
        let payload = json!({ "codespace_name": self.settings.codespace_name }).to_string();

        RequestItem::post(
            payload,
            format!(
                "awaking a backend {} / {}",
                self.wake_attempts, self.settings.max_wake_attempts
            ),
        )
        .with_header(
            "Authorization",
            format!("Bearer {}", self.settings.universal_token),
        )
        .with_header("Accept", "application/vnd.github.v3+json")
    }

    fn wake_backend(&self) {
        let wake = self.wake_request();
        info!("Processing request: {}", wake.hint);

        match self.transport.send(&self.settings.wake_url(), wake.clone()) {
            Ok(()) => info!("Sent successfully: {}", wake.hint),
            Err(error) => warn!("{error}"),
        }
    }
}
