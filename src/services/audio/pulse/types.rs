use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use libpulse_binding::context::subscribe::Operation;
use tokio::sync::mpsc;
use tracing::warn;

use crate::services::audio::{DeviceFlow, DeviceRegistry};

/// Registry shared between the loop and the libpulse callbacks
///
/// Everything runs on the monitor thread, so no locking is involved.
pub type SharedRegistry = Rc<RefCell<DeviceRegistry>>;

/// Channel sender for monitor commands
pub type CommandSender = mpsc::UnboundedSender<MonitorCommand>;

pub(super) type CommandReceiver = mpsc::UnboundedReceiver<MonitorCommand>;

/// Commands accepted by the monitor loop from other threads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorCommand {
    /// Stop monitoring and leave the loop
    Deactivate,
}

/// Sink or source change reported by the subscription
#[derive(Debug, Clone, Copy)]
pub struct EndpointNotification {
    /// Render for sinks, Capture for sources
    pub flow: DeviceFlow,
    /// New, Changed or Removed
    pub operation: Operation,
    /// Session index of the endpoint
    pub index: u32,
}

/// Outstanding list requests of the initial enumeration
///
/// Live notifications are held back until it reaches zero, so the
/// enumeration always lands first.
#[derive(Debug, Clone, Default)]
pub struct EnumerationProgress {
    pending: Rc<Cell<usize>>,
}

impl EnumerationProgress {
    /// Account for one more list request
    pub fn start_one(&self) {
        self.pending.set(self.pending.get() + 1);
    }

    /// Account for a finished list request
    pub fn finish_one(&self) {
        self.pending.set(self.pending.get().saturating_sub(1));
    }

    /// Whether every list request has completed
    pub fn is_complete(&self) -> bool {
        self.pending.get() == 0
    }
}

/// Run `update` against the registry unless it is already borrowed
pub fn with_registry(registry: &SharedRegistry, update: impl FnOnce(&mut DeviceRegistry)) {
    match registry.try_borrow_mut() {
        Ok(mut guard) => update(&mut guard),
        Err(_) => warn!("Device registry busy, update skipped"),
    }
}
