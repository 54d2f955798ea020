use tracing::{info, warn};

use crate::services::audio::{DeviceEvent, DeviceLookup, DeviceObserver};

/// Observer that only writes events to the log
#[derive(Debug, Default)]
pub struct LoggingObserver;

impl DeviceObserver for LoggingObserver {
    fn on_device_event(&self, event: &DeviceEvent, devices: &dyn DeviceLookup) {
        match devices.create_snapshot(event.pnp_id()) {
            Ok(record) => info!("{}: {record}", event.kind()),
            Err(e) => warn!("{}: {e}", event.kind()),
        }
    }
}
