use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{error, info, warn};

use super::{
    HostIdentity, RequestSink,
    payload::{DevicePayload, VolumePayload, update_date},
};
use crate::services::{
    audio::{DeviceEvent, DeviceEventKind, DeviceFlow, DeviceLookup, DeviceObserver},
    delivery::RequestItem,
};

const DISCOVERY_HINT_PREFIX: &str = "(by device discovery) ";
const ENUMERATION_HINT_PREFIX: &str = "(by device info requesting) ";

/// Forwards device events to the REST API
///
/// Runs on the registry's thread: it only builds requests and hands them
/// to the sink, never touching the network itself.
pub struct ApiEventBridge {
    host: HostIdentity,
    sink: Arc<dyn RequestSink>,
}

impl ApiEventBridge {
    /// Bridge reporting as `host` into `sink`
    pub fn new(host: HostIdentity, sink: Arc<dyn RequestSink>) -> Self {
        Self { host, sink }
    }

    /// Identity used in payloads and URLs
    pub fn host(&self) -> &HostIdentity {
        &self.host
    }

    fn post_device(&self, kind: DeviceEventKind, pnp_id: &str, devices: &dyn DeviceLookup) {
        let record = match devices.create_snapshot(pnp_id) {
            Ok(record) => record,
            Err(e) => {
                warn!("Cannot post device data: {e}");
                return;
            }
        };

        let prefix = match kind {
            DeviceEventKind::Discovered => DISCOVERY_HINT_PREFIX,
            _ => ENUMERATION_HINT_PREFIX,
        };
        let payload = DevicePayload::new(&record, kind, self.host.host_name(), Utc::now());
        let hint = format!("{prefix}Post a device: {pnp_id}");

        if let Some(body) = serialize(&payload, &hint) {
            self.submit(RequestItem::post(body, hint));
        }
    }

    fn put_volume(&self, kind: DeviceEventKind, pnp_id: &str, devices: &dyn DeviceLookup) {
        let flow = match kind {
            DeviceEventKind::VolumeRenderChanged => DeviceFlow::Render,
            _ => DeviceFlow::Capture,
        };
        let volume = match devices.create_snapshot(pnp_id) {
            Ok(record) => record.volume_for(flow).unwrap_or_default(),
            Err(e) => {
                warn!("Cannot put volume change: {e}");
                return;
            }
        };

        let payload = VolumePayload {
            device_message_type: kind,
            volume,
            update_date: update_date(Utc::now()),
        };
        let hint = format!("Volume change (PUT) for a device: {pnp_id}");
        let suffix = format!("/{pnp_id}/{}", self.host.host_name());

        if let Some(body) = serialize(&payload, &hint) {
            self.submit(RequestItem::put(suffix, body, hint));
        }
    }

    fn submit(&self, item: RequestItem) {
        info!("Enqueueing: {}...", item.hint);
        self.sink.enqueue(item);
    }
}

impl DeviceObserver for ApiEventBridge {
    fn on_device_event(&self, event: &DeviceEvent, devices: &dyn DeviceLookup) {
        let kind = event.kind();
        let pnp_id = event.pnp_id();
        info!("Event caught: {kind}, device PnP id: {pnp_id}.");

        match kind {
            DeviceEventKind::Discovered | DeviceEventKind::Confirmed => {
                self.post_device(kind, pnp_id, devices);
            }
            DeviceEventKind::VolumeRenderChanged | DeviceEventKind::VolumeCaptureChanged => {
                self.put_volume(kind, pnp_id, devices);
            }
            DeviceEventKind::Detached => {
                info!("Device detached, not reported: {pnp_id}");
            }
        }
    }
}

fn serialize<T: Serialize>(payload: &T, hint: &str) -> Option<String> {
    match serde_json::to_string(payload) {
        Ok(body) => Some(body),
        Err(e) => {
            error!("Cannot serialize payload for {hint}: {e}");
            None
        }
    }
}
