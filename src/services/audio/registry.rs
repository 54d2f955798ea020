use std::{collections::HashMap, sync::Arc};

use tracing::{debug, info, instrument};

use super::{
    DeviceEvent, DeviceEventKind, DeviceFlow, DeviceRecord, RawEndpointInfo, RegistryError,
};

/// Read access to the current device records
pub trait DeviceLookup {
    /// Value copy of the record for `pnp_id`
    ///
    /// # Errors
    /// Returns [`RegistryError::DeviceNotFound`] if the id is unknown
    fn create_snapshot(&self, pnp_id: &str) -> Result<DeviceRecord, RegistryError>;
}

/// Receiver of device collection changes
///
/// Called synchronously on the registry's thread, in subscription order.
/// Implementations must not block on I/O.
pub trait DeviceObserver: Send + Sync {
    /// Handle one change; `devices` gives access to the current records
    fn on_device_event(&self, event: &DeviceEvent, devices: &dyn DeviceLookup);
}

/// Canonical map of audio devices keyed by PnP id
///
/// Fed by the audio adapter with raw per-endpoint updates; reduces them to
/// one record per physical device and emits a deduplicated event stream.
#[derive(Default)]
pub struct DeviceRegistry {
    devices: HashMap<String, DeviceRecord>,
    endpoint_ids: HashMap<(DeviceFlow, u32), String>,
    observers: Vec<Arc<dyn DeviceObserver>>,
    active: bool,
}

impl DeviceRegistry {
    /// Create an empty, inactive registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Start emitting events
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Stop emitting events; safe to call repeatedly
    pub fn deactivate(&mut self) {
        if self.active {
            info!("Device registry deactivated");
        }
        self.active = false;
    }

    /// Whether events are currently emitted
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Register an observer; delivery follows registration order
    pub fn subscribe(&mut self, observer: Arc<dyn DeviceObserver>) {
        self.observers.push(observer);
    }

    /// Remove a previously registered observer
    pub fn unsubscribe(&mut self, observer: &Arc<dyn DeviceObserver>) {
        let target = Arc::as_ptr(observer).cast::<()>();
        self.observers
            .retain(|existing| Arc::as_ptr(existing).cast::<()>() != target);
    }

    /// Number of known devices
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Whether no device is known yet
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Copies of all records, ordered by PnP id
    pub fn snapshots(&self) -> Vec<DeviceRecord> {
        let mut records: Vec<DeviceRecord> = self.devices.values().cloned().collect();
        records.sort_by(|a, b| a.pnp_id().cmp(b.pnp_id()));
        records
    }

    /// Merge a discovered or enumerated endpoint into the map
    ///
    /// `kind` is the event emitted when the device or its flow set is new.
    /// An endpoint whose flow the record already carries is a volume update.
    #[instrument(skip(self, raw), fields(index = raw.index, flow = %raw.flow))]
    pub fn on_raw_endpoint_info(&mut self, kind: DeviceEventKind, raw: &RawEndpointInfo) {
        let pnp_id = raw.pnp_id();
        let name = raw.display_name();
        let volume = raw.normalized_volume();
        self.endpoint_ids
            .insert((raw.flow, raw.index), pnp_id.clone());

        let already_carried = self
            .devices
            .get(&pnp_id)
            .is_some_and(|existing| existing.flow().covers(raw.flow));
        if already_carried {
            self.on_volume_sample(&pnp_id, raw.flow, volume);
            return;
        }

        let record = match self.devices.get(&pnp_id) {
            Some(existing) => {
                info!(pnp_id = %pnp_id, "Merging {} endpoint into known device", raw.flow);
                existing.merged_with(name, raw.flow, volume)
            }
            None => DeviceRecord::from_endpoint(pnp_id.clone(), name.to_string(), raw.flow, volume),
        };

        debug!("Device record: {record}");
        self.devices.insert(pnp_id.clone(), record);
        self.notify(kind.with_pnp_id(pnp_id));
    }

    /// Apply a live "changed" notification for an endpoint
    pub fn on_endpoint_changed(&mut self, raw: &RawEndpointInfo) {
        let pnp_id = raw.pnp_id();
        self.endpoint_ids
            .insert((raw.flow, raw.index), pnp_id.clone());
        self.on_volume_sample(&pnp_id, raw.flow, raw.normalized_volume());
    }

    /// Record a volume reading; emits an event only if the value changed
    ///
    /// Returns whether an event was emitted.
    pub fn on_volume_sample(&mut self, pnp_id: &str, flow: DeviceFlow, volume: u16) -> bool {
        let Some(record) = self.devices.get_mut(pnp_id) else {
            debug!(pnp_id, "Volume sample for unknown device ignored");
            return false;
        };

        if !record.flow().covers(flow) {
            debug!(pnp_id, %flow, "Volume sample for a flow the device lacks ignored");
            return false;
        }

        let kind = match flow {
            DeviceFlow::Render => DeviceEventKind::VolumeRenderChanged,
            DeviceFlow::Capture => DeviceEventKind::VolumeCaptureChanged,
            DeviceFlow::RenderAndCapture => return false,
        };

        if record.volume_for(flow) == Some(volume) {
            return false;
        }

        record.set_volume(flow, volume);
        self.notify(kind.with_pnp_id(pnp_id.to_string()));
        true
    }

    /// Handle removal of an endpoint
    ///
    /// The record is kept. A `Detached` event is emitted when the session
    /// index can be resolved to a device.
    pub fn on_endpoint_removed(&mut self, flow: DeviceFlow, index: u32) {
        match self.endpoint_ids.remove(&(flow, index)) {
            Some(pnp_id) => {
                info!(pnp_id = %pnp_id, "{flow} index {index}: removed");
                self.notify(DeviceEvent::Detached(pnp_id));
            }
            None => info!("{flow} index {index}: removed (unknown endpoint)"),
        }
    }

    fn notify(&self, event: DeviceEvent) {
        if !self.active {
            debug!(?event, "Registry inactive, event dropped");
            return;
        }

        for observer in &self.observers {
            observer.on_device_event(&event, self);
        }
    }
}

impl DeviceLookup for DeviceRegistry {
    fn create_snapshot(&self, pnp_id: &str) -> Result<DeviceRecord, RegistryError> {
        self.devices
            .get(pnp_id)
            .cloned()
            .ok_or_else(|| RegistryError::DeviceNotFound(pnp_id.to_string()))
    }
}
