#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use crate::services::audio::{
    DeviceEvent, DeviceEventKind, DeviceFlow, DeviceLookup, DeviceObserver, DeviceRecord,
    DeviceRegistry, RawEndpointInfo, RegistryError, merge_names,
    volume::{NORMALIZED_MAX, RAW_MUTED, RAW_NORM, endpoint_volume, normalize_volume},
};

#[derive(Default)]
struct RecordingObserver {
    seen: Mutex<Vec<(DeviceEvent, Option<DeviceRecord>)>>,
}

impl RecordingObserver {
    fn events(&self) -> Vec<DeviceEvent> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|(event, _)| event.clone())
            .collect()
    }

    fn snapshots(&self) -> Vec<Option<DeviceRecord>> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|(_, record)| record.clone())
            .collect()
    }
}

impl DeviceObserver for RecordingObserver {
    fn on_device_event(&self, event: &DeviceEvent, devices: &dyn DeviceLookup) {
        let record = devices.create_snapshot(event.pnp_id()).ok();
        self.seen.lock().unwrap().push((event.clone(), record));
    }
}

fn endpoint(index: u32, flow: DeviceFlow, name: &str, description: &str) -> RawEndpointInfo {
    RawEndpointInfo {
        index,
        flow,
        name: name.to_string(),
        description: description.to_string(),
        raw_volume: RAW_NORM,
        muted: false,
        bus_path: None,
        node_name: None,
    }
}

fn with_bus_path(mut raw: RawEndpointInfo, bus_path: &str) -> RawEndpointInfo {
    raw.bus_path = Some(bus_path.to_string());
    raw
}

fn active_registry() -> (DeviceRegistry, Arc<RecordingObserver>) {
    let observer = Arc::new(RecordingObserver::default());
    let mut registry = DeviceRegistry::new();
    registry.subscribe(observer.clone());
    registry.activate();
    (registry, observer)
}

const HEADSET_BUS: &str = "pci-0000:00:14.0-usb-0:2:1.0";

#[test]
fn normalize_volume_scale_endpoints() {
    assert_eq!(normalize_volume(RAW_MUTED), 0);
    assert_eq!(normalize_volume(RAW_NORM), NORMALIZED_MAX);
    assert_eq!(normalize_volume(RAW_NORM / 2), 500);
}

#[test]
fn normalize_volume_clamps_amplified_volume() {
    assert_eq!(normalize_volume(RAW_NORM + RAW_NORM / 2), NORMALIZED_MAX);
}

#[test]
fn endpoint_volume_is_zero_when_muted() {
    assert_eq!(endpoint_volume(RAW_NORM, true), 0);
    assert_eq!(endpoint_volume(RAW_NORM, false), 1000);
}

#[test]
fn pnp_id_prefers_bus_path() {
    let mut raw = with_bus_path(
        endpoint(3, DeviceFlow::Render, "alsa_output.usb", "Headset"),
        HEADSET_BUS,
    );
    raw.node_name = Some("node".to_string());

    assert_eq!(raw.pnp_id(), HEADSET_BUS);
}

#[test]
fn pnp_id_falls_back_to_node_name_then_name() {
    let mut raw = endpoint(3, DeviceFlow::Render, "alsa_output.usb", "Headset");
    assert_eq!(raw.pnp_id(), "alsa_output.usb");

    raw.node_name = Some("bluez_output.AA_BB".to_string());
    assert_eq!(raw.pnp_id(), "bluez_output.AA_BB");

    raw.bus_path = Some(String::new());
    assert_eq!(raw.pnp_id(), "bluez_output.AA_BB");
}

#[test]
fn pnp_id_strips_monitor_suffix() {
    let raw = endpoint(
        7,
        DeviceFlow::Capture,
        "alsa_output.pci.analog-stereo.monitor",
        "Monitor of Built-in Audio",
    );

    assert_eq!(raw.pnp_id(), "alsa_output.pci.analog-stereo");
    assert_eq!(raw.display_name(), "Built-in Audio");
}

#[test]
fn merge_names_is_sorted_and_deduplicated() {
    assert_eq!(merge_names("Speaker", "Microphone"), "Microphone|Speaker");
    assert_eq!(merge_names("Microphone|Speaker", "Speaker"), "Microphone|Speaker");
    assert_eq!(merge_names("", "Speaker"), "Speaker");
    assert_eq!(
        merge_names(&merge_names("A", "B"), "C"),
        merge_names(&merge_names("C", "A"), "B")
    );
}

#[test]
fn flow_combination() {
    assert_eq!(
        DeviceFlow::Render.combine(DeviceFlow::Capture),
        DeviceFlow::RenderAndCapture
    );
    assert_eq!(DeviceFlow::Render.combine(DeviceFlow::Render), DeviceFlow::Render);
    assert!(DeviceFlow::RenderAndCapture.covers(DeviceFlow::Capture));
    assert!(!DeviceFlow::Render.covers(DeviceFlow::Capture));
}

#[test]
fn wire_codes() {
    assert_eq!(DeviceFlow::Render.wire_code(), 1);
    assert_eq!(DeviceFlow::Capture.wire_code(), 2);
    assert_eq!(DeviceFlow::RenderAndCapture.wire_code(), 3);

    assert_eq!(DeviceEventKind::Discovered.wire_code(), 1);
    assert_eq!(DeviceEventKind::Detached.wire_code(), 2);
    assert_eq!(DeviceEventKind::VolumeRenderChanged.wire_code(), 3);
    assert_eq!(DeviceEventKind::VolumeCaptureChanged.wire_code(), 4);
    assert_eq!(DeviceEventKind::Confirmed.wire_code(), 5);
}

#[test]
fn sink_and_source_of_one_device_merge_into_one_record() {
    let (mut registry, observer) = active_registry();

    let mut sink = with_bus_path(
        endpoint(1, DeviceFlow::Render, "alsa_output.usb", "Headset Speaker"),
        HEADSET_BUS,
    );
    sink.raw_volume = RAW_NORM / 2;
    let source = with_bus_path(
        endpoint(2, DeviceFlow::Capture, "alsa_input.usb", "Headset Microphone"),
        HEADSET_BUS,
    );

    registry.on_raw_endpoint_info(DeviceEventKind::Confirmed, &sink);
    registry.on_raw_endpoint_info(DeviceEventKind::Confirmed, &source);

    assert_eq!(registry.len(), 1);
    let record = registry.create_snapshot(HEADSET_BUS).unwrap();
    assert_eq!(record.flow(), DeviceFlow::RenderAndCapture);
    assert_eq!(record.name(), "Headset Microphone|Headset Speaker");
    assert_eq!(record.render_volume(), 500);
    assert_eq!(record.capture_volume(), 1000);

    assert_eq!(
        observer.events(),
        vec![
            DeviceEvent::Confirmed(HEADSET_BUS.to_string()),
            DeviceEvent::Confirmed(HEADSET_BUS.to_string()),
        ]
    );
}

#[test]
fn observer_sees_record_state_at_event_time() {
    let (mut registry, observer) = active_registry();

    let sink = with_bus_path(endpoint(1, DeviceFlow::Render, "out", "Speaker"), HEADSET_BUS);
    let source = with_bus_path(endpoint(2, DeviceFlow::Capture, "in", "Mic"), HEADSET_BUS);
    registry.on_raw_endpoint_info(DeviceEventKind::Discovered, &sink);
    registry.on_raw_endpoint_info(DeviceEventKind::Discovered, &source);

    let flows: Vec<DeviceFlow> = observer
        .snapshots()
        .into_iter()
        .map(|record| record.unwrap().flow())
        .collect();
    assert_eq!(flows, vec![DeviceFlow::Render, DeviceFlow::RenderAndCapture]);
}

#[test]
fn unchanged_volume_emits_nothing() {
    let (mut registry, observer) = active_registry();
    let sink = endpoint(1, DeviceFlow::Render, "out", "Speaker");
    registry.on_raw_endpoint_info(DeviceEventKind::Confirmed, &sink);

    assert!(!registry.on_volume_sample("out", DeviceFlow::Render, 1000));
    assert!(registry.on_volume_sample("out", DeviceFlow::Render, 420));
    assert!(!registry.on_volume_sample("out", DeviceFlow::Render, 420));

    assert_eq!(
        observer.events(),
        vec![
            DeviceEvent::Confirmed("out".to_string()),
            DeviceEvent::VolumeRenderChanged("out".to_string()),
        ]
    );
    assert_eq!(registry.create_snapshot("out").unwrap().render_volume(), 420);
}

#[test]
fn volume_sample_for_missing_flow_or_device_is_ignored() {
    let (mut registry, observer) = active_registry();
    registry.on_raw_endpoint_info(
        DeviceEventKind::Confirmed,
        &endpoint(1, DeviceFlow::Render, "out", "Speaker"),
    );

    assert!(!registry.on_volume_sample("out", DeviceFlow::Capture, 10));
    assert!(!registry.on_volume_sample("elsewhere", DeviceFlow::Render, 10));
    assert_eq!(observer.events().len(), 1);
}

#[test]
fn discovery_of_known_endpoint_is_a_volume_update() {
    let (mut registry, observer) = active_registry();
    let mut sink = endpoint(1, DeviceFlow::Render, "out", "Speaker");
    registry.on_raw_endpoint_info(DeviceEventKind::Confirmed, &sink);

    registry.on_raw_endpoint_info(DeviceEventKind::Discovered, &sink);
    assert_eq!(observer.events().len(), 1);

    sink.muted = true;
    registry.on_raw_endpoint_info(DeviceEventKind::Discovered, &sink);

    assert_eq!(registry.len(), 1);
    assert_eq!(
        observer.events(),
        vec![
            DeviceEvent::Confirmed("out".to_string()),
            DeviceEvent::VolumeRenderChanged("out".to_string()),
        ]
    );
    assert_eq!(registry.create_snapshot("out").unwrap().render_volume(), 0);
}

#[test]
fn changed_endpoint_updates_capture_volume() {
    let (mut registry, observer) = active_registry();
    let mut source = endpoint(4, DeviceFlow::Capture, "in", "Mic");
    registry.on_raw_endpoint_info(DeviceEventKind::Confirmed, &source);

    source.raw_volume = RAW_MUTED;
    registry.on_endpoint_changed(&source);

    assert_eq!(
        observer.events().last(),
        Some(&DeviceEvent::VolumeCaptureChanged("in".to_string()))
    );
    assert_eq!(registry.create_snapshot("in").unwrap().capture_volume(), 0);
}

#[test]
fn removal_emits_detached_and_keeps_record() {
    let (mut registry, observer) = active_registry();
    registry.on_raw_endpoint_info(
        DeviceEventKind::Confirmed,
        &endpoint(9, DeviceFlow::Render, "out", "Speaker"),
    );

    registry.on_endpoint_removed(DeviceFlow::Render, 9);
    registry.on_endpoint_removed(DeviceFlow::Render, 9);
    registry.on_endpoint_removed(DeviceFlow::Capture, 9);

    assert_eq!(
        observer.events(),
        vec![
            DeviceEvent::Confirmed("out".to_string()),
            DeviceEvent::Detached("out".to_string()),
        ]
    );
    assert_eq!(registry.len(), 1);
}

#[test]
fn inactive_registry_updates_state_silently() {
    let observer = Arc::new(RecordingObserver::default());
    let mut registry = DeviceRegistry::new();
    registry.subscribe(observer.clone());

    registry.on_raw_endpoint_info(
        DeviceEventKind::Confirmed,
        &endpoint(1, DeviceFlow::Render, "out", "Speaker"),
    );

    assert_eq!(registry.len(), 1);
    assert!(observer.events().is_empty());
}

#[test]
fn deactivate_is_idempotent_and_stops_events() {
    let (mut registry, observer) = active_registry();
    registry.deactivate();
    registry.deactivate();
    assert!(!registry.is_active());

    registry.on_raw_endpoint_info(
        DeviceEventKind::Discovered,
        &endpoint(1, DeviceFlow::Render, "out", "Speaker"),
    );
    assert!(observer.events().is_empty());
}

#[test]
fn unsubscribed_observer_receives_nothing() {
    let (mut registry, observer) = active_registry();
    let second = Arc::new(RecordingObserver::default());
    let second_dyn: Arc<dyn DeviceObserver> = second.clone();
    registry.subscribe(second_dyn.clone());

    registry.on_raw_endpoint_info(
        DeviceEventKind::Confirmed,
        &endpoint(1, DeviceFlow::Render, "out", "Speaker"),
    );
    registry.unsubscribe(&second_dyn);
    registry.on_volume_sample("out", DeviceFlow::Render, 5);

    assert_eq!(observer.events().len(), 2);
    assert_eq!(second.events().len(), 1);
}

#[test]
fn snapshot_of_unknown_device_fails() {
    let registry = DeviceRegistry::new();

    assert_eq!(
        registry.create_snapshot("missing"),
        Err(RegistryError::DeviceNotFound("missing".to_string()))
    );
}

#[test]
fn snapshots_are_sorted_by_pnp_id() {
    let mut registry = DeviceRegistry::new();
    registry.on_raw_endpoint_info(
        DeviceEventKind::Confirmed,
        &endpoint(1, DeviceFlow::Render, "zeta", "Z"),
    );
    registry.on_raw_endpoint_info(
        DeviceEventKind::Confirmed,
        &endpoint(2, DeviceFlow::Capture, "alpha", "A"),
    );

    let ids: Vec<String> = registry
        .snapshots()
        .iter()
        .map(|record| record.pnp_id().to_string())
        .collect();
    assert_eq!(ids, vec!["alpha", "zeta"]);
}

#[test]
fn record_display() {
    let record = DeviceRecord::from_endpoint(
        "usb-1".to_string(),
        "Headset".to_string(),
        DeviceFlow::Capture,
        300,
    );

    assert_eq!(record.to_string(), format!("usb-1, \"Headset\", {}, Volume 0 / 300", DeviceFlow::Capture));
}
