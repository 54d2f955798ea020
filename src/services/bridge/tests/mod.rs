#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use chrono::{NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use crate::services::{
    audio::{
        DeviceEvent, DeviceEventKind, DeviceFlow, DeviceObserver, DeviceRegistry,
        RawEndpointInfo, volume::RAW_NORM,
    },
    bridge::{
        ApiEventBridge, HostIdentity, LoggingObserver, RequestSink, UNKNOWN_HOST,
        UPDATE_DATE_FORMAT, update_date,
    },
    delivery::{HttpMethod, RequestItem},
};

#[derive(Default)]
struct RecordingSink {
    items: Mutex<Vec<RequestItem>>,
}

impl RecordingSink {
    fn items(&self) -> Vec<RequestItem> {
        self.items.lock().unwrap().clone()
    }
}

impl RequestSink for RecordingSink {
    fn enqueue(&self, item: RequestItem) {
        self.items.lock().unwrap().push(item);
    }
}

fn bridged_registry() -> (DeviceRegistry, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let bridge = ApiEventBridge::new(HostIdentity::new("workstation", "Linux"), sink.clone());
    let mut registry = DeviceRegistry::new();
    registry.subscribe(Arc::new(bridge));
    registry.activate();
    (registry, sink)
}

fn speaker() -> RawEndpointInfo {
    RawEndpointInfo {
        index: 0,
        flow: DeviceFlow::Render,
        name: "alsa_output.usb-headset".to_string(),
        description: "USB Headset".to_string(),
        raw_volume: RAW_NORM,
        muted: false,
        bus_path: Some("pci-0000:00:14.0-usb-0:2:1.0".to_string()),
        node_name: None,
    }
}

fn body(item: &RequestItem) -> Value {
    serde_json::from_str(&item.payload).unwrap()
}

#[test]
fn host_identity_is_upper_cased() {
    let host = HostIdentity::new("workstation-01", "Arch Linux");

    assert_eq!(host.host_name(), "WORKSTATION-01");
    assert_eq!(host.os_name(), "Arch Linux");
}

#[test]
fn blank_host_name_falls_back() {
    assert_eq!(HostIdentity::new("  ", "Linux").host_name(), UNKNOWN_HOST);
}

#[test]
fn update_date_has_second_precision_without_zone() {
    let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();

    assert_eq!(update_date(at), "2024-03-09T07:05:01");
}

#[test]
fn confirmed_device_is_posted() {
    let (mut registry, sink) = bridged_registry();

    registry.on_raw_endpoint_info(DeviceEventKind::Confirmed, &speaker());

    let items = sink.items();
    assert_eq!(items.len(), 1);
    let item = &items[0];
    assert_eq!(item.method, HttpMethod::Post);
    assert_eq!(item.url_suffix, "");
    assert_eq!(
        item.hint,
        "(by device info requesting) Post a device: pci-0000:00:14.0-usb-0:2:1.0"
    );

    let json = body(item);
    assert_eq!(json["pnpId"], "pci-0000:00:14.0-usb-0:2:1.0");
    assert_eq!(json["name"], "USB Headset");
    assert_eq!(json["flowType"], 1);
    assert_eq!(json["renderVolume"], 1000);
    assert_eq!(json["captureVolume"], 0);
    assert_eq!(json["deviceMessageType"], 5);
    assert_eq!(json["hostName"], "WORKSTATION");
    let date = json["updateDate"].as_str().unwrap();
    assert!(NaiveDateTime::parse_from_str(date, UPDATE_DATE_FORMAT).is_ok());
}

#[test]
fn discovered_device_uses_discovery_hint() {
    let (mut registry, sink) = bridged_registry();

    registry.on_raw_endpoint_info(DeviceEventKind::Discovered, &speaker());

    let items = sink.items();
    assert_eq!(
        items[0].hint,
        "(by device discovery) Post a device: pci-0000:00:14.0-usb-0:2:1.0"
    );
    assert_eq!(body(&items[0])["deviceMessageType"], 1);
}

#[test]
fn volume_change_is_put_to_device_url() {
    let (mut registry, sink) = bridged_registry();
    registry.on_raw_endpoint_info(DeviceEventKind::Confirmed, &speaker());

    registry.on_volume_sample("pci-0000:00:14.0-usb-0:2:1.0", DeviceFlow::Render, 350);

    let items = sink.items();
    assert_eq!(items.len(), 2);
    let item = &items[1];
    assert_eq!(item.method, HttpMethod::Put);
    assert_eq!(item.url_suffix, "/pci-0000:00:14.0-usb-0:2:1.0/WORKSTATION");
    assert_eq!(
        item.hint,
        "Volume change (PUT) for a device: pci-0000:00:14.0-usb-0:2:1.0"
    );

    let json = body(item);
    assert_eq!(json["deviceMessageType"], 3);
    assert_eq!(json["volume"], 350);
    assert!(json.get("pnpId").is_none());
}

#[test]
fn detached_device_is_not_forwarded() {
    let (mut registry, sink) = bridged_registry();
    registry.on_raw_endpoint_info(DeviceEventKind::Confirmed, &speaker());

    registry.on_endpoint_removed(DeviceFlow::Render, 0);

    assert_eq!(sink.items().len(), 1);
}

#[test]
fn unknown_device_enqueues_nothing() {
    let sink = Arc::new(RecordingSink::default());
    let bridge = ApiEventBridge::new(HostIdentity::new("host", "Linux"), sink.clone());
    let registry = DeviceRegistry::new();

    bridge.on_device_event(&DeviceEvent::Confirmed("ghost".to_string()), &registry);
    bridge.on_device_event(
        &DeviceEvent::VolumeCaptureChanged("ghost".to_string()),
        &registry,
    );

    assert!(sink.items().is_empty());
}

#[test]
fn logging_observer_tolerates_unknown_device() {
    let registry = DeviceRegistry::new();

    LoggingObserver.on_device_event(&DeviceEvent::Detached("ghost".to_string()), &registry);
}
