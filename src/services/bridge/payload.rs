use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::services::audio::{DeviceEventKind, DeviceFlow, DeviceRecord};

/// `updateDate` layout: UTC, second precision, no zone suffix
pub const UPDATE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Format a timestamp for the API
pub fn update_date(at: DateTime<Utc>) -> String {
    at.format(UPDATE_DATE_FORMAT).to_string()
}

/// Body of `POST /api/AudioDevices`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicePayload<'a> {
    pub pnp_id: &'a str,
    pub name: &'a str,
    pub flow_type: DeviceFlow,
    pub render_volume: u16,
    pub capture_volume: u16,
    pub update_date: String,
    pub device_message_type: DeviceEventKind,
    pub host_name: &'a str,
}

impl<'a> DevicePayload<'a> {
    /// Describe `record` as reported by `kind`
    pub fn new(
        record: &'a DeviceRecord,
        kind: DeviceEventKind,
        host_name: &'a str,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            pnp_id: record.pnp_id(),
            name: record.name(),
            flow_type: record.flow(),
            render_volume: record.render_volume(),
            capture_volume: record.capture_volume(),
            update_date: update_date(at),
            device_message_type: kind,
            host_name,
        }
    }
}

/// Body of `PUT /api/AudioDevices/{pnpId}/{hostName}`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumePayload {
    pub device_message_type: DeviceEventKind,
    pub volume: u16,
    pub update_date: String,
}
