use std::fmt;

use serde::{Serialize, Serializer};

/// Kind of a device collection change, without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceEventKind {
    /// Seen through a live "new endpoint" notification
    Discovered,
    /// Seen through the initial enumeration
    Confirmed,
    /// Output volume changed
    VolumeRenderChanged,
    /// Input volume changed
    VolumeCaptureChanged,
    /// An endpoint of the device went away
    Detached,
}

impl DeviceEventKind {
    /// Integer code used on the wire
    pub fn wire_code(self) -> u8 {
        match self {
            DeviceEventKind::Discovered => 1,
            DeviceEventKind::Detached => 2,
            DeviceEventKind::VolumeRenderChanged => 3,
            DeviceEventKind::VolumeCaptureChanged => 4,
            DeviceEventKind::Confirmed => 5,
        }
    }

    /// Attach a device id to this kind
    pub fn with_pnp_id(self, pnp_id: String) -> DeviceEvent {
        match self {
            DeviceEventKind::Discovered => DeviceEvent::Discovered(pnp_id),
            DeviceEventKind::Confirmed => DeviceEvent::Confirmed(pnp_id),
            DeviceEventKind::VolumeRenderChanged => DeviceEvent::VolumeRenderChanged(pnp_id),
            DeviceEventKind::VolumeCaptureChanged => DeviceEvent::VolumeCaptureChanged(pnp_id),
            DeviceEventKind::Detached => DeviceEvent::Detached(pnp_id),
        }
    }
}

impl fmt::Display for DeviceEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceEventKind::Discovered => "Discovered",
            DeviceEventKind::Confirmed => "Confirmed",
            DeviceEventKind::VolumeRenderChanged => "VolumeRenderChanged",
            DeviceEventKind::VolumeCaptureChanged => "VolumeCaptureChanged",
            DeviceEventKind::Detached => "Detached",
        };
        write!(f, "{name}")
    }
}

impl Serialize for DeviceEventKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.wire_code())
    }
}

/// Notification that a device changed
///
/// Carries only the PnP id. Receivers fetch the current record from the
/// registry, so a queued event never holds stale device state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    /// A new device appeared while monitoring
    Discovered(String),
    /// A device was reported by the initial enumeration
    Confirmed(String),
    /// Output volume changed
    VolumeRenderChanged(String),
    /// Input volume changed
    VolumeCaptureChanged(String),
    /// An endpoint of the device was removed
    Detached(String),
}

impl DeviceEvent {
    /// PnP id of the affected device
    pub fn pnp_id(&self) -> &str {
        match self {
            DeviceEvent::Discovered(id)
            | DeviceEvent::Confirmed(id)
            | DeviceEvent::VolumeRenderChanged(id)
            | DeviceEvent::VolumeCaptureChanged(id)
            | DeviceEvent::Detached(id) => id,
        }
    }

    /// Payload-free kind of this event
    pub fn kind(&self) -> DeviceEventKind {
        match self {
            DeviceEvent::Discovered(_) => DeviceEventKind::Discovered,
            DeviceEvent::Confirmed(_) => DeviceEventKind::Confirmed,
            DeviceEvent::VolumeRenderChanged(_) => DeviceEventKind::VolumeRenderChanged,
            DeviceEvent::VolumeCaptureChanged(_) => DeviceEventKind::VolumeCaptureChanged,
            DeviceEvent::Detached(_) => DeviceEventKind::Detached,
        }
    }
}
