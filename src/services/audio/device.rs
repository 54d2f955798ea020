use std::{collections::BTreeSet, fmt};

use serde::{Serialize, Serializer};

/// Separator between the labels of a device seen under several endpoints
pub const NAME_DELIMITER: char = '|';

/// Direction of audio through a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceFlow {
    /// Output path (a PulseAudio sink)
    Render,
    /// Input path (a PulseAudio source)
    Capture,
    /// A render and a capture endpoint resolved to the same PnP id
    RenderAndCapture,
}

impl DeviceFlow {
    /// Integer code used on the wire
    pub fn wire_code(self) -> u8 {
        match self {
            DeviceFlow::Render => 1,
            DeviceFlow::Capture => 2,
            DeviceFlow::RenderAndCapture => 3,
        }
    }

    /// Whether this flow already includes `other`
    pub fn covers(self, other: DeviceFlow) -> bool {
        self == other || self == DeviceFlow::RenderAndCapture
    }

    /// Union of two flows
    pub fn combine(self, other: DeviceFlow) -> DeviceFlow {
        if self == other {
            self
        } else {
            DeviceFlow::RenderAndCapture
        }
    }
}

impl fmt::Display for DeviceFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceFlow::Render => write!(f, "Render"),
            DeviceFlow::Capture => write!(f, "Capture"),
            DeviceFlow::RenderAndCapture => write!(f, "RenderAndCapture"),
        }
    }
}

impl Serialize for DeviceFlow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.wire_code())
    }
}

/// Canonical state of one physical audio device
///
/// Keyed by PnP id rather than by PulseAudio index: indices are reused
/// across sessions and one device may show up as a sink and a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    pnp_id: String,
    name: String,
    flow: DeviceFlow,
    render_volume: u16,
    capture_volume: u16,
}

impl DeviceRecord {
    /// Create a record from a single endpoint observation
    ///
    /// The volume lands in the field matching `flow`; the other one is 0.
    pub fn from_endpoint(pnp_id: String, name: String, flow: DeviceFlow, volume: u16) -> Self {
        let (render_volume, capture_volume) = match flow {
            DeviceFlow::Render => (volume, 0),
            DeviceFlow::Capture => (0, volume),
            DeviceFlow::RenderAndCapture => (volume, volume),
        };

        Self {
            pnp_id,
            name,
            flow,
            render_volume,
            capture_volume,
        }
    }

    /// Stable hardware identifier
    pub fn pnp_id(&self) -> &str {
        &self.pnp_id
    }

    /// Human readable label, `|`-joined when merged
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Flows this device is known to carry
    pub fn flow(&self) -> DeviceFlow {
        self.flow
    }

    /// Output volume on the 0..=1000 scale
    pub fn render_volume(&self) -> u16 {
        self.render_volume
    }

    /// Input volume on the 0..=1000 scale
    pub fn capture_volume(&self) -> u16 {
        self.capture_volume
    }

    /// Volume stored for `flow`, `None` for the combined flow
    pub fn volume_for(&self, flow: DeviceFlow) -> Option<u16> {
        match flow {
            DeviceFlow::Render => Some(self.render_volume),
            DeviceFlow::Capture => Some(self.capture_volume),
            DeviceFlow::RenderAndCapture => None,
        }
    }

    pub(crate) fn set_volume(&mut self, flow: DeviceFlow, volume: u16) {
        match flow {
            DeviceFlow::Render => self.render_volume = volume,
            DeviceFlow::Capture => self.capture_volume = volume,
            DeviceFlow::RenderAndCapture => {}
        }
    }

    /// Fold an observation of another endpoint of the same device into this
    /// record.
    ///
    /// The volume of the flow not present in the observation is kept.
    pub fn merged_with(&self, name: &str, flow: DeviceFlow, volume: u16) -> Self {
        let mut merged = Self {
            pnp_id: self.pnp_id.clone(),
            name: merge_names(&self.name, name),
            flow: self.flow.combine(flow),
            render_volume: self.render_volume,
            capture_volume: self.capture_volume,
        };
        merged.set_volume(flow, volume);
        merged
    }
}

impl fmt::Display for DeviceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, \"{}\", {}, Volume {} / {}",
            self.pnp_id, self.name, self.flow, self.render_volume, self.capture_volume
        )
    }
}

/// Merge a label into a `|`-joined label set
///
/// The result is deduplicated and sorted, so merge order never changes it.
pub fn merge_names(existing: &str, addition: &str) -> String {
    let mut names: BTreeSet<&str> = existing
        .split(NAME_DELIMITER)
        .filter(|part| !part.is_empty())
        .collect();
    if !addition.is_empty() {
        names.insert(addition);
    }

    names
        .into_iter()
        .collect::<Vec<_>>()
        .join(&NAME_DELIMITER.to_string())
}
