use super::{DeviceFlow, volume::endpoint_volume};

/// Property holding the hardware bus path of an endpoint
pub const BUS_PATH_PROPERTY: &str = "device.bus_path";

/// Property holding the logical node name of an endpoint
pub const NODE_NAME_PROPERTY: &str = "node.name";

const MONITOR_SUFFIX: &str = ".monitor";
const MONITOR_PREFIX: &str = "Monitor of ";

/// One sink or source as reported by the audio subsystem
///
/// Plain data, decoupled from libpulse types so the merge logic can run
/// without a sound server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEndpointInfo {
    /// Session index assigned by the sound server; not an identity
    pub index: u32,
    /// Render for sinks, Capture for sources
    pub flow: DeviceFlow,
    /// Internal endpoint name, e.g. `alsa_output.pci-0000_00_1f.3.analog-stereo`
    pub name: String,
    /// Human readable description
    pub description: String,
    /// Average raw volume over all channels
    pub raw_volume: u32,
    /// Mute switch
    pub muted: bool,
    /// `device.bus_path` property, if present
    pub bus_path: Option<String>,
    /// `node.name` property, if present
    pub node_name: Option<String>,
}

impl RawEndpointInfo {
    /// Stable identifier of the physical device behind this endpoint
    ///
    /// Precedence: bus path, then `node.name`, then the endpoint name. The
    /// monitor suffix is stripped from names so a sink's monitor source
    /// resolves to the sink's id.
    pub fn pnp_id(&self) -> String {
        if let Some(bus_path) = non_empty(self.bus_path.as_deref()) {
            return bus_path.to_string();
        }

        let logical = non_empty(self.node_name.as_deref()).unwrap_or(&self.name);
        strip_monitor_suffix(logical).to_string()
    }

    /// Label without the "Monitor of " prefix
    pub fn display_name(&self) -> &str {
        self.description
            .strip_prefix(MONITOR_PREFIX)
            .unwrap_or(&self.description)
    }

    /// Volume on the 0..=1000 scale, 0 when muted
    pub fn normalized_volume(&self) -> u16 {
        endpoint_volume(self.raw_volume, self.muted)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn strip_monitor_suffix(name: &str) -> &str {
    name.strip_suffix(MONITOR_SUFFIX).unwrap_or(name)
}
