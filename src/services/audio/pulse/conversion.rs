use std::borrow::Cow;

use libpulse_binding::{
    context::introspect::{SinkInfo, SourceInfo},
    proplist::Proplist,
};

use crate::services::audio::{
    BUS_PATH_PROPERTY, DeviceFlow, NODE_NAME_PROPERTY, RawEndpointInfo, volume::average_raw,
};

fn cow_str_to_string(cow_str: Option<&Cow<str>>) -> String {
    cow_str.map(|s| s.to_string()).unwrap_or_default()
}

fn describe(description: Option<&Cow<str>>, name: &str) -> String {
    match description {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => name.to_string(),
    }
}

fn property(proplist: &Proplist, key: &str) -> Option<String> {
    proplist.get_str(key).filter(|value| !value.is_empty())
}

/// Create raw endpoint info from PulseAudio sink information
pub fn endpoint_from_sink(sink_info: &SinkInfo<'_>) -> RawEndpointInfo {
    let name = cow_str_to_string(sink_info.name.as_ref());

    RawEndpointInfo {
        index: sink_info.index,
        flow: DeviceFlow::Render,
        description: describe(sink_info.description.as_ref(), &name),
        name,
        raw_volume: average_raw(&sink_info.volume),
        muted: sink_info.mute,
        bus_path: property(&sink_info.proplist, BUS_PATH_PROPERTY),
        node_name: property(&sink_info.proplist, NODE_NAME_PROPERTY),
    }
}

/// Create raw endpoint info from PulseAudio source information
pub fn endpoint_from_source(source_info: &SourceInfo<'_>) -> RawEndpointInfo {
    let name = cow_str_to_string(source_info.name.as_ref());

    RawEndpointInfo {
        index: source_info.index,
        flow: DeviceFlow::Capture,
        description: describe(source_info.description.as_ref(), &name),
        name,
        raw_volume: average_raw(&source_info.volume),
        muted: source_info.mute,
        bus_path: property(&source_info.proplist, BUS_PATH_PROPERTY),
        node_name: property(&source_info.proplist, NODE_NAME_PROPERTY),
    }
}
