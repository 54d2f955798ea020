use std::rc::Rc;

use libpulse_binding::{callbacks::ListResult, context::Context};
use tracing::{info, warn};

use crate::services::audio::{DeviceEventKind, DeviceFlow, RawEndpointInfo};

use super::{
    conversion::{endpoint_from_sink, endpoint_from_source},
    types::{EnumerationProgress, SharedRegistry, with_registry},
};

/// How a fetched endpoint is applied to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointUpdate {
    /// Endpoint is new to the session; merge it and emit the given kind
    Added(DeviceEventKind),
    /// Endpoint changed; only its volume is compared
    Changed,
}

fn apply(registry: &SharedRegistry, update: EndpointUpdate, raw: &RawEndpointInfo) {
    with_registry(registry, |devices| match update {
        EndpointUpdate::Added(kind) => devices.on_raw_endpoint_info(kind, raw),
        EndpointUpdate::Changed => devices.on_endpoint_changed(raw),
    });
}

/// Request server info and the full sink and source lists
///
/// Every enumerated endpoint is applied as `Confirmed`.
pub fn request_initial_info(
    context: &Context,
    registry: &SharedRegistry,
    progress: &EnumerationProgress,
) {
    let introspect = context.introspect();

    info!("SERVER: Requesting info...");
    introspect.get_server_info(|server_info| {
        info!(
            default_sink = server_info.default_sink_name.as_deref().unwrap_or_default(),
            default_source = server_info.default_source_name.as_deref().unwrap_or_default(),
            "Server info received"
        );
    });

    info!("SINK: Requesting info...");
    progress.start_one();
    let registry_for_sinks = Rc::clone(registry);
    let progress_for_sinks = progress.clone();
    introspect.get_sink_info_list(move |result| match result {
        ListResult::Item(sink_info) => {
            let raw = endpoint_from_sink(sink_info);
            info!("Found sink '{}' with index {}", raw.name, raw.index);
            apply(
                &registry_for_sinks,
                EndpointUpdate::Added(DeviceEventKind::Confirmed),
                &raw,
            );
        }
        ListResult::End => progress_for_sinks.finish_one(),
        ListResult::Error => {
            warn!("Failed to list sinks");
            progress_for_sinks.finish_one();
        }
    });

    info!("SOURCE: Requesting info...");
    progress.start_one();
    let registry_for_sources = Rc::clone(registry);
    let progress_for_sources = progress.clone();
    introspect.get_source_info_list(move |result| match result {
        ListResult::Item(source_info) => {
            let raw = endpoint_from_source(source_info);
            info!("Found source '{}' with index {}", raw.name, raw.index);
            apply(
                &registry_for_sources,
                EndpointUpdate::Added(DeviceEventKind::Confirmed),
                &raw,
            );
        }
        ListResult::End => progress_for_sources.finish_one(),
        ListResult::Error => {
            warn!("Failed to list sources");
            progress_for_sources.finish_one();
        }
    });
}

/// Fetch one endpoint by session index and apply it
pub fn request_endpoint(
    context: &Context,
    flow: DeviceFlow,
    index: u32,
    registry: &SharedRegistry,
    update: EndpointUpdate,
) {
    let introspect = context.introspect();
    let registry = Rc::clone(registry);

    match flow {
        DeviceFlow::Render => {
            introspect.get_sink_info_by_index(index, move |result| match result {
                ListResult::Item(sink_info) => {
                    apply(&registry, update, &endpoint_from_sink(sink_info));
                }
                ListResult::End => {}
                ListResult::Error => warn!("Failed to get info of sink {index}"),
            });
        }
        DeviceFlow::Capture => {
            introspect.get_source_info_by_index(index, move |result| match result {
                ListResult::Item(source_info) => {
                    apply(&registry, update, &endpoint_from_source(source_info));
                }
                ListResult::End => {}
                ListResult::Error => warn!("Failed to get info of source {index}"),
            });
        }
        DeviceFlow::RenderAndCapture => {}
    }
}
