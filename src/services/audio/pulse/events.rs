use libpulse_binding::context::{
    Context, State,
    subscribe::{Facility, InterestMaskSet, Operation},
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::services::audio::{DeviceEventKind, DeviceFlow};

use super::{
    discovery::{EndpointUpdate, request_endpoint},
    types::{EndpointNotification, SharedRegistry, with_registry},
};

/// Subscribe to sink, source and server changes
///
/// Notifications are forwarded over `change_tx`; the loop decides when to
/// act on them.
pub fn start_monitoring(
    context: &mut Context,
    change_tx: mpsc::UnboundedSender<EndpointNotification>,
) {
    let interest_mask = InterestMaskSet::SINK | InterestMaskSet::SOURCE | InterestMaskSet::SERVER;

    context.set_subscribe_callback(Some(Box::new(move |facility, operation, index| {
        let flow = match facility {
            Some(Facility::Sink) => DeviceFlow::Render,
            Some(Facility::Source) => DeviceFlow::Capture,
            Some(Facility::Server) => {
                debug!("Server change notification");
                return;
            }
            _ => return,
        };

        let Some(operation) = operation else {
            return;
        };

        if change_tx
            .send(EndpointNotification {
                flow,
                operation,
                index,
            })
            .is_err()
        {
            debug!("Notification channel closed");
        }
    })));

    context.subscribe(interest_mask, |success| {
        if success {
            info!("Started monitoring PulseAudio events");
        } else {
            error!("Failed to subscribe to PulseAudio events");
        }
    });
}

/// Drop the subscription set up by [`start_monitoring`]
pub fn stop_monitoring(context: &mut Context) {
    if context.get_state() != State::Ready {
        warn!("Context not ready, skipping unsubscribe");
        return;
    }

    context.set_subscribe_callback(None);
    context.subscribe(InterestMaskSet::NULL, |_| {});
    info!("Stopped monitoring PulseAudio events");
}

/// Act on one queued notification
pub fn handle_notification(
    context: &Context,
    notification: EndpointNotification,
    registry: &SharedRegistry,
) {
    let EndpointNotification {
        flow,
        operation,
        index,
    } = notification;

    match operation {
        Operation::New => {
            info!("{flow} index {index}: discovered");
            request_endpoint(
                context,
                flow,
                index,
                registry,
                EndpointUpdate::Added(DeviceEventKind::Discovered),
            );
        }
        Operation::Changed => {
            debug!("{flow} index {index}: changed");
            request_endpoint(context, flow, index, registry, EndpointUpdate::Changed);
        }
        Operation::Removed => {
            with_registry(registry, |devices| devices.on_endpoint_removed(flow, index));
        }
    }
}
