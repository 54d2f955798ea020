mod conversion;
mod discovery;
mod events;
mod types;

use std::{cell::RefCell, rc::Rc};

use libpulse_binding::{
    context::{Context, FlagSet as ContextFlags, State},
    mainloop::standard::Mainloop,
    time::MicroSeconds,
};
use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::{debug, info, instrument};

pub use conversion::{endpoint_from_sink, endpoint_from_source};
pub use types::{CommandSender, EndpointNotification, MonitorCommand, SharedRegistry};

use super::{DeviceRegistry, PulseError};
use types::{CommandReceiver, EnumerationProgress, with_registry};

const APPLICATION_NAME: &str = "soundrelay";
const POLL_TIMEOUT: MicroSeconds = MicroSeconds(100_000);

/// Handle for stopping a running [`PulseMonitor`] from another thread
#[derive(Debug, Clone)]
pub struct MonitorHandle {
    command_tx: CommandSender,
}

impl MonitorHandle {
    /// Ask the monitor loop to stop; safe to call repeatedly
    pub fn deactivate(&self) {
        if self.command_tx.send(MonitorCommand::Deactivate).is_err() {
            debug!("Monitor loop already finished");
        }
    }
}

/// Connects to the PulseAudio server and feeds the device registry
///
/// All PulseAudio work, registry updates and observer callbacks happen on
/// the thread running [`PulseMonitor::activate_and_run`].
pub struct PulseMonitor {
    registry: DeviceRegistry,
    command_tx: CommandSender,
    command_rx: CommandReceiver,
}

impl PulseMonitor {
    /// Wrap a registry whose observers are already subscribed
    pub fn new(registry: DeviceRegistry) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        Self {
            registry,
            command_tx,
            command_rx,
        }
    }

    /// Handle for deactivating the monitor
    pub fn handle(&self) -> MonitorHandle {
        MonitorHandle {
            command_tx: self.command_tx.clone(),
        }
    }

    /// Run the monitor on tokio's blocking pool
    pub fn spawn(self) -> tokio::task::JoinHandle<Result<(), PulseError>> {
        tokio::task::spawn_blocking(move || self.activate_and_run())
    }

    /// Connect, enumerate, then process live notifications until deactivated
    ///
    /// Blocks the calling thread. The registry is deactivated before
    /// returning, whatever the outcome.
    ///
    /// # Errors
    /// Returns error if the mainloop or context cannot be created, the
    /// connection fails, or the context fails while running
    #[instrument(skip(self))]
    pub fn activate_and_run(self) -> Result<(), PulseError> {
        let Self {
            registry,
            command_tx: _command_tx,
            mut command_rx,
        } = self;

        let mut mainloop = Mainloop::new()
            .ok_or_else(|| PulseError::MainloopFailed("Failed to create mainloop".to_string()))?;
        let mut context = Context::new(&mainloop, APPLICATION_NAME).ok_or_else(|| {
            PulseError::ConnectionFailed("Failed to create context".to_string())
        })?;

        context
            .connect(None, ContextFlags::NOFLAGS, None)
            .map_err(|e| PulseError::ConnectionFailed(format!("Connection failed: {e}")))?;

        if !wait_for_ready(&mut mainloop, &context, &mut command_rx)? {
            context.disconnect();
            return Ok(());
        }
        info!("PulseAudio context got READY status");

        let registry: SharedRegistry = Rc::new(RefCell::new(registry));
        with_registry(&registry, DeviceRegistry::activate);

        let (change_tx, mut change_rx) = mpsc::unbounded_channel();
        events::start_monitoring(&mut context, change_tx);

        let progress = EnumerationProgress::default();
        discovery::request_initial_info(&context, &registry, &progress);

        let result = loop {
            match command_rx.try_recv() {
                Ok(MonitorCommand::Deactivate) => {
                    info!("Deactivation requested");
                    break Ok(());
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => {}
            }

            if let Err(e) = iterate(&mut mainloop) {
                break Err(e);
            }

            match context.get_state() {
                State::Failed => {
                    break Err(PulseError::ContextFailed(format!("{}", context.errno())));
                }
                State::Terminated => {
                    info!("PulseAudio context terminated");
                    break Ok(());
                }
                _ => {}
            }

            if progress.is_complete() {
                while let Ok(notification) = change_rx.try_recv() {
                    events::handle_notification(&context, notification, &registry);
                }
            }
        };

        with_registry(&registry, DeviceRegistry::deactivate);
        events::stop_monitoring(&mut context);
        context.disconnect();
        result
    }
}

fn iterate(mainloop: &mut Mainloop) -> Result<(), PulseError> {
    mainloop
        .prepare(Some(POLL_TIMEOUT))
        .map_err(|e| PulseError::IterationFailed(format!("prepare: {e}")))?;
    mainloop
        .poll()
        .map_err(|e| PulseError::IterationFailed(format!("poll: {e}")))?;
    mainloop
        .dispatch()
        .map_err(|e| PulseError::IterationFailed(format!("dispatch: {e}")))?;
    Ok(())
}

/// Iterate until the context is ready
///
/// Returns `false` if deactivation was requested first.
fn wait_for_ready(
    mainloop: &mut Mainloop,
    context: &Context,
    command_rx: &mut CommandReceiver,
) -> Result<bool, PulseError> {
    loop {
        if let Ok(MonitorCommand::Deactivate) = command_rx.try_recv() {
            info!("Deactivated before the context became ready");
            return Ok(false);
        }

        iterate(mainloop)?;

        match context.get_state() {
            State::Ready => return Ok(true),
            State::Failed | State::Terminated => {
                return Err(PulseError::ConnectionFailed(format!(
                    "Context failed to become ready: {}",
                    context.errno()
                )));
            }
            _ => {}
        }
    }
}
