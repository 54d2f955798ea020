//! soundrelay daemon - entry point
//!
//! Loads the configuration, starts the delivery queue and runs the
//! PulseAudio monitor until SIGINT or SIGTERM.

use std::{process::ExitCode, sync::Arc};

use clap::Parser;
use soundrelay::{
    RelayError, Result,
    cli::{Cli, version_line},
    config::{Config, ConfigPaths},
    services::{
        ApiEventBridge, DeliveryQueue, DeviceRegistry, HostIdentity, HttpTransport,
        LoggingObserver, PulseError, PulseMonitor,
    },
    tracing_config,
};
use tokio::{
    signal::unix::{SignalKind, signal},
    task::JoinError,
};
use tracing::{error, info, instrument, warn};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("{}", version_line());
        return ExitCode::SUCCESS;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Wires the registry to its observer and runs until stopped.
///
/// The delivery queue owns a blocking HTTP client, so it is created and
/// shut down outside the async runtime.
///
/// # Errors
/// Returns error on missing configuration, if the queue cannot start, or
/// if the PulseAudio monitor fails
fn run(cli: Cli) -> Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => ConfigPaths::main_config()?,
    };
    let mut config = Config::load(&config_path)?;
    config.override_base_url(cli.url);

    let log_level = config.general.log_level;
    if let Err(e) = tracing_config::init_with_file(log_level) {
        eprintln!("Log file can not be written: {e}");
        if let Err(e) = tracing_config::init(log_level) {
            eprintln!("Logging unavailable: {e}");
        }
    }
    info!("{} started", version_line());

    let host = HostIdentity::detect();
    info!(host = host.host_name(), os = host.os_name(), "Host identity detected");

    let mut registry = DeviceRegistry::new();
    let queue = if cli.log_only {
        info!("Log-only mode, nothing is sent");
        registry.subscribe(Arc::new(LoggingObserver));
        None
    } else {
        let settings = config.delivery_settings()?;
        info!(url = %settings.resource_url, "Reporting devices");
        let transport = HttpTransport::new(settings.request_timeout)?;
        let queue = Arc::new(DeliveryQueue::start(settings, Arc::new(transport))?);
        registry.subscribe(Arc::new(ApiEventBridge::new(host, queue.clone())));
        Some(queue)
    };

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(monitor(registry));
    drop(runtime);

    if let Some(queue) = queue {
        queue.shutdown();
    }
    info!("soundrelay stopped");
    result
}

#[instrument(skip_all)]
async fn monitor(registry: DeviceRegistry) -> Result<()> {
    let monitor = PulseMonitor::new(registry);
    let handle = monitor.handle();
    let mut task = monitor.spawn();
    let mut terminate = signal(SignalKind::terminate())?;

    tokio::select! {
        joined = &mut task => return finish(joined),
        _ = tokio::signal::ctrl_c() => info!("SIGINT received, stopping"),
        _ = terminate.recv() => info!("SIGTERM received, stopping"),
    }

    handle.deactivate();
    finish(task.await)
}

type MonitorOutcome = std::result::Result<std::result::Result<(), PulseError>, JoinError>;

fn finish(joined: MonitorOutcome) -> Result<()> {
    match joined {
        Ok(result) => result.map_err(RelayError::from),
        Err(e) => {
            warn!("Monitor task ended abnormally: {e}");
            Err(PulseError::ThreadCommunication.into())
        }
    }
}
