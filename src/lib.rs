//! soundrelay - PulseAudio device reporter.
//!
//! Watches the sound server for sinks and sources, folds them into one
//! record per physical device and reports new devices and volume changes
//! to a REST API. Delivery runs on a background queue that retries
//! against, and wakes up, a backend hosted in a GitHub Codespace.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use soundrelay::services::{DeviceRegistry, LoggingObserver, PulseMonitor};
//!
//! let mut registry = DeviceRegistry::new();
//! registry.subscribe(Arc::new(LoggingObserver));
//!
//! let monitor = PulseMonitor::new(registry);
//! monitor.activate_and_run()?;
//! # Ok::<(), soundrelay::services::PulseError>(())
//! ```

/// Command-line arguments.
pub mod cli;

/// Configuration schema and loading.
pub mod config;

/// Core error types and result aliases.
pub mod core;

/// Device registry, API bridge and delivery queue.
pub mod services;

/// Logging setup.
pub mod tracing_config;

/// Re-exported core types for convenience.
pub use core::{RelayError, Result};
