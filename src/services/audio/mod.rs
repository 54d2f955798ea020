/// Device records and flows
pub mod device;
/// Raw endpoint data and PnP id derivation
pub mod endpoint;
/// Audio error types
pub mod error;
/// Device collection events
pub mod events;
/// PulseAudio adapter
pub mod pulse;
/// Canonical device map
pub mod registry;
/// Volume normalization
pub mod volume;

#[cfg(test)]
mod tests;

pub use device::*;
pub use endpoint::*;
pub use error::*;
pub use events::*;
pub use pulse::{MonitorHandle, PulseMonitor};
pub use registry::*;
