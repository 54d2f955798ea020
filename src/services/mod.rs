/// Audio device registry and PulseAudio adapter
pub mod audio;
/// Translation of device events into API requests
pub mod bridge;
/// Background delivery of API requests with codespace wake-up
pub mod delivery;

pub use audio::{
    DeviceEvent, DeviceEventKind, DeviceFlow, DeviceLookup, DeviceObserver, DeviceRecord,
    DeviceRegistry, MonitorHandle, PulseError, PulseMonitor, RegistryError,
};
pub use bridge::{ApiEventBridge, HostIdentity, LoggingObserver, RequestSink};
pub use delivery::{
    DeliveryError, DeliveryQueue, DeliverySettings, HttpTransport, RequestItem, Transport,
};
