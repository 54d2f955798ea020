/// Errors raised by the device registry
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No record exists for the requested PnP id
    #[error("Device pnpId {0:?} not found")]
    DeviceNotFound(String),
}

/// PulseAudio adapter errors
#[derive(thiserror::Error, Debug)]
pub enum PulseError {
    /// The mainloop or context could not be created
    #[error("PulseAudio mainloop failed: {0}")]
    MainloopFailed(String),

    /// PulseAudio connection failed
    #[error("PulseAudio connection failed: {0}")]
    ConnectionFailed(String),

    /// The context entered the permanent failure state
    #[error("PulseAudio context failed: {0}")]
    ContextFailed(String),

    /// A mainloop iteration returned an error
    #[error("PulseAudio mainloop iteration failed: {0}")]
    IterationFailed(String),

    /// The monitor thread went away before finishing
    #[error("PulseAudio thread communication failed")]
    ThreadCommunication,
}
