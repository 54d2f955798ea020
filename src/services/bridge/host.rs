use sysinfo::System;

/// Host name reported when the system does not provide one
pub const UNKNOWN_HOST: &str = "UNKNOWN_HOST";

/// Identity of the machine whose devices are reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIdentity {
    host_name: String,
    os_name: String,
}

impl HostIdentity {
    /// Identity with an explicit host name, upper-cased
    pub fn new(host_name: &str, os_name: impl Into<String>) -> Self {
        let host_name = if host_name.trim().is_empty() {
            UNKNOWN_HOST.to_string()
        } else {
            host_name.trim().to_uppercase()
        };

        Self {
            host_name,
            os_name: os_name.into(),
        }
    }

    /// Query the running system
    pub fn detect() -> Self {
        let host_name = System::host_name().unwrap_or_default();
        let os_name = System::long_os_version()
            .or_else(System::name)
            .unwrap_or_else(|| "unknown".to_string());

        Self::new(&host_name, os_name)
    }

    /// Upper-cased host name
    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    /// Operating system description
    pub fn os_name(&self) -> &str {
        &self.os_name
    }
}
