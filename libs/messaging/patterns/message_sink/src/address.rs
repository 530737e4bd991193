//! Resolution of message destinations to bus service addresses
//!
//! The router exposes one service per destination: the destination is
//! appended to a common service name base, while the object path,
//! interface and method are shared by all destinations.

use serde::{Deserialize, Serialize};

/// Shared addressing parameters for every destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterAddressing {
    /// Service name prefix; the destination is appended after a '.'
    pub service_name_base: String,
    pub object_path: String,
    pub interface: String,
    /// Method invoked with `(source, payload)`
    pub method: String,
}

impl Default for RouterAddressing {
    fn default() -> Self {
        Self {
            service_name_base: "org.extmsg.ExternalAppMessage".to_string(),
            object_path: "/org/extmsg/ExternalAppMessage".to_string(),
            interface: "org.extmsg.ExternalAppMessage".to_string(),
            method: "pushMessage".to_string(),
        }
    }
}

impl RouterAddressing {
    /// Resolve the full address for a destination
    pub fn resolve(&self, destination: &str) -> ServiceAddress {
        ServiceAddress {
            service: format!("{}.{}", self.service_name_base, destination),
            object_path: self.object_path.clone(),
            interface: self.interface.clone(),
            method: self.method.clone(),
        }
    }
}

/// Fully resolved address of a destination's message endpoint
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceAddress {
    pub service: String,
    pub object_path: String,
    pub interface: String,
    pub method: String,
}

impl std::fmt::Display for ServiceAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{} {}.{}",
            self.service, self.object_path, self.interface, self.method
        )
    }
}
