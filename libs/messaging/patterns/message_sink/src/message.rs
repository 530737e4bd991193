use bytes::Bytes;

use crate::address::ServiceAddress;

/// A decoded message on its way to a destination service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub address: ServiceAddress,
    pub destination: String,
    pub source: String,
    pub payload: Bytes,
}

impl Delivery {
    pub fn new(
        address: ServiceAddress,
        destination: impl Into<String>,
        source: impl Into<String>,
        payload: Bytes,
    ) -> Self {
        Self {
            address,
            destination: destination.into(),
            source: source.into(),
            payload,
        }
    }

    /// Get payload size in bytes
    pub fn size(&self) -> usize {
        self.payload.len()
    }
}
