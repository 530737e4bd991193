use bytes::Bytes;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

use crate::{DeliveryError, MessageRouter, RouterAddressing};

/// Router that resolves each destination and logs the call it would make
#[derive(Debug, Default)]
pub struct LoggingRouter {
    addressing: RouterAddressing,
    delivered: AtomicU64,
}

impl LoggingRouter {
    pub fn new(addressing: RouterAddressing) -> Self {
        Self {
            addressing,
            delivered: AtomicU64::new(0),
        }
    }

    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }
}

impl MessageRouter for LoggingRouter {
    fn deliver(&self, destination: &str, source: &str, payload: Bytes) -> Result<(), DeliveryError> {
        let address = self.addressing.resolve(destination);
        info!(
            service = %address.service,
            path = %address.object_path,
            interface = %address.interface,
            method = %address.method,
            source,
            payload_size = payload.len(),
            "Delivering message"
        );
        self.delivered.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
