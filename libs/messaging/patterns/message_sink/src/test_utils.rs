use bytes::Bytes;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use crate::{DeliveryContext, DeliveryError, MessageRouter, RouterAddressing};

/// A delivered message as recorded by [`CollectorRouter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedDelivery {
    pub destination: String,
    pub source: String,
    pub payload: Bytes,
}

/// A router that just collects deliveries for testing
#[derive(Debug, Default)]
pub struct CollectorRouter {
    deliveries: Mutex<Vec<RecordedDelivery>>,
    fail_next: AtomicBool,
    failed: AtomicU64,
}

impl CollectorRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded deliveries
    pub fn deliveries(&self) -> Vec<RecordedDelivery> {
        self.deliveries
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn delivery_count(&self) -> usize {
        self.deliveries.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn failed_count(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Configure to fail on next delivery
    pub fn fail_next_delivery(&self) {
        self.fail_next.store(true, Ordering::Relaxed);
    }
}

impl MessageRouter for CollectorRouter {
    fn deliver(&self, destination: &str, source: &str, payload: Bytes) -> Result<(), DeliveryError> {
        if self.fail_next.swap(false, Ordering::Relaxed) {
            self.failed.fetch_add(1, Ordering::Relaxed);
            return Err(DeliveryError::rejected(
                "Simulated failure",
                DeliveryContext::new(destination, source, payload.len()),
            ));
        }

        if let Ok(mut deliveries) = self.deliveries.lock() {
            deliveries.push(RecordedDelivery {
                destination: destination.to_string(),
                source: source.to_string(),
                payload,
            });
        }
        Ok(())
    }
}

/// A router that always fails for testing error conditions
#[derive(Debug)]
pub struct FailingRouter {
    reason: String,
    addressing: RouterAddressing,
    attempts: AtomicU64,
}

impl FailingRouter {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            addressing: RouterAddressing::default(),
            attempts: AtomicU64::new(0),
        }
    }

    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }
}

impl Default for FailingRouter {
    fn default() -> Self {
        Self::new("Simulated failure")
    }
}

impl MessageRouter for FailingRouter {
    fn deliver(&self, destination: &str, source: &str, payload: Bytes) -> Result<(), DeliveryError> {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        let address = self.addressing.resolve(destination);
        Err(DeliveryError::rejected(
            format!("{} ({})", self.reason, address.service),
            DeliveryContext::new(destination, source, payload.len()),
        ))
    }
}
