//! # Message Router Boundary
//!
//! The push message service hands every decoded message to a
//! [`MessageRouter`]. Delivery is fire-and-forget from the service's point
//! of view: a failure is reported back for logging, never retried.
//!
//! Routers provided here:
//! - [`LoggingRouter`]: resolves and logs, for development and dry runs
//! - [`ChannelRouter`]: queues onto a bounded channel for an async delivery task
//! - [`test_utils::CollectorRouter`] / [`test_utils::FailingRouter`]: tests

pub mod address;
pub mod error;
pub mod message;
pub mod routers;
pub mod test_utils;

use bytes::Bytes;
use std::fmt::Debug;
use std::sync::Arc;

pub use address::{RouterAddressing, ServiceAddress};
pub use error::{DeliveryContext, DeliveryError};
pub use message::Delivery;
pub use routers::{ChannelRouter, LoggingRouter};

/// A destination for decoded messages that abstracts away the bus transport
///
/// Called synchronously once per reassembled message; implementations that
/// talk to slow transports should queue rather than block.
pub trait MessageRouter: Send + Sync + Debug {
    /// Deliver `payload` from `source` to `destination`
    fn deliver(&self, destination: &str, source: &str, payload: Bytes) -> Result<(), DeliveryError>;
}

impl<R: MessageRouter + ?Sized> MessageRouter for Arc<R> {
    fn deliver(&self, destination: &str, source: &str, payload: Bytes) -> Result<(), DeliveryError> {
        (**self).deliver(destination, source, payload)
    }
}

impl<R: MessageRouter + ?Sized> MessageRouter for Box<R> {
    fn deliver(&self, destination: &str, source: &str, payload: Bytes) -> Result<(), DeliveryError> {
        (**self).deliver(destination, source, payload)
    }
}
