//! Bounded hand-off between the synchronous endpoint and an async delivery task
//!
//! The endpoint must never wait for delivery before accepting the next
//! chunk, so the router only ever `try_send`s. A full queue drops the
//! message with [`DeliveryError::Busy`].

use bytes::Bytes;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::debug;

use crate::{Delivery, DeliveryContext, DeliveryError, MessageRouter, RouterAddressing};

/// Default number of deliveries that may be queued
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct ChannelRouter {
    addressing: RouterAddressing,
    sender: mpsc::Sender<Delivery>,
}

impl ChannelRouter {
    /// Create a router and the receiving end the delivery task drains
    ///
    /// A capacity of 0 is raised to 1.
    pub fn new(addressing: RouterAddressing, capacity: usize) -> (Self, mpsc::Receiver<Delivery>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { addressing, sender }, receiver)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl MessageRouter for ChannelRouter {
    fn deliver(&self, destination: &str, source: &str, payload: Bytes) -> Result<(), DeliveryError> {
        let delivery = Delivery::new(
            self.addressing.resolve(destination),
            destination,
            source,
            payload,
        );

        match self.sender.try_send(delivery) {
            Ok(()) => {
                debug!(destination, "Queued message for delivery");
                Ok(())
            }
            Err(TrySendError::Full(delivery)) => Err(DeliveryError::Busy {
                context: DeliveryContext::new(delivery.destination, delivery.source, delivery.payload.len()),
            }),
            Err(TrySendError::Closed(_)) => Err(DeliveryError::Closed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_delivery_reaches_receiver() {
        let (router, mut receiver) = ChannelRouter::new(RouterAddressing::default(), 4);
        router
            .deliver("weather", "com.example.App", Bytes::from_static(b"rain"))
            .unwrap();

        let delivery = receiver.recv().await.unwrap();
        assert_eq!(delivery.address.service, "org.extmsg.ExternalAppMessage.weather");
        assert_eq!(delivery.source, "com.example.App");
        assert_eq!(&delivery.payload[..], b"rain");
    }

    #[tokio::test]
    async fn test_full_channel_reports_busy() {
        let (router, mut receiver) = ChannelRouter::new(RouterAddressing::default(), 1);
        router.deliver("a", "src", Bytes::from_static(b"1")).unwrap();

        let err = router.deliver("b", "src", Bytes::from_static(b"22")).unwrap_err();
        assert_eq!(
            err,
            DeliveryError::Busy {
                context: DeliveryContext::new("b", "src", 2)
            }
        );

        // Draining frees capacity again
        receiver.recv().await.unwrap();
        assert!(router.deliver("c", "src", Bytes::new()).is_ok());
    }

    #[tokio::test]
    async fn test_closed_channel() {
        let (router, receiver) = ChannelRouter::new(RouterAddressing::default(), 1);
        drop(receiver);

        assert!(router.is_closed());
        assert_eq!(router.deliver("a", "b", Bytes::new()), Err(DeliveryError::Closed));
    }
}
