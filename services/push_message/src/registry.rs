//! Connection-scoped endpoint registry
//!
//! Every connection gets its own [`PushMessageEndpoint`], created on the
//! first write and dropped on disconnect together with any partial message.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use extmsg_sink::MessageRouter;
use tracing::{debug, info};

use crate::endpoint::{EndpointSettings, PushMessageEndpoint, WriteOutcome};

/// Transport-assigned identifier of a connected peer
pub type ConnectionId = u64;

#[derive(Debug)]
pub struct EndpointRegistry<R: MessageRouter + Clone> {
    router: R,
    settings: EndpointSettings,
    endpoints: HashMap<ConnectionId, PushMessageEndpoint<R>>,
}

impl<R: MessageRouter + Clone> EndpointRegistry<R> {
    pub fn new(router: R, settings: EndpointSettings) -> Self {
        Self {
            router,
            settings,
            endpoints: HashMap::new(),
        }
    }

    /// Route a chunk to the connection's endpoint
    pub fn write_value(&mut self, connection: ConnectionId, chunk: &[u8]) -> WriteOutcome {
        let endpoint = match self.endpoints.entry(connection) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                debug!(connection, "New push message connection");
                entry.insert(PushMessageEndpoint::with_settings(
                    self.router.clone(),
                    &self.settings,
                ))
            }
        };
        endpoint.write_value(chunk)
    }

    /// Forget a connection; returns whether it was known
    pub fn disconnect(&mut self, connection: ConnectionId) -> bool {
        match self.endpoints.remove(&connection) {
            Some(endpoint) => {
                let stats = endpoint.reassembler().stats();
                info!(
                    connection,
                    messages = stats.messages_completed,
                    rejected_chunks = stats.chunks_rejected,
                    partial = endpoint.reassembler().is_in_progress(),
                    "Push message connection closed"
                );
                true
            }
            None => false,
        }
    }

    pub fn endpoint(&self, connection: ConnectionId) -> Option<&PushMessageEndpoint<R>> {
        self.endpoints.get(&connection)
    }

    /// Number of connections with an endpoint
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Disconnect every connection
    pub fn clear(&mut self) {
        let connections: Vec<ConnectionId> = self.endpoints.keys().copied().collect();
        for connection in connections {
            self.disconnect(connection);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use extmsg_codec::split_into_chunks;
    use extmsg_sink::test_utils::CollectorRouter;
    use std::sync::Arc;

    #[test]
    fn test_endpoint_created_lazily_and_dropped() {
        let router = Arc::new(CollectorRouter::new());
        let mut registry = EndpointRegistry::new(router.clone(), EndpointSettings::default());
        assert!(registry.is_empty());

        let chunks = split_into_chunks(0, b"app\nweather\nsunny", 10).unwrap();
        registry.write_value(7, &chunks[0]);
        assert_eq!(registry.len(), 1);
        assert!(registry.endpoint(7).unwrap().reassembler().is_in_progress());

        assert!(registry.disconnect(7));
        assert!(!registry.disconnect(7));
        assert!(registry.is_empty());

        // Reconnecting starts from scratch; the rest of the old message is not enough
        for chunk in &chunks[1..] {
            registry.write_value(7, chunk);
        }
        assert_eq!(router.delivery_count(), 0);
    }

    #[test]
    fn test_clear_drops_all_connections() {
        let mut registry =
            EndpointRegistry::new(Arc::new(CollectorRouter::new()), EndpointSettings::default());
        registry.write_value(1, &[0, 0, 0, 9, 0, b'a']);
        registry.write_value(2, &[0, 0, 0, 9, 0, b'b']);
        assert_eq!(registry.len(), 2);

        registry.clear();
        assert!(registry.is_empty());
    }
}
