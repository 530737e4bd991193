//! Per-connection push message endpoint

use extmsg_codec::{
    ChunkError, ChunkReassembler, FrameError, FrameParser, ReassemblyPolicy, SubmitOutcome,
};
use extmsg_config::ServiceConfig;
use extmsg_sink::{DeliveryError, MessageRouter};
use tracing::{debug, error};

/// Reassembly and parsing settings shared by every endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointSettings {
    pub policy: ReassemblyPolicy,
    pub reserved_prefix: Option<String>,
}

impl EndpointSettings {
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            policy: config.reassembly,
            reserved_prefix: Some(config.frame.reserved_destination_prefix.clone()),
        }
    }

    fn parser(&self) -> FrameParser {
        match &self.reserved_prefix {
            Some(prefix) => FrameParser::with_reserved_prefix(prefix.clone()),
            None => FrameParser::default(),
        }
    }
}

/// Result of a single characteristic write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Chunk accepted, message not yet complete
    Pending,
    /// Message completed and accepted by the router
    Delivered { source: String, destination: String },
    /// Message completed but the router refused it; it is not retried
    DeliveryFailed {
        destination: String,
        error: DeliveryError,
    },
    /// Message completed but failed frame validation; nothing was forwarded
    FrameRejected(FrameError),
    /// Chunk was malformed; the partial message was discarded
    ChunkRejected(ChunkError),
}

impl WriteOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, WriteOutcome::Delivered { .. })
    }
}

/// Reassembles one peer's chunk writes and forwards completed messages
#[derive(Debug)]
pub struct PushMessageEndpoint<R: MessageRouter> {
    reassembler: ChunkReassembler,
    parser: FrameParser,
    router: R,
}

impl<R: MessageRouter> PushMessageEndpoint<R> {
    pub fn new(router: R) -> Self {
        Self::with_settings(router, &EndpointSettings::default())
    }

    pub fn with_settings(router: R, settings: &EndpointSettings) -> Self {
        Self {
            reassembler: ChunkReassembler::with_policy(settings.policy),
            parser: settings.parser(),
            router,
        }
    }

    /// Handle one chunk written by the peer
    pub fn write_value(&mut self, chunk: &[u8]) -> WriteOutcome {
        let buffer = match self.reassembler.submit(chunk) {
            SubmitOutcome::InProgress => return WriteOutcome::Pending,
            SubmitOutcome::Rejected(err) => return WriteOutcome::ChunkRejected(err),
            SubmitOutcome::MessageReady(buffer) => buffer,
        };

        let frame = match self.parser.decode(buffer) {
            Ok(frame) => frame,
            Err(err) => {
                error!(error = %err, "Dropping invalid message frame");
                return WriteOutcome::FrameRejected(err);
            }
        };

        let (source, destination, payload) = frame.into_parts();
        let payload_size = payload.len();
        match self.router.deliver(&destination, &source, payload) {
            Ok(()) => {
                debug!(%source, %destination, payload_size, "Message forwarded");
                WriteOutcome::Delivered {
                    source,
                    destination,
                }
            }
            Err(err) => {
                error!(
                    %source,
                    %destination,
                    error = %err,
                    "Failed to forward message"
                );
                WriteOutcome::DeliveryFailed {
                    destination,
                    error: err,
                }
            }
        }
    }

    pub fn reassembler(&self) -> &ChunkReassembler {
        &self.reassembler
    }

    pub fn router(&self) -> &R {
        &self.router
    }
}
