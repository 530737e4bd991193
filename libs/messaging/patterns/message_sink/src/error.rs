/// Context attached to delivery failures to aid in debugging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryContext {
    /// Destination the message was addressed to
    pub destination: String,
    /// Source app that produced the message
    pub source: String,
    /// Size of the payload in bytes
    pub payload_size: usize,
}

impl DeliveryContext {
    pub fn new(destination: impl Into<String>, source: impl Into<String>, payload_size: usize) -> Self {
        Self {
            destination: destination.into(),
            source: source.into(),
            payload_size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("Delivery rejected by {destination}: {reason} (source: {source_id}, size: {size}B)",
            destination = context.destination,
            source_id = context.source,
            size = context.payload_size)]
    Rejected {
        reason: String,
        context: DeliveryContext,
    },

    #[error("Router busy, message to {destination} dropped (size: {size}B)",
            destination = context.destination,
            size = context.payload_size)]
    Busy { context: DeliveryContext },

    #[error("Router closed")]
    Closed,

    #[error("Destination unavailable: {0}")]
    Unavailable(String),
}

impl DeliveryError {
    /// Create a rejected error with context
    pub fn rejected(reason: impl Into<String>, context: DeliveryContext) -> Self {
        DeliveryError::Rejected {
            reason: reason.into(),
            context,
        }
    }

    /// Create an unavailable error
    pub fn unavailable(destination: impl Into<String>) -> Self {
        DeliveryError::Unavailable(destination.into())
    }

    /// Destination named by the error, if any
    pub fn destination(&self) -> Option<&str> {
        match self {
            DeliveryError::Rejected { context, .. } | DeliveryError::Busy { context } => {
                Some(&context.destination)
            }
            DeliveryError::Unavailable(destination) => Some(destination),
            DeliveryError::Closed => None,
        }
    }

    /// Check if a later message to the same destination could succeed
    ///
    /// Informational only: the push service never retries.
    pub fn is_transient(&self) -> bool {
        matches!(self, DeliveryError::Busy { .. } | DeliveryError::Unavailable(_))
    }
}
