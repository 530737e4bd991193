//! Decoded message frame

use bytes::Bytes;

use crate::constants::{FIELD_SEPARATOR, RESERVED_DESTINATION_PREFIX};
use crate::error::FrameResult;
use crate::validation::identifiers::{validate_destination, validate_source};

/// A fully reassembled and validated message
///
/// Only constructible through validation, so holding one means `source`
/// and `destination` satisfy the identifier rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFrame {
    source: String,
    destination: String,
    payload: Bytes,
}

impl MessageFrame {
    /// Build a frame for sending, validating both identifiers
    pub fn new(
        source: impl Into<String>,
        destination: impl Into<String>,
        payload: impl Into<Bytes>,
    ) -> FrameResult<Self> {
        let source = validate_source(source.into().as_bytes())?;
        let destination =
            validate_destination(destination.into().as_bytes(), RESERVED_DESTINATION_PREFIX)?;
        Ok(Self::from_validated(source, destination, payload.into()))
    }

    pub(crate) fn from_validated(source: String, destination: String, payload: Bytes) -> Self {
        Self {
            source,
            destination,
            payload,
        }
    }

    /// Identifier of the app that produced the message
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Routing-layer destination the payload is addressed to
    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Decompose into `(source, destination, payload)`
    pub fn into_parts(self) -> (String, String, Bytes) {
        (self.source, self.destination, self.payload)
    }

    /// Encode as `source '\n' destination '\n' payload`
    pub fn encode(&self) -> Vec<u8> {
        let mut out =
            Vec::with_capacity(self.source.len() + self.destination.len() + 2 + self.payload.len());
        out.extend_from_slice(self.source.as_bytes());
        out.push(FIELD_SEPARATOR);
        out.extend_from_slice(self.destination.as_bytes());
        out.push(FIELD_SEPARATOR);
        out.extend_from_slice(&self.payload);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrameError;

    #[test]
    fn test_encode_layout() {
        let frame = MessageFrame::new("com.example.App", "weather", &b"line1\nline2"[..]).unwrap();
        assert_eq!(frame.encode(), b"com.example.App\nweather\nline1\nline2");
    }

    #[test]
    fn test_new_validates_identifiers() {
        assert!(matches!(
            MessageFrame::new("bad source", "weather", Bytes::new()),
            Err(FrameError::InvalidSource { .. })
        ));
        assert!(matches!(
            MessageFrame::new("app", "interfacesDbus", Bytes::new()),
            Err(FrameError::ReservedDestination { .. })
        ));
    }

    #[test]
    fn test_into_parts() {
        let frame = MessageFrame::new("a", "b", Bytes::from_static(b"\x00\x01")).unwrap();
        let (source, destination, payload) = frame.into_parts();
        assert_eq!(source, "a");
        assert_eq!(destination, "b");
        assert_eq!(&payload[..], b"\x00\x01");
    }
}
