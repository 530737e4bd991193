//! # Message Frame Parser
//!
//! ## Purpose
//!
//! Splits a reassembled message buffer into `source`, `destination` and
//! `payload` and enforces the identifier rules. The buffer is scanned left to
//! right: the source is checked as soon as its separator is found, the
//! destination as soon as its separator is found, and everything after the
//! second separator is payload, newlines included.
//!
//! ## Error Precedence
//!
//! ```text
//! "bad src"            → TruncatedFrame (no separator at all)
//! "bad src\nfoo"       → InvalidSource  (source terminated, checked first)
//! "app\nfoo.bar\n..."  → InvalidDestination
//! "app\ninterfacesX\n" → ReservedDestination
//! "app\nfoo"           → TruncatedFrame
//! ```
//!
//! The payload is a zero-copy slice of the input buffer.

use bytes::Bytes;

use crate::constants::{FIELD_SEPARATOR, RESERVED_DESTINATION_PREFIX};
use crate::error::{FrameError, FrameResult};
use crate::frame::MessageFrame;
use crate::validation::identifiers::{validate_destination, validate_source};

/// Frame decoder carrying the routing layer's reserved destination prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameParser {
    reserved_prefix: String,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self {
            reserved_prefix: RESERVED_DESTINATION_PREFIX.to_string(),
        }
    }
}

impl FrameParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different reserved namespace; an empty prefix reserves nothing
    pub fn with_reserved_prefix(prefix: impl Into<String>) -> Self {
        Self {
            reserved_prefix: prefix.into(),
        }
    }

    pub fn reserved_prefix(&self) -> &str {
        &self.reserved_prefix
    }

    /// Decode and validate a complete message buffer
    pub fn decode(&self, buffer: Bytes) -> FrameResult<MessageFrame> {
        let source_end =
            find_separator(&buffer, 0).ok_or(FrameError::TruncatedFrame { fields: 1 })?;
        let source = validate_source(&buffer[..source_end])?;

        let destination_start = source_end + 1;
        let destination_end = find_separator(&buffer, destination_start)
            .ok_or(FrameError::TruncatedFrame { fields: 2 })?;
        let destination = validate_destination(
            &buffer[destination_start..destination_end],
            &self.reserved_prefix,
        )?;

        let payload = buffer.slice(destination_end + 1..);
        Ok(MessageFrame::from_validated(source, destination, payload))
    }
}

/// Decode with the default reserved prefix
pub fn decode_frame(buffer: Bytes) -> FrameResult<MessageFrame> {
    FrameParser::default().decode(buffer)
}

fn find_separator(buffer: &[u8], from: usize) -> Option<usize> {
    buffer[from..]
        .iter()
        .position(|&b| b == FIELD_SEPARATOR)
        .map(|pos| from + pos)
}
