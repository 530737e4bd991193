//! Protocol-level errors for chunk reassembly and frame decoding
//!
//! Every error carries enough context to be logged on its own: the engine
//! never propagates these past the point of detection, so the log line is
//! the only diagnostic a peer developer will see.

use thiserror::Error;

/// Chunk-level protocol violations and encoder misuse
///
/// `TooShort`, `OutOfBounds` and `SizeMismatch` form the malformed-chunk
/// family: the reassembler rejects the chunk and resets in-progress state.
/// The remaining variants are only produced by the sender-side encoder.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChunkError {
    /// Chunk cannot even carry the fixed header
    #[error("Chunk too short: need {need} header bytes, got {got}")]
    TooShort { need: usize, got: usize },

    /// Chunk body would land outside the declared message
    #[error("Chunk out of bounds: offset {offset} + length {length} exceeds message size {message_size}")]
    OutOfBounds {
        offset: usize,
        length: usize,
        message_size: usize,
    },

    /// Same-counter chunk declared a different total size than the message in progress
    #[error("Message size changed mid-message (counter {counter}): in progress {expected} bytes, chunk declares {declared}")]
    SizeMismatch {
        counter: u8,
        expected: usize,
        declared: usize,
    },

    /// Messages carry at least one byte
    #[error("Cannot chunk an empty message")]
    EmptyMessage,

    /// Message does not fit the 16-bit size field
    #[error("Message too large: {size} bytes exceeds maximum {max}")]
    MessageTooLarge { size: usize, max: usize },

    /// Requested chunk length leaves no room for a body
    #[error("Chunk length {max_chunk_len} leaves no room for a body after the {header} byte header")]
    ChunkLengthTooSmall { max_chunk_len: usize, header: usize },
}

impl ChunkError {
    /// True for errors the reassembler reports for a received chunk
    pub fn is_malformed_chunk(&self) -> bool {
        matches!(
            self,
            ChunkError::TooShort { .. }
                | ChunkError::OutOfBounds { .. }
                | ChunkError::SizeMismatch { .. }
        )
    }
}

/// Message frame validation failures
///
/// Reported in scan order: a bad source wins over a missing second
/// separator, a bad destination wins over nothing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Source contains characters other than letters, digits and '.'
    #[error("Invalid source {value:?}: only letters, digits and '.' are allowed")]
    InvalidSource { value: String },

    /// Destination contains characters other than letters and digits
    #[error("Invalid destination {value:?}: only letters and digits are allowed")]
    InvalidDestination { value: String },

    /// Destination falls into the routing layer's reserved namespace
    #[error("Invalid destination {value:?}: must not start with {prefix:?}")]
    ReservedDestination { value: String, prefix: String },

    /// Buffer ended before the destination field was terminated
    #[error("Truncated frame: expected 3 fields, got {fields}")]
    TruncatedFrame { fields: usize },
}

/// Result type for chunk operations
pub type ChunkResult<T> = std::result::Result<T, ChunkError>;

/// Result type for frame operations
pub type FrameResult<T> = std::result::Result<T, FrameError>;
