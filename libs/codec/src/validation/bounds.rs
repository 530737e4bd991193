//! Bounds Checking for Safe Buffer Writes
//!
//! Chunk offsets come straight off the wire. Every write into a reassembly
//! buffer goes through these checks so a hostile offset is a rejected chunk,
//! never an out-of-range access.

use crate::constants::{MAX_MESSAGE_SIZE, MIN_MESSAGE_SIZE};
use crate::error::ChunkError;

/// Check that `length` bytes starting at `offset` fit a message of `message_size` bytes
pub fn check_chunk_bounds(
    offset: usize,
    length: usize,
    message_size: usize,
) -> Result<(), ChunkError> {
    match offset.checked_add(length) {
        Some(end) if end <= message_size => Ok(()),
        _ => Err(ChunkError::OutOfBounds {
            offset,
            length,
            message_size,
        }),
    }
}

/// Safely extract a mutable slice from a buffer with bounds checking
pub fn safe_slice_mut(
    buffer: &mut [u8],
    offset: usize,
    length: usize,
) -> Result<&mut [u8], ChunkError> {
    check_chunk_bounds(offset, length, buffer.len())?;
    Ok(&mut buffer[offset..offset + length])
}

/// Validate that a message size fits the 16-bit size field
pub fn validate_message_size(size: usize) -> Result<(), ChunkError> {
    if size < MIN_MESSAGE_SIZE {
        return Err(ChunkError::EmptyMessage);
    }
    if size > MAX_MESSAGE_SIZE {
        return Err(ChunkError::MessageTooLarge {
            size,
            max: MAX_MESSAGE_SIZE,
        });
    }
    Ok(())
}
