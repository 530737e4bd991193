//! # Chunk Header Codec and Sender-Side Chunking
//!
//! Every characteristic write carries one chunk: a 5 byte header followed
//! by a slice of the full message. The header tells the receiver which
//! message the chunk belongs to (counter), where its body goes (offset) and
//! how large the whole message is (size - 1, so 0 means one byte).
//!
//! The sender keeps one counter per link, uses it for every chunk of a
//! message and increments it (wrapping 255 → 0) once the message is sent.
//! A receiver that sees the counter change drops whatever partial message
//! it was holding.

use crate::constants::CHUNK_HEADER_SIZE;
use crate::error::{ChunkError, ChunkResult};
use crate::validation::bounds::{check_chunk_bounds, validate_message_size};

/// Decoded chunk header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    /// Message counter shared by all chunks of one message
    pub counter: u8,
    /// Byte offset of this chunk's body within the message
    pub offset: u16,
    /// Total message size in bytes (1..=65536, already decoded from size - 1)
    pub message_size: usize,
}

impl ChunkHeader {
    /// Header size in bytes
    pub const SIZE: usize = CHUNK_HEADER_SIZE;

    /// Create a header, validating the message size range
    pub fn new(counter: u8, offset: u16, message_size: usize) -> ChunkResult<Self> {
        validate_message_size(message_size)?;
        Ok(Self {
            counter,
            offset,
            message_size,
        })
    }

    /// Split a raw chunk into its header and body
    pub fn parse(chunk: &[u8]) -> ChunkResult<(Self, &[u8])> {
        if chunk.len() < Self::SIZE {
            return Err(ChunkError::TooShort {
                need: Self::SIZE,
                got: chunk.len(),
            });
        }

        let header = Self {
            counter: chunk[0],
            offset: u16::from_le_bytes([chunk[1], chunk[2]]),
            message_size: usize::from(u16::from_le_bytes([chunk[3], chunk[4]])) + 1,
        };

        Ok((header, &chunk[Self::SIZE..]))
    }

    /// Offset as a buffer index
    pub fn offset(&self) -> usize {
        usize::from(self.offset)
    }

    /// Append the wire encoding of this header
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        // Construction validated 1..=65536, so size - 1 fits u16
        let encoded_size = self.message_size.saturating_sub(1) as u16;
        out.push(self.counter);
        out.extend_from_slice(&self.offset.to_le_bytes());
        out.extend_from_slice(&encoded_size.to_le_bytes());
    }

    /// Encode a header plus body into a single chunk write
    pub fn encode_chunk(&self, body: &[u8]) -> ChunkResult<Vec<u8>> {
        check_chunk_bounds(self.offset(), body.len(), self.message_size)?;
        let mut chunk = Vec::with_capacity(Self::SIZE + body.len());
        self.encode_into(&mut chunk);
        chunk.extend_from_slice(body);
        Ok(chunk)
    }
}

/// Split a message into chunk writes of at most `max_chunk_len` bytes each
///
/// `max_chunk_len` is the whole write including the header, typically the
/// negotiated ATT MTU minus 3. Chunks are returned in offset order.
pub fn split_into_chunks(
    counter: u8,
    message: &[u8],
    max_chunk_len: usize,
) -> ChunkResult<Vec<Vec<u8>>> {
    validate_message_size(message.len())?;

    if max_chunk_len <= CHUNK_HEADER_SIZE {
        return Err(ChunkError::ChunkLengthTooSmall {
            max_chunk_len,
            header: CHUNK_HEADER_SIZE,
        });
    }

    let body_len = max_chunk_len - CHUNK_HEADER_SIZE;
    let mut chunks = Vec::with_capacity(message.len().div_ceil(body_len));

    for (index, body) in message.chunks(body_len).enumerate() {
        // Offsets stay below the message size, which is at most 65536
        let offset = (index * body_len) as u16;
        let header = ChunkHeader::new(counter, offset, message.len())?;
        chunks.push(header.encode_chunk(body)?);
    }

    Ok(chunks)
}
