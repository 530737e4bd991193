//! # Protocol Constants - Chunk and Frame Wire Format
//!
//! ## Purpose
//!
//! Central registry of the wire-level constants shared by the chunk
//! reassembler and the message frame parser. These values are bit-exact
//! parts of the protocol spoken by sending peers and must remain stable.
//!
//! ## Chunk Layout
//!
//! ```text
//! ┌─────────┬──────────────┬────────────────────┬──────────────┐
//! │ counter │ offset (LE)  │ message size-1 (LE)│ body ...     │
//! │  1 byte │   2 bytes    │      2 bytes       │ rest of write│
//! └─────────┴──────────────┴────────────────────┴──────────────┘
//! ```
//!
//! ## Frame Layout
//!
//! ```text
//! source '\n' destination '\n' payload
//! ```

/// Size of the header carried by every chunk: counter + offset + size field
pub const CHUNK_HEADER_SIZE: usize = 5;

/// Smallest message a chunk header can declare (size field 0x0000)
pub const MIN_MESSAGE_SIZE: usize = 1;

/// Largest message a chunk header can declare (size field 0xFFFF)
pub const MAX_MESSAGE_SIZE: usize = u16::MAX as usize + 1;

/// Separator between the source, destination and payload fields of a frame
pub const FIELD_SEPARATOR: u8 = b'\n';

/// Destination namespace reserved for the routing layer itself.
///
/// Destinations beginning with this literal (case-sensitive) are never
/// addressable by peers.
pub const RESERVED_DESTINATION_PREFIX: &str = "interfaces";

/// The only non-alphanumeric character allowed in a source identifier
pub const SOURCE_EXTRA_CHAR: char = '.';
