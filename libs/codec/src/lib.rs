//! # External App Message Codec
//!
//! ## Purpose
//!
//! This crate contains the "Rules" layer of the push message service:
//! - Chunk header decoding/encoding and sender-side chunking
//! - Stateful chunk reassembly with configurable completion and size-change policies
//! - Message frame parsing and identifier validation
//! - Protocol constants and error types
//!
//! ## Architecture Role
//!
//! ```text
//! characteristic write → [ChunkReassembler] → [FrameParser] → message router
//!        ↑                       ↓                  ↓               ↓
//!   Raw chunk bytes      Complete buffer     MessageFrame     deliver(dest, src, payload)
//! ```
//!
//! ## What This Crate Does NOT Contain
//! - Transport logic or link-level security (belongs to the GATT layer)
//! - Router implementations (belongs in `extmsg-sink`)
//! - Connection bookkeeping (belongs in the push message service)
//!
//! ## Example
//!
//! ```
//! use extmsg_codec::{split_into_chunks, ChunkReassembler, FrameParser, MessageFrame, SubmitOutcome};
//!
//! // Sender side
//! let frame = MessageFrame::new("com.example.App", "weather", &b"sunny"[..]).unwrap();
//! let chunks = split_into_chunks(0, &frame.encode(), 8).unwrap();
//!
//! // Receiver side
//! let mut reassembler = ChunkReassembler::new();
//! let parser = FrameParser::default();
//! let mut decoded = None;
//! for chunk in &chunks {
//!     if let SubmitOutcome::MessageReady(buffer) = reassembler.submit(chunk) {
//!         decoded = Some(parser.decode(buffer).unwrap());
//!     }
//! }
//! assert_eq!(decoded.unwrap(), frame);
//! ```

// Core modules
pub mod chunk;
pub mod constants;
pub mod coverage;
pub mod error;
pub mod frame;
pub mod parser;
pub mod reassembly;
pub mod validation;

// Re-export key types for convenience
pub use chunk::{split_into_chunks, ChunkHeader};
pub use constants::*;
pub use coverage::CoverageSet;
pub use error::{ChunkError, ChunkResult, FrameError, FrameResult};
pub use frame::MessageFrame;
pub use parser::{decode_frame, FrameParser};
pub use reassembly::{
    ChunkReassembler, CompletionStrategy, ReassemblyPolicy, ReassemblyStats, SizeChangePolicy,
    SubmitOutcome,
};
