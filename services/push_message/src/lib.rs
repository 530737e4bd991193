//! # Push Message Service
//!
//! Server side of the push message characteristic. Each connected peer
//! writes chunks to its own [`PushMessageEndpoint`]; once a message is
//! complete it is parsed into a frame and handed to a
//! [`MessageRouter`](extmsg_sink::MessageRouter).
//!
//! ```text
//! write(conn, chunk) → EndpointRegistry → PushMessageEndpoint → MessageRouter
//!                                           │ ChunkReassembler
//!                                           │ FrameParser
//! ```

pub mod endpoint;
pub mod input;
pub mod registry;

pub use endpoint::{EndpointSettings, PushMessageEndpoint, WriteOutcome};
pub use input::{parse_line, ChunkWrite, InputError};
pub use registry::{ConnectionId, EndpointRegistry};
