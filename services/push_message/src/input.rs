//! Line-oriented chunk input for the service binary
//!
//! Each line is a hex-encoded chunk, optionally prefixed with a decimal
//! connection id and a colon:
//!
//! ```text
//! # comment
//! 0000000600617070          chunk for connection 0
//! 3:0000000600617070        chunk for connection 3
//! ```

use thiserror::Error;

use crate::registry::ConnectionId;

/// Connection used when a line has no prefix
pub const DEFAULT_CONNECTION: ConnectionId = 0;

/// One decoded input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkWrite {
    pub connection: ConnectionId,
    pub chunk: Vec<u8>,
}

#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("Invalid connection id {value:?}")]
    InvalidConnection { value: String },

    #[error("Invalid hex chunk: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// Parse an input line; blank lines and `#` comments yield `None`
pub fn parse_line(line: &str) -> Result<Option<ChunkWrite>, InputError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (connection, encoded) = match line.split_once(':') {
        Some((id, rest)) => {
            let connection = id.trim().parse().map_err(|_| InputError::InvalidConnection {
                value: id.to_string(),
            })?;
            (connection, rest.trim())
        }
        None => (DEFAULT_CONNECTION, line),
    };

    let chunk = hex::decode(encoded)?;
    Ok(Some(ChunkWrite { connection, chunk }))
}
