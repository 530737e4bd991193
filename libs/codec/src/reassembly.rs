//! # Chunk Reassembler
//!
//! ## Purpose
//!
//! Stateful accumulator that turns a stream of chunk writes from one peer
//! connection into complete message buffers. One reassembler per
//! connection; it takes `&mut self`, so submissions are serialized by
//! construction.
//!
//! ## State Machine
//!
//! ```text
//!            chunk (counter c)                 all bytes received
//!  Idle ───────────────────────▶ Receiving(c) ──────────────────────▶ Idle + MessageReady
//!   ▲                              │   │
//!   │      malformed chunk         │   │ chunk with counter c' != c
//!   └──────────────────────────────┘   └──▶ discard partial, Receiving(c')
//! ```
//!
//! A changed counter is the only signal that a previous message was
//! truncated; there is no timeout. Counter wraparound (255 → 0) is just
//! another inequality.
//!
//! ## Policies
//!
//! - [`CompletionStrategy::ByteCount`] completes once the summed chunk body
//!   lengths reach the message size. Duplicate chunks can complete a
//!   message early, leaving zeroed gaps.
//! - [`CompletionStrategy::Coverage`] completes only when the received
//!   ranges cover the whole message.
//! - [`SizeChangePolicy::Reject`] treats a same-counter chunk declaring a
//!   different total size as malformed. [`SizeChangePolicy::Reallocate`]
//!   resizes instead, keeping written bytes when growing and restarting the
//!   message when shrinking.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::mem;
use tracing::{debug, warn};

use crate::chunk::ChunkHeader;
use crate::coverage::CoverageSet;
use crate::error::ChunkError;
use crate::validation::bounds::{check_chunk_bounds, safe_slice_mut};

/// How the reassembler decides a message is complete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStrategy {
    /// Cumulative received body bytes >= message size
    #[default]
    ByteCount,
    /// Union of received ranges spans the whole message
    Coverage,
}

/// What to do when a same-counter chunk declares a different message size
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeChangePolicy {
    /// Reject the chunk as malformed and reset
    #[default]
    Reject,
    /// Resize the buffer and continue
    Reallocate,
}

/// Reassembly behaviour knobs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReassemblyPolicy {
    pub completion: CompletionStrategy,
    pub size_change: SizeChangePolicy,
}

/// Result of submitting one chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Chunk accepted, message not complete yet
    InProgress,
    /// Chunk completed a message; state has been cleared
    MessageReady(Bytes),
    /// Chunk was malformed; any in-progress message was discarded
    Rejected(ChunkError),
}

impl SubmitOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, SubmitOutcome::MessageReady(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, SubmitOutcome::Rejected(_))
    }
}

/// Counters accumulated over the reassembler's lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReassemblyStats {
    pub chunks_accepted: u64,
    pub chunks_rejected: u64,
    pub messages_completed: u64,
    /// Partial messages dropped by a counter change, a rejected chunk, a reset
    /// or a size shrink under [`SizeChangePolicy::Reallocate`]
    pub messages_abandoned: u64,
}

/// Per-connection chunk reassembly state
#[derive(Debug, Default)]
pub struct ChunkReassembler {
    policy: ReassemblyPolicy,
    last_counter: Option<u8>,
    /// Exactly the declared message size while a message is in progress, empty otherwise
    buffer: Vec<u8>,
    received_bytes: usize,
    coverage: CoverageSet,
    stats: ReassemblyStats,
}

impl ChunkReassembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ReassemblyPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Feed one chunk write into the reassembler
    pub fn submit(&mut self, chunk: &[u8]) -> SubmitOutcome {
        let (header, body) = match ChunkHeader::parse(chunk) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(
                    chunk_len = chunk.len(),
                    "Got invalid chunk; any partially received message is discarded"
                );
                return self.reject(err);
            }
        };

        if self.last_counter != Some(header.counter) {
            match self.last_counter {
                Some(previous) => debug!(
                    previous,
                    current = header.counter,
                    "Message counter changed; a new message just started"
                ),
                None => debug!(counter = header.counter, "Got first chunk of a message"),
            }
            // Partial data belongs to a message that will never be finished
            self.discard();
            self.last_counter = Some(header.counter);
        }

        let offset = header.offset();
        if let Err(err) = check_chunk_bounds(offset, body.len(), header.message_size) {
            warn!(%err, counter = header.counter, "Rejecting chunk");
            return self.reject(err);
        }

        if let Err(err) = self.prepare_buffer(&header) {
            warn!(%err, "Rejecting chunk");
            return self.reject(err);
        }

        match safe_slice_mut(&mut self.buffer, offset, body.len()) {
            Ok(target) => target.copy_from_slice(body),
            Err(err) => return self.reject(err),
        }

        self.received_bytes += body.len();
        self.coverage.insert(offset..offset + body.len());
        self.stats.chunks_accepted += 1;

        debug!(
            chunk_offset = offset,
            chunk_size = body.len(),
            received_bytes = self.received_bytes,
            message_size = header.message_size,
            counter = header.counter,
            "Got chunk"
        );

        if !self.is_complete() {
            return SubmitOutcome::InProgress;
        }

        let message = Bytes::from(mem::take(&mut self.buffer));
        self.stats.messages_completed += 1;
        self.clear();
        SubmitOutcome::MessageReady(message)
    }

    /// Drop any in-progress message, as if the connection had just started
    pub fn reset(&mut self) {
        self.discard();
    }

    pub fn is_in_progress(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Counter of the message currently being received
    pub fn last_counter(&self) -> Option<u8> {
        self.last_counter
    }

    /// Body bytes received for the current message (duplicates counted twice)
    pub fn received_bytes(&self) -> usize {
        self.received_bytes
    }

    /// Declared size of the message in progress, 0 when idle
    pub fn message_size(&self) -> usize {
        self.buffer.len()
    }

    pub fn policy(&self) -> ReassemblyPolicy {
        self.policy
    }

    pub fn stats(&self) -> ReassemblyStats {
        self.stats
    }

    /// Size the buffer for the chunk's declared message size
    fn prepare_buffer(&mut self, header: &ChunkHeader) -> Result<(), ChunkError> {
        let declared = header.message_size;
        let current = self.buffer.len();

        if current == declared {
            return Ok(());
        }
        if current == 0 {
            self.buffer.resize(declared, 0);
            return Ok(());
        }

        match self.policy.size_change {
            SizeChangePolicy::Reject => Err(ChunkError::SizeMismatch {
                counter: header.counter,
                expected: current,
                declared,
            }),
            SizeChangePolicy::Reallocate if declared > current => {
                debug!(from = current, to = declared, "Message size grew; keeping received bytes");
                self.buffer.resize(declared, 0);
                Ok(())
            }
            SizeChangePolicy::Reallocate => {
                debug!(from = current, to = declared, "Message size shrank; restarting message");
                self.stats.messages_abandoned += 1;
                self.buffer.clear();
                self.buffer.resize(declared, 0);
                self.received_bytes = 0;
                self.coverage.clear();
                Ok(())
            }
        }
    }

    fn is_complete(&self) -> bool {
        match self.policy.completion {
            CompletionStrategy::ByteCount => self.received_bytes >= self.buffer.len(),
            CompletionStrategy::Coverage => self.coverage.covers(0..self.buffer.len()),
        }
    }

    fn reject(&mut self, err: ChunkError) -> SubmitOutcome {
        self.stats.chunks_rejected += 1;
        self.discard();
        SubmitOutcome::Rejected(err)
    }

    /// Clear state, counting a partial message as abandoned
    fn discard(&mut self) {
        if self.is_in_progress() {
            debug!(
                counter = ?self.last_counter,
                received_bytes = self.received_bytes,
                message_size = self.buffer.len(),
                "Discarding partially received message"
            );
            self.stats.messages_abandoned += 1;
        }
        self.clear();
    }

    fn clear(&mut self) {
        self.last_counter = None;
        self.buffer.clear();
        self.received_bytes = 0;
        self.coverage.clear();
    }
}
