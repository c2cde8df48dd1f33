//! Inbound helper that rebuilds messages from per-sender chunk buffers.
//!
//! [`Reassembler`] keeps a concurrent map from [`SenderId`] to a buffer guarded
//! by its own mutex. The map lock is held only to find or create the buffer;
//! appending and assembling then happen under the buffer lock alone, so
//! senders never contend with each other and two chunks from the same sender
//! are never interleaved mid-append. Buffers stay in the map while a caller
//! may still hold them, which keeps the buffer a chunk is appended to the
//! same one the next chunk will see.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

use bincode::error::DecodeError;
use bytes::Bytes;
use dashmap::DashMap;
use tracing::{debug, error, warn};

use super::{
    PayloadId,
    ReassemblyError,
    SenderId,
    buffer::{SenderBuffer, assemble},
};
use crate::{
    chunk::Chunk,
    message::Message,
    metrics::{self, Direction, FailureReason},
};

/// Suggested deadline for an incomplete message when eviction is enabled.
pub const MESSAGE_AWAIT_TIMEOUT: Duration = Duration::from_secs(70);

type SharedBuffer = Arc<Mutex<SenderBuffer>>;

fn lock(buffer: &Mutex<SenderBuffer>) -> MutexGuard<'_, SenderBuffer> {
    buffer.lock().unwrap_or_else(PoisonError::into_inner)
}

/// When a sender's buffer is assembled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompletionPolicy {
    /// Assemble when the chunk with the final index arrives, even if earlier
    /// slots are still empty. Matches the deployed wire behaviour.
    #[default]
    LastIndex,
    /// Assemble when every slot of the arriving chunk's message is buffered,
    /// whichever chunk arrives last. Never reports a missing chunk; partial
    /// messages are only released by eviction.
    AllSlots,
}

/// A complete message rebuilt from its chunks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReassembledMessage {
    sender_id: SenderId,
    message_id: PayloadId,
    bytes: Bytes,
}

impl ReassembledMessage {
    /// Construct a new [`ReassembledMessage`].
    #[must_use]
    pub fn new(sender_id: SenderId, message_id: PayloadId, bytes: Bytes) -> Self {
        Self {
            sender_id,
            message_id,
            bytes,
        }
    }

    /// Node that sent the message.
    #[must_use]
    pub fn sender_id(&self) -> &SenderId { &self.sender_id }

    /// Identifier of the packet that carried the final chunk.
    #[must_use]
    pub const fn message_id(&self) -> PayloadId { self.message_id }

    /// Borrow the reassembled bytes.
    #[must_use]
    pub fn bytes(&self) -> &Bytes { &self.bytes }

    /// Consume the message, returning the owned bytes.
    #[must_use]
    pub fn into_bytes(self) -> Bytes { self.bytes }

    /// Decode the bytes into a typed message.
    ///
    /// # Errors
    ///
    /// Returns any [`DecodeError`] raised while deserialising the bytes.
    pub fn decode<M: Message>(&self) -> Result<M, DecodeError> {
        let (message, _) = M::from_bytes(&self.bytes)?;
        Ok(message)
    }
}

/// Concurrent, per-sender chunk reassembler.
///
/// All methods take `&self`; share the reassembler between transport
/// callbacks with an [`Arc`].
#[derive(Debug, Default)]
pub struct Reassembler {
    buffers: DashMap<SenderId, SharedBuffer>,
    timeout: Option<Duration>,
    policy: CompletionPolicy,
}

impl Reassembler {
    /// Create a reassembler that keeps partial messages until their final
    /// chunk arrives.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Evict partial messages older than `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Select when buffers are assembled.
    #[must_use]
    pub fn with_policy(mut self, policy: CompletionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Return the eviction deadline, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> { self.timeout }

    /// Return the completion policy.
    #[must_use]
    pub const fn policy(&self) -> CompletionPolicy { self.policy }

    /// Fold `chunk` from `sender` into its buffer using the current time.
    ///
    /// Returns `Ok(Some(_))` when the chunk carried the final index and every
    /// slot was present, and `Ok(None)` while the message is still
    /// accumulating.
    ///
    /// # Errors
    ///
    /// Returns [`ReassemblyError::MissingChunk`] when the final chunk arrives
    /// but an earlier slot is empty. The message is discarded.
    pub fn ingest(
        &self,
        sender: &SenderId,
        payload_id: PayloadId,
        chunk: Chunk,
    ) -> Result<Option<ReassembledMessage>, ReassemblyError> {
        self.ingest_at(sender, payload_id, chunk, Instant::now())
    }

    /// Fold `chunk` into its buffer using an explicit clock reading.
    ///
    /// # Errors
    ///
    /// Returns [`ReassemblyError::MissingChunk`] when assembly finds an empty
    /// slot.
    pub fn ingest_at(
        &self,
        sender: &SenderId,
        payload_id: PayloadId,
        chunk: Chunk,
        now: Instant,
    ) -> Result<Option<ReassembledMessage>, ReassemblyError> {
        if self.timeout.is_some() {
            self.purge_expired_at(now);
        }

        debug!(
            sender = %sender,
            index = chunk.index(),
            count = chunk.count(),
            "<--- chunk {}/{} from {sender}",
            u16::from(chunk.index()) + 1,
            chunk.count(),
        );
        metrics::inc_chunks(Direction::Inbound);

        let buffer = self.buffer_for(sender);
        let expected_count = chunk.count();
        let is_last = chunk.is_last();

        let chunks = {
            let mut guard = lock(&buffer);
            guard.push(chunk, now);
            let completes = match self.policy {
                CompletionPolicy::LastIndex => is_last,
                CompletionPolicy::AllSlots => guard.has_all_slots(expected_count),
            };
            if !completes {
                return Ok(None);
            }
            guard.take()
        };
        drop(buffer);

        let result = assemble(chunks, expected_count);
        self.release_if_idle(sender);

        match result {
            Ok(bytes) => {
                metrics::inc_reassembled();
                Ok(Some(ReassembledMessage::new(
                    sender.clone(),
                    payload_id,
                    bytes,
                )))
            }
            Err(slot) => {
                error!(
                    sender = %sender,
                    slot,
                    count = expected_count,
                    "missing chunk {}/{expected_count} from {sender}",
                    slot + 1,
                );
                metrics::inc_reassembly_failures(FailureReason::MissingChunk);
                Err(ReassemblyError::MissingChunk {
                    sender: sender.clone(),
                    slot,
                    count: expected_count,
                })
            }
        }
    }

    /// Drop partial messages older than the configured timeout.
    ///
    /// Returns the senders whose buffers were evicted. Does nothing when no
    /// timeout is configured.
    pub fn purge_expired(&self) -> Vec<SenderId> { self.purge_expired_at(Instant::now()) }

    /// Drop partial messages older than the configured timeout using an
    /// explicit clock reading.
    pub fn purge_expired_at(&self, now: Instant) -> Vec<SenderId> {
        let Some(timeout) = self.timeout else {
            return Vec::new();
        };

        let mut evicted = Vec::new();
        self.buffers.retain(|sender, buffer| {
            let mut guard = lock(buffer);
            let expired = guard
                .started_at()
                .is_some_and(|started| now.saturating_duration_since(started) >= timeout);
            if expired {
                let dropped = guard.take().len();
                warn!(sender = %sender, dropped, "evicting incomplete message from {sender}");
                metrics::inc_reassembly_failures(FailureReason::Expired);
                evicted.push(sender.clone());
            }
            !(guard.is_empty() && Arc::strong_count(buffer) == 1)
        });

        evicted
    }

    /// Number of senders with a partially received message.
    #[must_use]
    pub fn buffered_len(&self) -> usize {
        self.buffers
            .iter()
            .filter(|entry| !lock(entry.value()).is_empty())
            .count()
    }

    /// Number of chunks currently buffered for `sender`.
    #[must_use]
    pub fn pending_chunks(&self, sender: &SenderId) -> usize {
        self.buffers
            .get(sender)
            .map_or(0, |entry| lock(entry.value()).len())
    }

    fn buffer_for(&self, sender: &SenderId) -> SharedBuffer {
        if let Some(existing) = self.buffers.get(sender) {
            return Arc::clone(existing.value());
        }
        Arc::clone(self.buffers.entry(sender.clone()).or_default().value())
    }

    /// Remove the entry for `sender` once it is empty and nobody else holds it.
    ///
    /// The strong count is checked under the map's shard lock, which is the
    /// only place new handles are cloned from.
    fn release_if_idle(&self, sender: &SenderId) {
        self.buffers.remove_if(sender, |_, buffer| {
            Arc::strong_count(buffer) == 1 && lock(buffer).is_empty()
        });
    }
}
