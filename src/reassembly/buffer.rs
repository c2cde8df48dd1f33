//! Chunk storage for one sender and the slot-based assembly step.

use std::time::Instant;

use bytes::{Bytes, BytesMut};

use crate::chunk::Chunk;

/// Chunks received so far for a sender's in-flight message, in arrival order.
#[derive(Debug, Default)]
pub(super) struct SenderBuffer {
    chunks: Vec<Chunk>,
    started_at: Option<Instant>,
}

impl SenderBuffer {
    pub(super) fn push(&mut self, chunk: Chunk, now: Instant) {
        if self.chunks.is_empty() {
            self.started_at = Some(now);
        }
        self.chunks.push(chunk);
    }

    /// Drain every buffered chunk, leaving the buffer empty.
    pub(super) fn take(&mut self) -> Vec<Chunk> {
        self.started_at = None;
        std::mem::take(&mut self.chunks)
    }

    pub(super) fn len(&self) -> usize { self.chunks.len() }

    pub(super) fn is_empty(&self) -> bool { self.chunks.is_empty() }

    pub(super) fn started_at(&self) -> Option<Instant> { self.started_at }

    /// Whether every index of a `count`-chunk message is buffered.
    pub(super) fn has_all_slots(&self, count: u8) -> bool {
        let seen = self
            .chunks
            .iter()
            .filter(|chunk| chunk.count() == count)
            .fold(0_u32, |mask, chunk| mask | (1 << chunk.index()));
        seen.count_ones() == u32::from(count)
    }
}

/// Place chunks into `expected_count` slots and concatenate them.
///
/// Chunks whose count differs from `expected_count` belong to another message
/// and are skipped. A repeated index overwrites the earlier arrival.
///
/// Returns the zero-based position of the first empty slot on failure.
pub(super) fn assemble(chunks: Vec<Chunk>, expected_count: u8) -> Result<Bytes, usize> {
    let mut slots: Vec<Option<Bytes>> = vec![None; usize::from(expected_count)];
    for chunk in chunks {
        if chunk.count() != expected_count {
            continue;
        }
        let (header, payload) = chunk.into_parts();
        if let Some(slot) = slots.get_mut(usize::from(header.index())) {
            *slot = Some(payload);
        }
    }

    if let Some(missing) = slots.iter().position(Option::is_none) {
        return Err(missing);
    }

    let mut payloads = slots.into_iter().flatten();
    if expected_count == 1 {
        return Ok(payloads.next().unwrap_or_default());
    }

    let payloads: Vec<Bytes> = payloads.collect();
    let total = payloads.iter().map(Bytes::len).sum();
    let mut message = BytesMut::with_capacity(total);
    for payload in &payloads {
        message.extend_from_slice(payload);
    }
    Ok(message.freeze())
}
