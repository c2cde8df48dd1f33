//! Sizing parameters for outbound chunking.

use std::num::NonZeroUsize;

use super::{CHUNK_HEADER_LEN, MAX_CHUNK_COUNT};

/// Default wire size of a single chunk, header byte included.
pub const DEFAULT_MAX_CHUNK_LENGTH: usize = 200;

/// Settings bounding the size of chunks handed to the radio.
///
/// Built through [`ChunkingConfig::for_chunk_length`] or [`Default`], so the
/// wire length always leaves at least one payload byte after the header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkingConfig {
    max_chunk_payload_length: NonZeroUsize,
}

impl ChunkingConfig {
    /// Derive a configuration from the largest packet the radio accepts.
    ///
    /// Returns `None` when `max_chunk_length` leaves no room for payload
    /// after the header byte.
    #[must_use]
    pub fn for_chunk_length(max_chunk_length: usize) -> Option<Self> {
        let payload = max_chunk_length.checked_sub(CHUNK_HEADER_LEN)?;
        Some(Self {
            max_chunk_payload_length: NonZeroUsize::new(payload)?,
        })
    }

    /// Maximum number of bytes a chunk occupies on the wire, including the
    /// one-byte header.
    #[must_use]
    pub const fn max_chunk_length(&self) -> usize {
        self.max_chunk_payload_length.get() + CHUNK_HEADER_LEN
    }

    /// Payload bytes available to each chunk once the header is accounted for.
    #[must_use]
    pub const fn max_chunk_payload_length(&self) -> NonZeroUsize { self.max_chunk_payload_length }

    /// Largest message that fits into [`MAX_CHUNK_COUNT`] chunks.
    #[must_use]
    pub const fn max_message_len(&self) -> usize {
        self.max_chunk_payload_length.get().saturating_mul(MAX_CHUNK_COUNT)
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self::for_chunk_length(DEFAULT_MAX_CHUNK_LENGTH).unwrap_or(Self {
            max_chunk_payload_length: NonZeroUsize::MIN,
        })
    }
}
