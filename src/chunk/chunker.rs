//! Outbound helper that splits messages into header-tagged chunks.
//!
//! [`Chunker`] is the mirror image of [`Reassembler`](crate::reassembly::Reassembler):
//! every chunk it emits carries its index and the total count, so the
//! receiving side can rebuild the message byte for byte regardless of the
//! order in which packets arrive.

use std::num::NonZeroUsize;

use bytes::Bytes;

use super::{Chunk, ChunkHeader, ChunkingConfig, ChunkingError, MAX_CHUNK_COUNT};
use crate::message::Message;

/// Split `message` into chunks of at most `max_payload_len` payload bytes.
///
/// # Errors
///
/// Returns [`ChunkingError::InvalidPayloadLength`] when `max_payload_len` is
/// zero and [`ChunkingError::MessageTooLarge`] when more than sixteen chunks
/// would be required.
///
/// # Examples
///
/// ```
/// use meshframe::chunk::chunk;
///
/// let batch = chunk(&b"hello world"[..], 4).expect("fits in sixteen chunks");
/// assert_eq!(batch.len(), 3);
/// assert_eq!(batch.chunks()[2].payload().as_ref(), b"rld");
/// ```
pub fn chunk(message: impl Into<Bytes>, max_payload_len: usize) -> Result<ChunkBatch, ChunkingError> {
    let max = NonZeroUsize::new(max_payload_len).ok_or(ChunkingError::InvalidPayloadLength)?;
    Chunker::new(max).chunk(message)
}

/// Splits messages into chunk-sized fragments.
#[derive(Clone, Copy, Debug)]
pub struct Chunker {
    max_payload_len: NonZeroUsize,
}

impl Chunker {
    /// Create a chunker that caps chunk payloads at `max_payload_len` bytes.
    #[must_use]
    pub const fn new(max_payload_len: NonZeroUsize) -> Self { Self { max_payload_len } }

    /// Create a chunker honouring the payload budget of `config`.
    #[must_use]
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.max_chunk_payload_length())
    }

    /// Return the maximum payload carried by a single chunk.
    #[must_use]
    pub const fn max_payload_len(&self) -> NonZeroUsize { self.max_payload_len }

    /// Largest message this chunker accepts.
    #[must_use]
    pub const fn max_message_len(&self) -> usize {
        self.max_payload_len.get().saturating_mul(MAX_CHUNK_COUNT)
    }

    /// Serialise `message` and split the bytes into chunks.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkingError::Encode`] if serialisation fails, or
    /// [`ChunkingError::MessageTooLarge`] if the encoded message needs more
    /// than sixteen chunks.
    pub fn chunk_message<M: Message>(&self, message: &M) -> Result<ChunkBatch, ChunkingError> {
        let bytes = message.to_bytes()?;
        self.chunk(bytes)
    }

    /// Split `message` into consecutive chunks.
    ///
    /// An empty message still produces a single chunk so the receiver
    /// observes a last-index arrival.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkingError::MessageTooLarge`] if more than sixteen chunks
    /// would be required.
    pub fn chunk(&self, message: impl Into<Bytes>) -> Result<ChunkBatch, ChunkingError> {
        let message = message.into();
        let limit = self.max_message_len();
        if message.len() > limit {
            return Err(ChunkingError::MessageTooLarge {
                len: message.len(),
                limit,
            });
        }

        let max = self.max_payload_len.get();
        let total = message.len().div_ceil(max).max(1);
        let count = u8::try_from(total).map_err(|_| ChunkingError::MessageTooLarge {
            len: message.len(),
            limit,
        })?;

        let mut chunks = Vec::with_capacity(total);
        for index in 0..count {
            let start = usize::from(index) * max;
            let end = (start + max).min(message.len());
            let header = ChunkHeader::new(index, count).map_err(|_| {
                ChunkingError::MessageTooLarge {
                    len: message.len(),
                    limit,
                }
            })?;
            chunks.push(Chunk::new(header, message.slice(start..end)));
        }

        Ok(ChunkBatch::new(chunks))
    }
}

/// Ordered chunks produced for a single message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkBatch {
    chunks: Vec<Chunk>,
}

impl ChunkBatch {
    fn new(chunks: Vec<Chunk>) -> Self {
        debug_assert!(!chunks.is_empty(), "chunk batches must not be empty");
        Self { chunks }
    }

    /// Return the chunks in index order.
    #[must_use]
    pub fn chunks(&self) -> &[Chunk] { self.chunks.as_slice() }

    /// Number of chunks in the batch.
    #[expect(
        clippy::len_without_is_empty,
        reason = "batches are guaranteed non-empty"
    )]
    #[must_use]
    pub fn len(&self) -> usize { self.chunks.len() }

    /// Whether the message needed more than one chunk.
    #[must_use]
    pub fn is_chunked(&self) -> bool { self.len() > 1 }

    /// Encode every chunk into its wire form, in index order.
    #[must_use]
    pub fn to_wire(&self) -> Vec<Bytes> { self.chunks.iter().map(Chunk::to_wire).collect() }

    /// Consume the batch, returning the chunks.
    #[must_use]
    pub fn into_chunks(self) -> Vec<Chunk> { self.chunks }
}

impl IntoIterator for ChunkBatch {
    type Item = Chunk;
    type IntoIter = std::vec::IntoIter<Chunk>;

    fn into_iter(self) -> Self::IntoIter { self.chunks.into_iter() }
}
