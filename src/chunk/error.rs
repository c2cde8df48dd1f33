//! Errors raised by the chunk codec and the outbound chunker.

use bincode::error::EncodeError;
use thiserror::Error;

/// A received packet could not be interpreted as a chunk.
///
/// Every variant describes a malformed chunk. The packet is dropped and no
/// sender buffer is touched.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ChunkError {
    /// The packet was empty, so not even a header byte arrived.
    #[error("malformed chunk: header byte absent")]
    MissingHeader,
    /// A header for a multi-chunk message arrived with no payload bytes.
    #[error("malformed chunk {index}/{count}: empty payload")]
    EmptyPayload { index: u8, count: u8 },
    /// The header does not describe a valid position.
    #[error("invalid chunk header: index {index} with count {count}")]
    InvalidHeader { index: u8, count: u8 },
}

/// Errors produced while splitting an outbound message.
#[derive(Debug, Error)]
pub enum ChunkingError {
    /// The message needs more than sixteen chunks at the configured size.
    #[error("message of {len} bytes exceeds the {limit} byte limit")]
    MessageTooLarge { len: usize, limit: usize },
    /// The maximum payload length per chunk was zero.
    #[error("maximum chunk payload length must be at least one byte")]
    InvalidPayloadLength,
    /// Serialising a typed message failed before chunking.
    #[error("failed to encode message: {0}")]
    Encode(#[from] EncodeError),
}
