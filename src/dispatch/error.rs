//! Error types for packet dispatch and its configuration.

use thiserror::Error;

use crate::{chunk::ChunkError, reassembly::ReassemblyError};

/// Reasons an inbound packet did not produce a queued message.
///
/// These are diagnostics for the transport callback; listeners never observe
/// them.
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The payload arrived on an unrecognised port.
    #[error("unknown payload type {0}")]
    UnknownPayloadType(u32),
    /// The payload was not a valid chunk.
    #[error(transparent)]
    Chunk(#[from] ChunkError),
    /// The chunk completed a message that could not be rebuilt.
    #[error(transparent)]
    Reassembly(#[from] ReassemblyError),
    /// The listener queue was full; the message was dropped.
    #[error("dispatch queue full")]
    QueueFull,
    /// The dispatch worker has stopped.
    #[error("dispatch queue closed")]
    Closed,
}

/// Errors returned when building a dispatcher.
#[non_exhaustive]
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DispatchConfigError {
    /// The queue capacity was zero.
    #[error("invalid queue capacity {0}; must be >= 1")]
    InvalidCapacity(usize),
}
