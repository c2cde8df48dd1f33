//! Canonical error and result types for the crate.
//!
//! Each module reports its own error enum; `MeshframeError` collects them for
//! callers that drive several layers at once.

use thiserror::Error;

use crate::{
    chunk::{ChunkError, ChunkingError},
    dispatch::{DispatchConfigError, DispatchError},
    reassembly::ReassemblyError,
};

/// Top-level error type exposed by `meshframe`.
#[derive(Debug, Error)]
pub enum MeshframeError {
    /// A received packet was not a valid chunk.
    #[error(transparent)]
    Chunk(#[from] ChunkError),
    /// An outbound message could not be chunked.
    #[error(transparent)]
    Chunking(#[from] ChunkingError),
    /// A message was discarded during reassembly.
    #[error(transparent)]
    Reassembly(#[from] ReassemblyError),
    /// An inbound packet could not be dispatched.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    /// The dispatcher configuration was invalid.
    #[error(transparent)]
    Config(#[from] DispatchConfigError),
}

/// Canonical result alias used by `meshframe` public APIs.
pub type Result<T> = std::result::Result<T, MeshframeError>;
