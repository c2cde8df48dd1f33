//! Errors surfaced while reassembling chunked messages.

use thiserror::Error;

use super::SenderId;

/// Reassembly failed and the in-flight message was discarded.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ReassemblyError {
    /// The final chunk arrived but an earlier slot was never filled.
    ///
    /// `slot` is zero-based; the message text reports it one-based.
    #[error("missing chunk {}/{count} from {sender}", .slot + 1)]
    MissingChunk {
        sender: SenderId,
        slot: usize,
        count: u8,
    },
}

impl ReassemblyError {
    /// Sender whose message was discarded.
    #[must_use]
    pub fn sender(&self) -> &SenderId {
        match self {
            Self::MissingChunk { sender, .. } => sender,
        }
    }
}
