//! Per-sender reassembly of chunked messages.
//!
//! The mesh protocol carries no message identifier beyond the sender, so the
//! [`Reassembler`] keeps exactly one buffer per [`SenderId`] holding the chunks
//! of that sender's in-flight message. Chunks are accepted in any order; the
//! message is assembled when the chunk carrying the final index arrives, and
//! the buffer is emptied on every assembly attempt whether or not it
//! succeeds.
//!
//! Two messages from the same sender must not overlap on the air. If a new
//! message starts before the previous final chunk is processed, the stale
//! chunks are either skipped (different chunk count) or overwrite slots of the
//! new message. Callers pace their sends accordingly.

mod buffer;
pub mod error;
pub mod id;
pub mod reassembler;

pub use error::ReassemblyError;
pub use id::{PayloadId, SenderId};
pub use reassembler::{CompletionPolicy, MESSAGE_AWAIT_TIMEOUT, ReassembledMessage, Reassembler};
