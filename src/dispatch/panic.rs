//! Reports for listeners that panic while handling a message.
//!
//! The worker catches the unwind so one faulty listener cannot stop
//! delivery; what it caught is described by a [`ListenerPanic`].

use std::{any::Any, fmt};

use super::ListenerId;
use crate::reassembly::{PayloadId, ReassembledMessage, SenderId};

/// A listener panicked while handling a reassembled message.
pub struct ListenerPanic {
    listener: ListenerId,
    message_id: PayloadId,
    sender: SenderId,
    payload: Box<dyn Any + Send>,
}

impl ListenerPanic {
    pub(crate) fn new(
        listener: ListenerId,
        message: &ReassembledMessage,
        payload: Box<dyn Any + Send>,
    ) -> Self {
        Self {
            listener,
            message_id: message.message_id(),
            sender: message.sender_id().clone(),
            payload,
        }
    }

    /// Listener that panicked.
    #[must_use]
    pub const fn listener(&self) -> ListenerId { self.listener }

    /// Identifier of the message being handled.
    #[must_use]
    pub const fn message_id(&self) -> PayloadId { self.message_id }

    /// Sender of the message being handled.
    #[must_use]
    pub fn sender(&self) -> &SenderId { &self.sender }

    /// The panic message, when the listener panicked with a string.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.payload
            .downcast_ref::<String>()
            .map(String::as_str)
            .or_else(|| self.payload.downcast_ref::<&'static str>().copied())
    }
}

impl fmt::Display for ListenerPanic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "listener {} panicked on message {} from {}: {}",
            self.listener,
            self.message_id,
            self.sender,
            self.reason().unwrap_or("non-string panic payload"),
        )
    }
}

impl fmt::Debug for ListenerPanic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerPanic")
            .field("listener", &self.listener)
            .field("message_id", &self.message_id)
            .field("sender", &self.sender)
            .field("reason", &self.reason())
            .finish()
    }
}
