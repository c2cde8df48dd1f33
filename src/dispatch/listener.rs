//! Listener registry safe to mutate while messages are being delivered.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use bytes::Bytes;
use dashmap::DashMap;
use derive_more::Display;

use crate::reassembly::PayloadId;

/// Receives every successfully reassembled message.
///
/// Implemented for any `Fn(PayloadId, &Bytes) + Send + Sync` closure.
pub trait MessageListener: Send + Sync {
    /// Called once per completed message on the dispatch worker.
    fn on_message_received(&self, message_id: PayloadId, message: &Bytes);
}

impl<F> MessageListener for F
where
    F: Fn(PayloadId, &Bytes) + Send + Sync,
{
    fn on_message_received(&self, message_id: PayloadId, message: &Bytes) {
        self(message_id, message);
    }
}

/// Handle returned by [`ListenerRegistry::add`], used to unregister.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[display("{_0}")]
pub struct ListenerId(u64);

impl ListenerId {
    /// Return the inner `u64` representation.
    #[must_use]
    pub const fn as_u64(self) -> u64 { self.0 }
}

/// Concurrent set of registered listeners.
///
/// Delivery iterates over a snapshot, so listeners registered while a
/// message is being delivered may or may not see it.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: DashMap<ListenerId, Arc<dyn MessageListener>>,
    next_id: AtomicU64,
}

impl ListenerRegistry {
    /// Register `listener` and return its handle.
    pub fn add(&self, listener: Arc<dyn MessageListener>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.insert(id, listener);
        id
    }

    /// Unregister a listener. Returns `false` if it was not registered.
    pub fn remove(&self, id: ListenerId) -> bool { self.listeners.remove(&id).is_some() }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize { self.listeners.len() }

    /// Whether no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.listeners.is_empty() }

    /// Clone the current listeners so they can be invoked without holding
    /// any registry lock.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(ListenerId, Arc<dyn MessageListener>)> {
        self.listeners
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect()
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
