//! Inbound packet dispatch and listener fan-out.
//!
//! [`Dispatcher::handle_packet`] runs on whatever context the transport
//! delivers packets on. It filters out payloads that are not chunked
//! application data, feeds chunks to the [`Reassembler`](crate::reassembly::Reassembler),
//! and queues completed messages on a bounded channel. A single
//! [`DispatchWorker`] task drains that channel and notifies listeners, so
//! listeners never run on the ingestion path and observe messages in the
//! order they completed.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod listener;
pub mod panic;
pub mod worker;

pub use config::{DISCOVERY_BROADCAST_MARKER, DispatchConfig, DispatchConfigBuilder};
pub use dispatcher::{Dispatcher, Ingest};
pub use error::{DispatchConfigError, DispatchError};
pub use listener::{ListenerId, ListenerRegistry, MessageListener};
pub use panic::ListenerPanic;
pub use worker::DispatchWorker;

#[cfg(test)]
mod tests;
