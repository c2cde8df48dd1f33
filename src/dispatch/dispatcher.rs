//! Ingestion entry point used by the transport callback.

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace, warn};

use super::{
    DispatchConfig,
    DispatchError,
    DispatchWorker,
    ListenerId,
    ListenerRegistry,
    MessageListener,
};
use crate::{
    chunk::Chunk,
    metrics::{self, DropReason},
    reassembly::{PayloadId, ReassembledMessage, Reassembler},
    transport::{MeshPacket, PayloadType},
};

/// What happened to a packet handed to [`Dispatcher::handle_packet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ingest {
    /// Node-info or position payload; not for this layer.
    Ignored,
    /// Discovery broadcast; dropped before reassembly.
    Discovery,
    /// Chunk buffered; the message is not complete yet.
    Pending,
    /// Chunk completed a message, which is queued for listeners.
    Queued(PayloadId),
}

/// Filters inbound packets, reassembles chunks, and queues completed
/// messages for the [`DispatchWorker`].
///
/// `handle_packet` never blocks and may be called concurrently from any
/// thread, inside or outside a Tokio runtime.
#[derive(Debug)]
pub struct Dispatcher {
    reassembler: Reassembler,
    listeners: Arc<ListenerRegistry>,
    tx: mpsc::Sender<ReassembledMessage>,
    config: DispatchConfig,
    shutdown: CancellationToken,
}

impl Dispatcher {
    /// Create a dispatcher and the worker that delivers its messages.
    ///
    /// The worker must be spawned (or run) for listeners to be notified.
    #[must_use]
    pub fn new(config: DispatchConfig) -> (Self, DispatchWorker) {
        let (tx, rx) = mpsc::channel(config.queue_capacity());
        let listeners = Arc::new(ListenerRegistry::default());
        let shutdown = CancellationToken::new();

        let mut reassembler = Reassembler::new().with_policy(config.completion_policy());
        if let Some(timeout) = config.reassembly_timeout() {
            reassembler = reassembler.with_timeout(timeout);
        }

        let worker = DispatchWorker::new(rx, Arc::clone(&listeners), shutdown.clone());
        (
            Self {
                reassembler,
                listeners,
                tx,
                config,
                shutdown,
            },
            worker,
        )
    }

    /// Register a listener for completed messages.
    pub fn add_listener(&self, listener: impl MessageListener + 'static) -> ListenerId {
        self.listeners.add(Arc::new(listener))
    }

    /// Unregister a listener. Returns `false` if it was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool { self.listeners.remove(id) }

    /// Borrow the listener registry.
    #[must_use]
    pub fn listeners(&self) -> &Arc<ListenerRegistry> { &self.listeners }

    /// Borrow the reassembler, for diagnostics such as pending chunk counts.
    #[must_use]
    pub fn reassembler(&self) -> &Reassembler { &self.reassembler }

    /// Token that stops the worker when cancelled.
    #[must_use]
    pub fn shutdown_token(&self) -> CancellationToken { self.shutdown.clone() }

    /// Stop the worker once queued messages are delivered.
    pub fn shutdown(&self) { self.shutdown.cancel(); }

    /// Process one packet from the transport.
    ///
    /// Every error is logged here; callers may ignore the result.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownPayloadType`] for unrecognised ports,
    /// [`DispatchError::Chunk`] for malformed chunks,
    /// [`DispatchError::Reassembly`] when a message is discarded, and
    /// [`DispatchError::QueueFull`] / [`DispatchError::Closed`] when the
    /// completed message cannot be queued.
    pub fn handle_packet(&self, packet: MeshPacket) -> Result<Ingest, DispatchError> {
        let MeshPacket {
            sender_id,
            payload_type,
            payload_id,
            bytes,
        } = packet;

        match payload_type {
            PayloadType::Opaque => {}
            PayloadType::NodeInfo | PayloadType::Position => {
                trace!(?payload_type, sender = %sender_id, "ignoring radio payload");
                return Ok(Ingest::Ignored);
            }
            PayloadType::Other(port) => {
                error!(
                    port,
                    payload_id = %payload_id,
                    sender = %sender_id,
                    len = bytes.len(),
                    "unknown payload type: {port}"
                );
                metrics::inc_dropped(DropReason::UnknownPayloadType);
                return Err(DispatchError::UnknownPayloadType(port));
            }
        }

        if self
            .config
            .discovery_marker()
            .is_some_and(|marker| bytes.starts_with(marker))
        {
            debug!(sender = %sender_id, "dropping discovery broadcast");
            metrics::inc_dropped(DropReason::Discovery);
            return Ok(Ingest::Discovery);
        }

        let chunk = Chunk::parse(bytes).map_err(|err| {
            warn!(sender = %sender_id, payload_id = %payload_id, "dropping packet: {err}");
            metrics::inc_dropped(DropReason::Malformed);
            DispatchError::from(err)
        })?;

        let Some(message) = self.reassembler.ingest(&sender_id, payload_id, chunk)? else {
            return Ok(Ingest::Pending);
        };

        let message_id = message.message_id();
        match self.tx.try_send(message) {
            Ok(()) => Ok(Ingest::Queued(message_id)),
            Err(TrySendError::Full(message)) => {
                warn!(
                    sender = %message.sender_id(),
                    message_id = %message_id,
                    "dispatch queue full; dropping message"
                );
                metrics::inc_dropped(DropReason::QueueFull);
                Err(DispatchError::QueueFull)
            }
            Err(TrySendError::Closed(message)) => {
                warn!(
                    sender = %message.sender_id(),
                    message_id = %message_id,
                    "dispatch worker stopped; dropping message"
                );
                Err(DispatchError::Closed)
            }
        }
    }
}
