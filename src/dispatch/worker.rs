//! The single task that notifies listeners.

use std::{panic::AssertUnwindSafe, sync::Arc};

use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use super::{ListenerPanic, ListenerRegistry};
use crate::{metrics, reassembly::ReassembledMessage};

/// Drains completed messages and hands each to every registered listener.
///
/// Messages are delivered in the order they completed. The worker stops when
/// its shutdown token is cancelled or every [`Dispatcher`](super::Dispatcher)
/// is dropped; messages already queued are still delivered before it exits.
#[derive(Debug)]
pub struct DispatchWorker {
    rx: mpsc::Receiver<ReassembledMessage>,
    listeners: Arc<ListenerRegistry>,
    shutdown: CancellationToken,
}

impl DispatchWorker {
    pub(crate) fn new(
        rx: mpsc::Receiver<ReassembledMessage>,
        listeners: Arc<ListenerRegistry>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            rx,
            listeners,
            shutdown,
        }
    }

    /// Spawn the worker onto the current Tokio runtime.
    ///
    /// The task resolves to the number of messages delivered.
    #[must_use]
    pub fn spawn(self) -> JoinHandle<usize> { tokio::spawn(self.run()) }

    /// Run the delivery loop until shutdown, returning the number of messages
    /// delivered.
    pub async fn run(mut self) -> usize {
        let mut delivered = 0usize;
        loop {
            tokio::select! {
                biased;

                () = self.shutdown.cancelled() => break,
                next = self.rx.recv() => match next {
                    Some(message) => {
                        self.notify(&message);
                        delivered += 1;
                    }
                    None => break,
                },
            }
        }

        self.rx.close();
        while let Ok(message) = self.rx.try_recv() {
            self.notify(&message);
            delivered += 1;
        }
        debug!(delivered, "dispatch worker stopped");
        delivered
    }

    fn notify(&self, message: &ReassembledMessage) {
        for (id, listener) in self.listeners.snapshot() {
            let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| {
                listener.on_message_received(message.message_id(), message.bytes());
            }));
            if let Err(payload) = outcome {
                metrics::inc_listener_panics();
                let panic = ListenerPanic::new(id, message, payload);
                error!(
                    listener = %panic.listener(),
                    message_id = %panic.message_id(),
                    sender = %panic.sender(),
                    "{panic}"
                );
            }
        }
    }
}
