//! Sending side: chunk a message and hand every chunk to the radio.

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

use crate::{
    chunk::{Chunker, ChunkingConfig, ChunkingError},
    message::Message,
    metrics::{self, Direction},
};

/// Destination for encoded chunks, typically the radio driver.
pub trait PacketSink {
    /// Error raised when the sink refuses a chunk.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Transmit one chunk in wire form.
    ///
    /// # Errors
    ///
    /// Returns the sink's error if the chunk could not be queued.
    fn send_chunk(&mut self, chunk: Bytes) -> Result<(), Self::Error>;
}

impl PacketSink for Vec<Bytes> {
    type Error = std::convert::Infallible;

    fn send_chunk(&mut self, chunk: Bytes) -> Result<(), Self::Error> {
        self.push(chunk);
        Ok(())
    }
}

/// Errors raised while sending a message.
#[derive(Debug, Error)]
pub enum OutboundError<E: std::error::Error + 'static> {
    /// The message could not be chunked; nothing was transmitted.
    #[error(transparent)]
    Chunking(#[from] ChunkingError),
    /// The sink refused a chunk after `sent` chunks were handed over.
    #[error("packet sink failed after {sent} chunks: {source}")]
    Sink {
        sent: usize,
        #[source]
        source: E,
    },
}

/// Chunks outbound messages and forwards them to a [`PacketSink`].
#[derive(Debug)]
pub struct Outbound<S> {
    chunker: Chunker,
    sink: S,
}

impl<S: PacketSink> Outbound<S> {
    /// Create a sender using the chunk budget from `config`.
    #[must_use]
    pub fn new(config: &ChunkingConfig, sink: S) -> Self {
        Self {
            chunker: Chunker::from_config(config),
            sink,
        }
    }

    /// Borrow the underlying sink.
    #[must_use]
    pub fn sink(&self) -> &S { &self.sink }

    /// Consume the sender, returning the sink.
    #[must_use]
    pub fn into_sink(self) -> S { self.sink }

    /// Chunk `message` and transmit every chunk in index order.
    ///
    /// The message is fully chunked before the first chunk is handed over, so
    /// an oversized message transmits nothing. Returns the number of chunks
    /// sent.
    ///
    /// # Errors
    ///
    /// Returns [`OutboundError::Chunking`] if the message does not fit and
    /// [`OutboundError::Sink`] if the sink refuses a chunk.
    pub fn send(&mut self, message: impl Into<Bytes>) -> Result<usize, OutboundError<S::Error>> {
        let batch = self.chunker.chunk(message)?;
        let count = batch.len();
        for (sent, wire) in batch.to_wire().into_iter().enumerate() {
            debug!("---> chunk {}/{count}", sent + 1);
            self.sink
                .send_chunk(wire)
                .map_err(|source| OutboundError::Sink { sent, source })?;
            metrics::inc_chunks(Direction::Outbound);
        }
        Ok(count)
    }

    /// Serialise a typed message and transmit it.
    ///
    /// # Errors
    ///
    /// As [`Outbound::send`], plus [`ChunkingError::Encode`] when
    /// serialisation fails.
    pub fn send_message<M: Message>(
        &mut self,
        message: &M,
    ) -> Result<usize, OutboundError<S::Error>> {
        let bytes = message.to_bytes().map_err(ChunkingError::from)?;
        self.send(bytes)
    }
}
