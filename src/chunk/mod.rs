//! Chunk codec and outbound chunking for packet-limited mesh links.
//!
//! A mesh radio packet carries at most a couple of hundred bytes, so larger
//! application messages travel as a short run of chunks. Every chunk is
//! prefixed with a single header byte: the chunk index in the high nibble and
//! the total chunk count in the low nibble. This module owns that wire
//! format and the splitter that produces it; the inverse lives in
//! [`crate::reassembly`].

pub mod chunker;
pub mod config;
pub mod error;
pub mod header;

use bytes::{BufMut, Bytes, BytesMut};

pub use chunker::{ChunkBatch, Chunker, chunk};
pub use config::{ChunkingConfig, DEFAULT_MAX_CHUNK_LENGTH};
pub use error::{ChunkError, ChunkingError};
pub use header::{
    CHUNK_HEADER_LEN,
    ChunkHeader,
    MAX_CHUNK_COUNT,
    decode_header,
    encode_header,
    split_payload,
};

/// A single positioned fragment of an application message.
///
/// Chunks are immutable once constructed. The payload is reference counted so
/// slicing a message into chunks and parsing chunks out of received packets
/// never copies the body bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    header: ChunkHeader,
    payload: Bytes,
}

impl Chunk {
    /// Construct a chunk from an already validated header.
    #[must_use]
    pub fn new(header: ChunkHeader, payload: impl Into<Bytes>) -> Self {
        Self {
            header,
            payload: payload.into(),
        }
    }

    /// Parse a raw transport payload into a chunk.
    ///
    /// The first byte is decoded as a [`ChunkHeader`]; the remainder becomes
    /// the payload without copying.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::MissingHeader`] for an empty packet,
    /// [`ChunkError::InvalidHeader`] when the decoded index does not fit the
    /// decoded count, and [`ChunkError::EmptyPayload`] when a header arrives
    /// without body bytes (except for the single chunk of an empty message).
    ///
    /// # Examples
    ///
    /// ```
    /// use bytes::Bytes;
    /// use meshframe::chunk::Chunk;
    ///
    /// let chunk = Chunk::parse(Bytes::from_static(&[0x12, b'h', b'i'])).expect("valid chunk");
    /// assert_eq!(chunk.index(), 1);
    /// assert_eq!(chunk.count(), 2);
    /// assert_eq!(chunk.payload().as_ref(), b"hi");
    /// ```
    pub fn parse(raw: Bytes) -> Result<Self, ChunkError> {
        let (byte, _) = split_payload(&raw)?;
        let header = ChunkHeader::from_byte(byte)?;
        let payload = raw.slice(CHUNK_HEADER_LEN..);
        if payload.is_empty() && header.count() > 1 {
            return Err(ChunkError::EmptyPayload {
                index: header.index(),
                count: header.count(),
            });
        }
        Ok(Self { header, payload })
    }

    /// Return the chunk header.
    #[must_use]
    pub const fn header(&self) -> ChunkHeader { self.header }

    /// Zero-based position of this chunk within its message.
    #[must_use]
    pub const fn index(&self) -> u8 { self.header.index() }

    /// Total number of chunks in the message this chunk belongs to.
    #[must_use]
    pub const fn count(&self) -> u8 { self.header.count() }

    /// Whether this chunk carries the final index of its message.
    #[must_use]
    pub const fn is_last(&self) -> bool { self.header.is_last() }

    /// Borrow the payload bytes.
    #[must_use]
    pub fn payload(&self) -> &Bytes { &self.payload }

    /// Consume the chunk, returning its header and payload.
    #[must_use]
    pub fn into_parts(self) -> (ChunkHeader, Bytes) { (self.header, self.payload) }

    /// Encode the chunk as it travels on the wire: `{header byte}{payload}`.
    #[must_use]
    pub fn to_wire(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(CHUNK_HEADER_LEN + self.payload.len());
        buf.put_u8(self.header.to_byte());
        buf.extend_from_slice(&self.payload);
        buf.freeze()
    }
}

#[cfg(test)]
mod tests;
