//! Typed application payloads carried over the chunked link.
//!
//! The mesh link moves opaque bytes. Applications that want structured
//! messages derive [`Encode`] and [`BorrowDecode`] and get [`Message`] for
//! free; [`Chunker::chunk_message`](crate::chunk::Chunker::chunk_message) and
//! [`ReassembledMessage::decode`](crate::reassembly::ReassembledMessage::decode)
//! then handle the bincode conversion on either end.

use bincode::{
    BorrowDecode,
    Encode,
    borrow_decode_from_slice,
    config,
    encode_to_vec,
    error::{DecodeError, EncodeError},
};

/// Application message that can cross the link as bincode bytes.
pub trait Message: Encode + for<'de> BorrowDecode<'de, ()> {
    /// Serialise the message with bincode's standard configuration.
    ///
    /// # Errors
    ///
    /// Returns an [`EncodeError`] if serialisation fails.
    fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> { encode_to_vec(self, config::standard()) }

    /// Deserialise a message, returning it with the number of bytes consumed.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the bytes do not describe a message.
    fn from_bytes(bytes: &[u8]) -> Result<(Self, usize), DecodeError>
    where
        Self: Sized,
    {
        borrow_decode_from_slice(bytes, config::standard())
    }
}

impl<T> Message for T where for<'de> T: Encode + BorrowDecode<'de, ()> {}
