//! The single-byte chunk header.
//!
//! Layout: `index` in bits 7..4, `count` in bits 3..0. Four bits cannot hold
//! the value 16, so a message split into exactly sixteen chunks is written
//! with a count nibble of `0`. Decoding reads a `0` nibble back as sixteen.
//! A count of zero is never produced by a sender, so the two values cannot be
//! confused on a well-formed link; peers that emit a literal zero count are
//! interpreted as sending sixteen chunks.

use super::ChunkError;

/// Number of bytes occupied by the chunk header on the wire.
pub const CHUNK_HEADER_LEN: usize = 1;

/// Largest number of chunks a single message may be split into.
pub const MAX_CHUNK_COUNT: usize = 16;

const NIBBLE: u8 = 0x0f;
const WRAPPED_COUNT: u8 = 16;

/// Pack a chunk position into a header byte.
///
/// # Errors
///
/// Returns [`ChunkError::InvalidHeader`] unless `index < count <= 16`.
///
/// # Examples
///
/// ```
/// use meshframe::chunk::encode_header;
///
/// assert_eq!(encode_header(2, 3), Ok(0x23));
/// // sixteen wraps to a zero count nibble
/// assert_eq!(encode_header(15, 16), Ok(0xf0));
/// ```
pub fn encode_header(index: u8, count: u8) -> Result<u8, ChunkError> {
    ChunkHeader::new(index, count).map(ChunkHeader::to_byte)
}

/// Unpack the raw `(index, count)` nibbles of a header byte.
///
/// No validation or wraparound policy is applied; see
/// [`ChunkHeader::from_byte`] for the interpreted form.
#[must_use]
pub const fn decode_header(byte: u8) -> (u8, u8) { ((byte >> 4) & NIBBLE, byte & NIBBLE) }

/// Split a raw packet into its header byte and the remaining payload.
///
/// # Errors
///
/// Returns [`ChunkError::MissingHeader`] when `raw` is empty.
pub fn split_payload(raw: &[u8]) -> Result<(u8, &[u8]), ChunkError> {
    raw.split_first()
        .map(|(header, rest)| (*header, rest))
        .ok_or(ChunkError::MissingHeader)
}

/// Validated chunk position: `index < count <= 16`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkHeader {
    index: u8,
    count: u8,
}

impl ChunkHeader {
    /// Create a header for chunk `index` of `count`.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidHeader`] unless `index < count <= 16`.
    pub fn new(index: u8, count: u8) -> Result<Self, ChunkError> {
        if count == 0 || usize::from(count) > MAX_CHUNK_COUNT || index >= count {
            return Err(ChunkError::InvalidHeader { index, count });
        }
        Ok(Self { index, count })
    }

    /// Interpret a header byte, reading a zero count nibble as sixteen.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidHeader`] when the index nibble is not
    /// below the interpreted count.
    pub fn from_byte(byte: u8) -> Result<Self, ChunkError> {
        let (index, count) = decode_header(byte);
        let count = if count == 0 {
            // 16 does not fit the nibble and is written as zero.
            WRAPPED_COUNT
        } else {
            count
        };
        Self::new(index, count)
    }

    /// Encode the header byte, writing a count of sixteen as a zero nibble.
    #[must_use]
    pub const fn to_byte(self) -> u8 { (self.index << 4) | (self.count & NIBBLE) }

    /// Zero-based chunk index.
    #[must_use]
    pub const fn index(self) -> u8 { self.index }

    /// Total chunk count of the message.
    #[must_use]
    pub const fn count(self) -> u8 { self.count }

    /// Whether this header marks the final chunk of its message.
    #[must_use]
    pub const fn is_last(self) -> bool { self.index + 1 == self.count }
}
