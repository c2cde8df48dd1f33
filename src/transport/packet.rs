//! Inbound packet representation and payload classification.

use bytes::Bytes;

use crate::reassembly::{PayloadId, SenderId};

/// Application port numbers assigned by the mesh firmware.
pub mod port {
    /// Unclassified application bytes. Chunked messages travel here.
    pub const UNKNOWN_APP: u32 = 0;
    /// Plain text chat.
    pub const TEXT_MESSAGE_APP: u32 = 1;
    /// Position reports generated by the radio.
    pub const POSITION_APP: u32 = 3;
    /// Node information broadcasts.
    pub const NODEINFO_APP: u32 = 4;
}

/// Classification of an inbound payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PayloadType {
    /// Opaque application data; candidates for reassembly.
    Opaque,
    /// Node information generated by the radio.
    NodeInfo,
    /// Position report generated by the radio.
    Position,
    /// Any other port number.
    Other(u32),
}

impl PayloadType {
    /// Classify a raw port number.
    #[must_use]
    pub const fn from_port(port: u32) -> Self {
        match port {
            port::UNKNOWN_APP => Self::Opaque,
            port::NODEINFO_APP => Self::NodeInfo,
            port::POSITION_APP => Self::Position,
            other => Self::Other(other),
        }
    }

    /// Return the port number this classification corresponds to.
    #[must_use]
    pub const fn port(self) -> u32 {
        match self {
            Self::Opaque => port::UNKNOWN_APP,
            Self::NodeInfo => port::NODEINFO_APP,
            Self::Position => port::POSITION_APP,
            Self::Other(other) => other,
        }
    }
}

impl From<u32> for PayloadType {
    fn from(port: u32) -> Self { Self::from_port(port) }
}

/// A packet received from the mesh.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MeshPacket {
    /// Node that sent the packet.
    pub sender_id: SenderId,
    /// Classification of the payload.
    pub payload_type: PayloadType,
    /// Transport-assigned packet identifier.
    pub payload_id: PayloadId,
    /// Raw payload bytes.
    pub bytes: Bytes,
}

impl MeshPacket {
    /// Build an opaque application packet, the kind that carries chunks.
    #[must_use]
    pub fn opaque(sender_id: SenderId, payload_id: PayloadId, bytes: impl Into<Bytes>) -> Self {
        Self {
            sender_id,
            payload_type: PayloadType::Opaque,
            payload_id,
            bytes: bytes.into(),
        }
    }
}
