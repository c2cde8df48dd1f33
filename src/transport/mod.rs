//! Boundary types shared with the mesh radio transport.
//!
//! The radio driver itself lives outside this crate. Inbound, it hands over
//! [`MeshPacket`]s; outbound, it accepts raw chunk bytes through a
//! [`PacketSink`].

pub mod outbound;
pub mod packet;

pub use outbound::{Outbound, OutboundError, PacketSink};
pub use packet::{MeshPacket, PayloadType, port};
