//! Builders for wire chunks and replay helpers.

use bytes::Bytes;
use meshframe::{
    Chunk,
    MeshPacket,
    PayloadId,
    ReassembledMessage,
    Reassembler,
    ReassemblyError,
    SenderId,
    chunk::chunk,
};

/// Chunk `message` with `max_payload_len` payload bytes per chunk and return
/// the wire form of each chunk in index order.
///
/// # Panics
///
/// Panics if the message does not fit into sixteen chunks.
#[must_use]
pub fn wire_chunks(message: &[u8], max_payload_len: usize) -> Vec<Bytes> {
    chunk(Bytes::copy_from_slice(message), max_payload_len)
        .expect("test message must fit into sixteen chunks")
        .to_wire()
}

/// Wrap wire chunks as opaque packets from `sender`, in the given order.
///
/// Payload identifiers count up from zero in delivery order.
///
/// # Panics
///
/// Panics if `order` names an index outside `chunks`.
#[must_use]
pub fn opaque_packets(sender: &SenderId, chunks: &[Bytes], order: &[usize]) -> Vec<MeshPacket> {
    order
        .iter()
        .zip(0_u32..)
        .map(|(index, id)| {
            let bytes = chunks
                .get(*index)
                .expect("delivery order names an existing chunk")
                .clone();
            MeshPacket::opaque(sender.clone(), PayloadId::new(id), bytes)
        })
        .collect()
}

/// Outcome of replaying chunks through a [`Reassembler`].
#[derive(Debug, Default)]
pub struct Delivery {
    /// Messages completed, in completion order.
    pub messages: Vec<ReassembledMessage>,
    /// Reassembly failures, in the order they occurred.
    pub failures: Vec<ReassemblyError>,
}

/// Parse and ingest `chunks` from `sender` in `order`.
///
/// # Panics
///
/// Panics if a chunk fails to parse or `order` names a missing chunk.
pub fn deliver(
    reassembler: &Reassembler,
    sender: &SenderId,
    chunks: &[Bytes],
    order: &[usize],
) -> Delivery {
    let mut delivery = Delivery::default();
    for packet in opaque_packets(sender, chunks, order) {
        let chunk = Chunk::parse(packet.bytes).expect("wire chunk must parse");
        match reassembler.ingest(sender, packet.payload_id, chunk) {
            Ok(Some(message)) => delivery.messages.push(message),
            Ok(None) => {}
            Err(err) => delivery.failures.push(err),
        }
    }
    delivery
}
