//! Integration coverage for `meshframe_testing` replay helpers.

use meshframe::{PayloadType, Reassembler, SenderId};
use meshframe_testing::{deliver, opaque_packets, wire_chunks};

#[test]
fn wire_chunks_carry_header_bytes() {
    let chunks = wire_chunks(b"abcdefg", 3);
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].as_ref(), &[0x03, b'a', b'b', b'c']);
    assert_eq!(chunks[2].as_ref(), &[0x23, b'g']);
}

#[test]
fn opaque_packets_follow_delivery_order() {
    let sender = SenderId::from("!a");
    let chunks = wire_chunks(b"abcdefg", 3);
    let packets = opaque_packets(&sender, &chunks, &[2, 0]);

    assert_eq!(packets.len(), 2);
    assert!(packets.iter().all(|p| p.payload_type == PayloadType::Opaque));
    assert_eq!(packets[0].bytes, chunks[2]);
    assert_eq!(packets[1].payload_id.get(), 1);
}

#[test]
fn deliver_collects_messages_and_failures() {
    let sender = SenderId::from("!a");
    let chunks = wire_chunks(b"abcdefg", 3);
    let reassembler = Reassembler::new();

    let lossy = deliver(&reassembler, &sender, &chunks, &[0, 2]);
    assert!(lossy.messages.is_empty());
    assert_eq!(lossy.failures.len(), 1);

    let clean = deliver(&reassembler, &sender, &chunks, &[1, 0, 2]);
    assert_eq!(clean.messages.len(), 1);
    assert_eq!(clean.messages[0].bytes().as_ref(), b"abcdefg");
}
