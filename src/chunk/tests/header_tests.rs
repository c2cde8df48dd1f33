//! Tests for header packing, the sixteen-chunk wraparound, and packet parsing.

use bytes::Bytes;
use rstest::rstest;

use crate::chunk::{
    Chunk,
    ChunkError,
    ChunkHeader,
    decode_header,
    encode_header,
    split_payload,
};

#[rstest]
#[case(0, 1, 0x01)]
#[case(0, 3, 0x03)]
#[case(2, 3, 0x23)]
#[case(14, 15, 0xef)]
fn encode_header_packs_index_high_and_count_low(
    #[case] index: u8,
    #[case] count: u8,
    #[case] expected: u8,
) {
    assert_eq!(encode_header(index, count), Ok(expected));
}

#[rstest]
#[case(0, 0)]
#[case(1, 1)]
#[case(3, 2)]
#[case(0, 17)]
fn encode_header_rejects_invalid_positions(#[case] index: u8, #[case] count: u8) {
    assert_eq!(
        encode_header(index, count),
        Err(ChunkError::InvalidHeader { index, count })
    );
}

#[test]
fn decode_header_returns_raw_nibbles() {
    assert_eq!(decode_header(0x23), (2, 3));
    assert_eq!(decode_header(0xf0), (15, 0));
    assert_eq!(decode_header(0x00), (0, 0));
}

#[test]
fn sixteen_chunk_count_wraps_to_zero_nibble() {
    let first = encode_header(0, 16).expect("count of sixteen is valid");
    let last = encode_header(15, 16).expect("count of sixteen is valid");
    assert_eq!(first, 0x00);
    assert_eq!(last, 0xf0);
    assert_eq!(decode_header(first).1, 0);
}

#[test]
fn zero_count_nibble_is_read_as_sixteen() {
    let header = ChunkHeader::from_byte(0xf0).expect("wrapped header is valid");
    assert_eq!(header.index(), 15);
    assert_eq!(header.count(), 16);
    assert!(header.is_last());

    let first = ChunkHeader::from_byte(0x00).expect("wrapped header is valid");
    assert_eq!(first.count(), 16);
    assert!(!first.is_last());
}

#[test]
fn header_byte_with_index_past_count_is_invalid() {
    assert_eq!(
        ChunkHeader::from_byte(0x32),
        Err(ChunkError::InvalidHeader { index: 3, count: 2 })
    );
}

#[test]
fn split_payload_separates_header_from_body() {
    assert_eq!(split_payload(&[0x12, 7, 8]), Ok((0x12, &[7_u8, 8][..])));
    assert_eq!(split_payload(&[0x01]), Ok((0x01, &[][..])));
    assert_eq!(split_payload(&[]), Err(ChunkError::MissingHeader));
}

#[test]
fn parse_rejects_empty_packet() {
    assert_eq!(Chunk::parse(Bytes::new()), Err(ChunkError::MissingHeader));
}

#[test]
fn parse_rejects_header_only_chunk_of_multi_chunk_message() {
    assert_eq!(
        Chunk::parse(Bytes::from_static(&[0x13])),
        Err(ChunkError::EmptyPayload { index: 1, count: 3 })
    );
}

#[test]
fn parse_accepts_header_only_single_chunk() {
    let chunk = Chunk::parse(Bytes::from_static(&[0x01])).expect("empty message chunk");
    assert!(chunk.is_last());
    assert!(chunk.payload().is_empty());
}

#[test]
fn wire_encoding_round_trips_through_parse() {
    let header = ChunkHeader::new(4, 16).expect("valid header");
    let chunk = Chunk::new(header, Bytes::from_static(b"payload"));
    let wire = chunk.to_wire();

    assert_eq!(wire.first(), Some(&0x40));
    assert_eq!(Chunk::parse(wire), Ok(chunk));
}
