#![cfg(feature = "metrics")]
//! Tests for `meshframe` metrics helpers.
//!
//! These tests verify that counters update as expected using
//! `metrics_util::debugging::DebuggingRecorder`.

use meshframe::{
    DispatchConfig,
    Dispatcher,
    Reassembler,
    SenderId,
    metrics::{CHUNKS_PROCESSED, MESSAGES_REASSEMBLED, PACKETS_DROPPED, REASSEMBLY_FAILURES},
};
use meshframe_testing::{deliver, opaque_packets, wire_chunks};
use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};

/// Creates a debugging recorder and snapshotter for metrics testing.
fn debugging_recorder_setup() -> (Snapshotter, DebuggingRecorder) {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    (snapshotter, recorder)
}

fn counter_value(snapshotter: &Snapshotter, name: &str, label: Option<(&str, &str)>) -> u64 {
    snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .filter(|(k, _, _, _)| {
            k.key().name() == name
                && label.is_none_or(|(key, value)| {
                    k.key()
                        .labels()
                        .any(|l| l.key() == key && l.value() == value)
                })
        })
        .map(|(_, _, _, v)| match v {
            DebugValue::Counter(c) => c,
            _ => 0,
        })
        .sum()
}

#[test]
fn reassembly_records_chunks_and_messages() {
    let (snapshotter, recorder) = debugging_recorder_setup();
    metrics::with_local_recorder(&recorder, || {
        let chunks = wire_chunks(b"abcdefghi", 3);
        deliver(&Reassembler::new(), &SenderId::from("!a"), &chunks, &[0, 1, 2]);
    });

    assert_eq!(
        counter_value(&snapshotter, CHUNKS_PROCESSED, Some(("direction", "inbound"))),
        3
    );
    assert_eq!(counter_value(&snapshotter, MESSAGES_REASSEMBLED, None), 1);
}

#[test]
fn missing_chunk_records_failure() {
    let (snapshotter, recorder) = debugging_recorder_setup();
    metrics::with_local_recorder(&recorder, || {
        let chunks = wire_chunks(b"abcdefghi", 3);
        deliver(&Reassembler::new(), &SenderId::from("!a"), &chunks, &[0, 2]);
    });

    assert_eq!(
        counter_value(
            &snapshotter,
            REASSEMBLY_FAILURES,
            Some(("reason", "missing_chunk"))
        ),
        1
    );
    assert_eq!(counter_value(&snapshotter, MESSAGES_REASSEMBLED, None), 0);
}

#[test]
fn discovery_broadcast_records_drop() {
    let (snapshotter, recorder) = debugging_recorder_setup();
    metrics::with_local_recorder(&recorder, || {
        let (dispatcher, _worker) = Dispatcher::new(DispatchConfig::default());
        let beacon = vec![bytes::Bytes::from_static(b"ATAK_FORWARDER_DISCOVERY")];
        for packet in opaque_packets(&SenderId::from("!a"), &beacon, &[0]) {
            let _ = dispatcher.handle_packet(packet);
        }
    });

    assert_eq!(
        counter_value(&snapshotter, PACKETS_DROPPED, Some(("reason", "discovery"))),
        1
    );
}
