//! Unit tests for packet filtering, listener registration, and delivery.

use std::sync::{
    Arc,
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use bytes::Bytes;
use rstest::{fixture, rstest};
use tracing_test::traced_test;

use super::{
    DispatchConfig,
    DispatchConfigError,
    DispatchError,
    DispatchWorker,
    Dispatcher,
    Ingest,
};
use crate::{
    chunk::ChunkError,
    reassembly::{CompletionPolicy, MESSAGE_AWAIT_TIMEOUT, PayloadId, SenderId},
    transport::{MeshPacket, PayloadType, port},
};

#[fixture]
fn dispatcher() -> (Dispatcher, DispatchWorker) {
    Dispatcher::new(DispatchConfig::default())
}

fn packet(payload_type: PayloadType, bytes: &'static [u8]) -> MeshPacket {
    MeshPacket {
        sender_id: SenderId::from("!node"),
        payload_type,
        payload_id: PayloadId::new(7),
        bytes: Bytes::from_static(bytes),
    }
}

#[rstest]
#[case(PayloadType::NodeInfo)]
#[case(PayloadType::Position)]
fn radio_payloads_are_ignored(
    dispatcher: (Dispatcher, DispatchWorker),
    #[case] payload_type: PayloadType,
) {
    let (dispatcher, _worker) = dispatcher;
    assert_eq!(
        dispatcher.handle_packet(packet(payload_type, &[0x01, 1, 2])),
        Ok(Ingest::Ignored)
    );
    assert_eq!(dispatcher.reassembler().buffered_len(), 0);
}

#[test]
#[traced_test]
fn unknown_payload_type_is_logged_and_dropped() {
    let (dispatcher, _worker) = Dispatcher::new(DispatchConfig::default());
    let result = dispatcher.handle_packet(packet(PayloadType::from_port(67), &[0x01, 1]));

    assert_eq!(result, Err(DispatchError::UnknownPayloadType(67)));
    assert!(logs_contain("unknown payload type: 67"));
}

#[rstest]
fn discovery_broadcast_never_reaches_reassembly(dispatcher: (Dispatcher, DispatchWorker)) {
    let (dispatcher, _worker) = dispatcher;
    let result =
        dispatcher.handle_packet(packet(PayloadType::Opaque, b"ATAK_FORWARDER_DISCOVERY:!node"));

    assert_eq!(result, Ok(Ingest::Discovery));
    assert_eq!(dispatcher.reassembler().buffered_len(), 0);
}

#[test]
fn discovery_check_can_be_disabled() {
    let config = DispatchConfig::builder()
        .discovery_marker(None)
        .build()
        .expect("valid config");
    let (dispatcher, _worker) = Dispatcher::new(config);

    // 'A' = 0x41 decodes as chunk 4 of 1, which is not a valid position
    let result =
        dispatcher.handle_packet(packet(PayloadType::Opaque, b"ATAK_FORWARDER_DISCOVERY"));
    assert_eq!(
        result,
        Err(DispatchError::Chunk(ChunkError::InvalidHeader { index: 4, count: 1 }))
    );
}

#[test]
#[traced_test]
fn malformed_chunk_is_dropped() {
    let (dispatcher, _worker) = Dispatcher::new(DispatchConfig::default());
    let result = dispatcher.handle_packet(packet(PayloadType::Opaque, &[]));

    assert_eq!(result, Err(DispatchError::Chunk(ChunkError::MissingHeader)));
    assert!(logs_contain("header byte absent"));
}

#[rstest]
fn completed_message_is_queued(dispatcher: (Dispatcher, DispatchWorker)) {
    let (dispatcher, _worker) = dispatcher;
    assert_eq!(
        dispatcher.handle_packet(packet(PayloadType::Opaque, &[0x02, b'h'])),
        Ok(Ingest::Pending)
    );
    assert_eq!(
        dispatcher.handle_packet(packet(PayloadType::Opaque, &[0x12, b'i'])),
        Ok(Ingest::Queued(PayloadId::new(7)))
    );
}

#[test]
fn full_queue_drops_message() {
    let config = DispatchConfig::builder()
        .queue_capacity(1)
        .build()
        .expect("valid config");
    let (dispatcher, _worker) = Dispatcher::new(config);

    assert!(matches!(
        dispatcher.handle_packet(packet(PayloadType::Opaque, &[0x01, b'a'])),
        Ok(Ingest::Queued(_))
    ));
    assert_eq!(
        dispatcher.handle_packet(packet(PayloadType::Opaque, &[0x01, b'b'])),
        Err(DispatchError::QueueFull)
    );
}

#[test]
fn stopped_worker_closes_queue() {
    let (dispatcher, worker) = Dispatcher::new(DispatchConfig::default());
    drop(worker);

    assert_eq!(
        dispatcher.handle_packet(packet(PayloadType::Opaque, &[0x01, b'a'])),
        Err(DispatchError::Closed)
    );
}

#[test]
fn zero_queue_capacity_is_rejected() {
    let err = DispatchConfig::builder()
        .queue_capacity(0)
        .build()
        .expect_err("zero capacity must be rejected");
    assert_eq!(err, DispatchConfigError::InvalidCapacity(0));
}

#[test]
fn builder_settings_reach_the_reassembler() {
    let config = DispatchConfig::builder()
        .completion_policy(CompletionPolicy::AllSlots)
        .reassembly_timeout(Some(MESSAGE_AWAIT_TIMEOUT))
        .build()
        .expect("valid config");
    assert_eq!(config.completion_policy(), CompletionPolicy::AllSlots);
    assert_eq!(config.reassembly_timeout(), Some(MESSAGE_AWAIT_TIMEOUT));

    let (dispatcher, _worker) = Dispatcher::new(config);
    assert_eq!(dispatcher.reassembler().policy(), CompletionPolicy::AllSlots);
    assert_eq!(dispatcher.reassembler().timeout(), Some(MESSAGE_AWAIT_TIMEOUT));
    assert_eq!(
        DispatchConfig::default().completion_policy(),
        CompletionPolicy::LastIndex
    );
}

#[test]
fn port_numbers_classify_payloads() {
    assert_eq!(PayloadType::from_port(port::UNKNOWN_APP), PayloadType::Opaque);
    assert_eq!(PayloadType::from_port(port::NODEINFO_APP), PayloadType::NodeInfo);
    assert_eq!(PayloadType::from_port(port::POSITION_APP), PayloadType::Position);
    assert_eq!(
        PayloadType::from_port(port::TEXT_MESSAGE_APP),
        PayloadType::Other(port::TEXT_MESSAGE_APP)
    );
    assert_eq!(PayloadType::Other(67).port(), 67);
}

#[rstest]
fn listeners_can_be_added_and_removed(dispatcher: (Dispatcher, DispatchWorker)) {
    let (dispatcher, _worker) = dispatcher;
    let first = dispatcher.add_listener(|_: PayloadId, _: &Bytes| {});
    let second = dispatcher.add_listener(|_: PayloadId, _: &Bytes| {});

    assert_ne!(first, second);
    assert_eq!(dispatcher.listeners().len(), 2);
    assert!(dispatcher.remove_listener(first));
    assert!(!dispatcher.remove_listener(first));
    assert_eq!(dispatcher.listeners().len(), 1);
}

#[tokio::test]
async fn worker_delivers_to_every_listener_and_drains_on_shutdown() {
    let (dispatcher, worker) = Dispatcher::new(DispatchConfig::default());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let calls = Arc::new(AtomicUsize::new(0));

    let sink = Arc::clone(&seen);
    dispatcher.add_listener(move |id: PayloadId, bytes: &Bytes| {
        sink.lock().expect("lock").push((id, bytes.clone()));
    });
    let counter = Arc::clone(&calls);
    dispatcher.add_listener(move |_: PayloadId, _: &Bytes| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    dispatcher
        .handle_packet(packet(PayloadType::Opaque, &[0x01, b'x']))
        .expect("queued");
    dispatcher
        .handle_packet(packet(PayloadType::Opaque, &[0x01, b'y']))
        .expect("queued");

    dispatcher.shutdown();
    let delivered = worker.spawn().await.expect("worker task");

    assert_eq!(delivered, 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    let seen = seen.lock().expect("lock");
    assert_eq!(
        seen.iter().map(|(_, b)| b.as_ref()).collect::<Vec<_>>(),
        vec![b"x".as_ref(), b"y".as_ref()]
    );
}

fn exploding_listener(_: PayloadId, _: &Bytes) { panic!("listener failure") }

#[tokio::test]
#[traced_test]
async fn panicking_listener_does_not_stop_delivery() {
    let (dispatcher, worker) = Dispatcher::new(DispatchConfig::default());
    let calls = Arc::new(AtomicUsize::new(0));

    dispatcher.add_listener(exploding_listener);
    let counter = Arc::clone(&calls);
    dispatcher.add_listener(move |_: PayloadId, _: &Bytes| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    dispatcher
        .handle_packet(packet(PayloadType::Opaque, &[0x01, b'x']))
        .expect("queued");
    drop(dispatcher);

    let delivered = worker.spawn().await.expect("worker task");
    assert_eq!(delivered, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(logs_contain(
        "listener 0 panicked on message 7 from !node: listener failure"
    ));
}
