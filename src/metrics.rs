//! Metric helpers for `meshframe`.
//!
//! This module defines metric names and helper functions wrapping the
//! [`metrics`](https://docs.rs/metrics) crate. Without the `metrics` feature
//! the helpers compile to no-ops.

#[cfg(feature = "metrics")]
use metrics::counter;

/// Name of the counter tracking chunks sent and received.
pub const CHUNKS_PROCESSED: &str = "meshframe_chunks_processed_total";
/// Name of the counter tracking successfully reassembled messages.
pub const MESSAGES_REASSEMBLED: &str = "meshframe_messages_reassembled_total";
/// Name of the counter tracking discarded in-flight messages.
pub const REASSEMBLY_FAILURES: &str = "meshframe_reassembly_failures_total";
/// Name of the counter tracking inbound packets dropped before reassembly.
pub const PACKETS_DROPPED: &str = "meshframe_packets_dropped_total";
/// Name of the counter tracking panics raised by message listeners.
pub const LISTENER_PANICS: &str = "meshframe_listener_panics_total";

/// Direction of chunk processing.
#[derive(Clone, Copy, Debug)]
pub enum Direction {
    /// Chunks received from the mesh.
    Inbound,
    /// Chunks handed to the mesh.
    Outbound,
}

impl Direction {
    #[cfg_attr(not(feature = "metrics"), allow(dead_code))]
    fn as_str(self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        }
    }
}

/// Why an in-flight message was discarded.
#[derive(Clone, Copy, Debug)]
pub enum FailureReason {
    /// The final chunk arrived with an earlier slot empty.
    MissingChunk,
    /// The partial message outlived the reassembly deadline.
    Expired,
}

impl FailureReason {
    #[cfg_attr(not(feature = "metrics"), allow(dead_code))]
    fn as_str(self) -> &'static str {
        match self {
            FailureReason::MissingChunk => "missing_chunk",
            FailureReason::Expired => "expired",
        }
    }
}

/// Why an inbound packet never reached reassembly.
#[derive(Clone, Copy, Debug)]
pub enum DropReason {
    /// The packet was not a valid chunk.
    Malformed,
    /// The packet's payload type was not recognised.
    UnknownPayloadType,
    /// The packet carried the discovery broadcast marker.
    Discovery,
    /// The completed message could not be queued for listeners.
    QueueFull,
}

impl DropReason {
    #[cfg_attr(not(feature = "metrics"), allow(dead_code))]
    fn as_str(self) -> &'static str {
        match self {
            DropReason::Malformed => "malformed",
            DropReason::UnknownPayloadType => "unknown_payload_type",
            DropReason::Discovery => "discovery",
            DropReason::QueueFull => "queue_full",
        }
    }
}

/// Record a processed chunk for the given direction.
pub fn inc_chunks(direction: Direction) {
    #[cfg(feature = "metrics")]
    counter!(CHUNKS_PROCESSED, "direction" => direction.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = direction;
}

/// Record a successfully reassembled message.
pub fn inc_reassembled() {
    #[cfg(feature = "metrics")]
    counter!(MESSAGES_REASSEMBLED).increment(1);
}

/// Record a discarded in-flight message.
pub fn inc_reassembly_failures(reason: FailureReason) {
    #[cfg(feature = "metrics")]
    counter!(REASSEMBLY_FAILURES, "reason" => reason.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = reason;
}

/// Record an inbound packet dropped before reassembly.
pub fn inc_dropped(reason: DropReason) {
    #[cfg(feature = "metrics")]
    counter!(PACKETS_DROPPED, "reason" => reason.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = reason;
}

/// Record a panic raised by a message listener.
pub fn inc_listener_panics() {
    #[cfg(feature = "metrics")]
    counter!(LISTENER_PANICS).increment(1);
}
