#![doc(html_root_url = "https://docs.rs/meshframe/latest")]
//! Public API for the `meshframe` library.
//!
//! This crate carries arbitrary-length application messages over mesh radio
//! links that only deliver small, unordered, lossy packets. Messages are cut
//! into at most sixteen chunks tagged with a one-byte position header,
//! reassembled per sender on arrival, and fanned out to listeners on a
//! dedicated dispatch task.

pub mod chunk;
pub mod dispatch;
pub mod error;
pub mod message;
pub mod metrics;
pub mod reassembly;
pub mod transport;

pub use chunk::{
    Chunk,
    ChunkBatch,
    ChunkError,
    ChunkHeader,
    Chunker,
    ChunkingConfig,
    ChunkingError,
    MAX_CHUNK_COUNT,
    decode_header,
    encode_header,
    split_payload,
};
pub use dispatch::{
    DispatchConfig,
    DispatchError,
    DispatchWorker,
    Dispatcher,
    Ingest,
    ListenerId,
    ListenerPanic,
    MessageListener,
};
pub use error::{MeshframeError, Result};
pub use message::Message;
pub use reassembly::{
    CompletionPolicy,
    PayloadId,
    ReassembledMessage,
    Reassembler,
    ReassemblyError,
    SenderId,
};
pub use transport::{MeshPacket, Outbound, PacketSink, PayloadType};
