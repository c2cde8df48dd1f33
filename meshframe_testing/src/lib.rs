//! Test utilities for driving `meshframe` chunking and dispatch.
//!
//! Helpers build wire chunks for a message, replay them through a
//! [`Reassembler`](meshframe::Reassembler) or
//! [`Dispatcher`](meshframe::Dispatcher) in a chosen order, and capture log
//! output for assertions.
//!
//! ```rust
//! use meshframe::{Reassembler, SenderId};
//! use meshframe_testing::{deliver, wire_chunks};
//!
//! let chunks = wire_chunks(b"hello mesh", 4);
//! let reassembler = Reassembler::new();
//! let outcome = deliver(&reassembler, &SenderId::from("!a"), &chunks, &[1, 0, 2]);
//! assert_eq!(outcome.messages[0].bytes().as_ref(), b"hello mesh");
//! ```

pub mod helpers;
pub mod logging;

pub use helpers::{Delivery, deliver, opaque_packets, wire_chunks};
pub use logging::{LoggerHandle, logger};
