//! Identifiers attached to inbound packets by the mesh transport.

use derive_more::{Display, From};

/// Stable identifier of the node that sent a packet, e.g. `!a1b2c3d4`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From)]
#[display("{_0}")]
pub struct SenderId(String);

impl SenderId {
    /// Wrap a node identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str { &self.0 }
}

impl From<&str> for SenderId {
    fn from(value: &str) -> Self { Self(value.to_owned()) }
}

/// Transport-assigned packet identifier.
///
/// The identifier of the packet that completed a message is reported to
/// listeners as the message identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From)]
#[display("{_0}")]
pub struct PayloadId(u32);

impl PayloadId {
    /// Construct an identifier from the raw transport value.
    #[must_use]
    pub const fn new(value: u32) -> Self { Self(value) }

    /// Return the raw transport value.
    #[must_use]
    pub const fn get(self) -> u32 { self.0 }
}
