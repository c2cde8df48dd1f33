//! Builder for [`DispatchConfig`].

use std::time::Duration;

use bytes::Bytes;

use super::DispatchConfigError;
use crate::reassembly::CompletionPolicy;

/// Prefix of discovery broadcasts exchanged by peers; never chunked data.
pub const DISCOVERY_BROADCAST_MARKER: &[u8] = b"ATAK_FORWARDER_DISCOVERY";

const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Settings for a [`Dispatcher`](super::Dispatcher).
#[derive(Clone, Debug)]
pub struct DispatchConfig {
    pub(crate) queue_capacity: usize,
    pub(crate) discovery_marker: Option<Bytes>,
    pub(crate) reassembly_timeout: Option<Duration>,
    pub(crate) completion_policy: CompletionPolicy,
}

impl DispatchConfig {
    /// Start building a configuration from the defaults.
    #[must_use]
    pub fn builder() -> DispatchConfigBuilder { DispatchConfigBuilder::default() }

    /// Capacity of the completed-message queue.
    #[must_use]
    pub const fn queue_capacity(&self) -> usize { self.queue_capacity }

    /// Marker whose packets are dropped before reassembly, if any.
    #[must_use]
    pub fn discovery_marker(&self) -> Option<&Bytes> { self.discovery_marker.as_ref() }

    /// Deadline after which partial messages are evicted, if any.
    #[must_use]
    pub const fn reassembly_timeout(&self) -> Option<Duration> { self.reassembly_timeout }

    /// When sender buffers are assembled.
    #[must_use]
    pub const fn completion_policy(&self) -> CompletionPolicy { self.completion_policy }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            discovery_marker: Some(Bytes::from_static(DISCOVERY_BROADCAST_MARKER)),
            reassembly_timeout: None,
            completion_policy: CompletionPolicy::default(),
        }
    }
}

/// Builder for [`DispatchConfig`].
#[derive(Clone, Debug, Default)]
pub struct DispatchConfigBuilder {
    config: DispatchConfig,
}

impl DispatchConfigBuilder {
    /// Set the capacity of the completed-message queue.
    #[must_use]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    /// Replace the discovery marker, or disable the check with `None`.
    #[must_use]
    pub fn discovery_marker(mut self, marker: Option<Bytes>) -> Self {
        self.config.discovery_marker = marker;
        self
    }

    /// Evict partial messages older than `timeout`.
    #[must_use]
    pub fn reassembly_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.reassembly_timeout = timeout;
        self
    }

    /// Select when sender buffers are assembled.
    #[must_use]
    pub fn completion_policy(mut self, policy: CompletionPolicy) -> Self {
        self.config.completion_policy = policy;
        self
    }

    /// Validate and return the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchConfigError::InvalidCapacity`] if the queue capacity
    /// is zero.
    pub fn build(self) -> Result<DispatchConfig, DispatchConfigError> {
        if self.config.queue_capacity == 0 {
            return Err(DispatchConfigError::InvalidCapacity(0));
        }
        Ok(self.config)
    }
}
