//! Test utilities for the DHT.
//!
//! This module provides deterministic clocks and an in-process network for
//! wiring several [`DhtService`] instances together without sockets.
//! Enable with the `test-utils` feature flag.
//!
//! # Example
//!
//! ```rust
//! use mixnet_dht::test_utils::FixedTimeSource;
//! use mixnet_dht::TimeSource;
//!
//! let time_source = FixedTimeSource::new(1000);
//! assert_eq!(time_source.now().as_secs(), 1000);
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::{Contact, DhtRequest, DhtResponse, NodeId, Timestamp, TransportError};
use crate::ports::{KeyValueStore, RpcTransport, TimeSource};
use crate::service::DhtService;

/// A time source that returns a fixed timestamp.
///
/// Useful for deterministic testing where time progression needs to be controlled.
#[derive(Debug, Clone)]
pub struct FixedTimeSource {
    timestamp: u64,
}

impl FixedTimeSource {
    /// Create a new fixed time source with the given timestamp (in seconds).
    pub fn new(timestamp: u64) -> Self {
        Self { timestamp }
    }

    /// Get the configured timestamp value.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.timestamp)
    }
}

/// Thread-safe clock that tests can advance.
///
/// Clones share the same clock, so one handle can drive both a storage
/// engine and the service using it.
#[derive(Debug, Clone)]
pub struct ControllableTimeSource {
    time: Arc<AtomicU64>,
}

impl ControllableTimeSource {
    /// Start the clock at `initial` seconds.
    pub fn new(initial: u64) -> Self {
        Self {
            time: Arc::new(AtomicU64::new(initial)),
        }
    }

    /// Advance the clock by `secs`.
    pub fn advance(&self, secs: u64) {
        self.time.fetch_add(secs, Ordering::SeqCst);
    }

    /// Jump the clock to `secs`.
    pub fn set(&self, secs: u64) {
        self.time.store(secs, Ordering::SeqCst);
    }
}

impl TimeSource for ControllableTimeSource {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.time.load(Ordering::SeqCst))
    }
}

// =============================================================================
// In-process network
// =============================================================================

/// Routes requests between services living in the same process.
///
/// Services are held weakly, so dropping a service makes it unreachable.
pub struct InProcessNetwork<S> {
    nodes: RwLock<HashMap<NodeId, Weak<DhtService<S>>>>,
    offline: RwLock<HashSet<NodeId>>,
}

impl<S: KeyValueStore + 'static> InProcessNetwork<S> {
    /// Create an empty network.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            nodes: RwLock::new(HashMap::new()),
            offline: RwLock::new(HashSet::new()),
        })
    }

    /// Transport handle for the node reachable as `local`.
    pub fn endpoint(self: &Arc<Self>, local: Contact) -> Arc<InProcessEndpoint<S>> {
        Arc::new(InProcessEndpoint {
            network: Arc::clone(self),
            local,
        })
    }

    /// Make `service` reachable under its node id.
    pub fn register(&self, service: &Arc<DhtService<S>>) {
        self.nodes
            .write()
            .insert(service.node_id(), Arc::downgrade(service));
    }

    /// Make every request to `id` time out (or reachable again).
    pub fn set_offline(&self, id: NodeId, offline: bool) {
        let mut set = self.offline.write();
        if offline {
            set.insert(id);
        } else {
            set.remove(&id);
        }
    }

    fn deliver(
        &self,
        from: Contact,
        to: &Contact,
        request: DhtRequest,
    ) -> Result<DhtResponse, TransportError> {
        if self.offline.read().contains(&to.id) {
            return Err(TransportError::Timeout);
        }
        let target = self
            .nodes
            .read()
            .get(&to.id)
            .and_then(Weak::upgrade)
            .ok_or_else(|| TransportError::Unreachable(to.to_string()))?;
        Ok(target.handle_request(from, request))
    }
}

/// One node's view of an [`InProcessNetwork`].
pub struct InProcessEndpoint<S> {
    network: Arc<InProcessNetwork<S>>,
    local: Contact,
}

#[async_trait]
impl<S: KeyValueStore + 'static> RpcTransport for InProcessEndpoint<S> {
    async fn send_request(
        &self,
        contact: &Contact,
        request: DhtRequest,
        _timeout: Duration,
    ) -> Result<DhtResponse, TransportError> {
        self.network.deliver(self.local, contact, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_time_source_returns_configured_value() {
        let source = FixedTimeSource::new(1000);
        assert_eq!(source.now().as_secs(), 1000);
    }

    #[test]
    fn test_controllable_time_source_clones_share_clock() {
        let source = ControllableTimeSource::new(100);
        let handle = source.clone();

        handle.advance(50);
        assert_eq!(source.now().as_secs(), 150);

        source.set(10);
        assert_eq!(handle.now().as_secs(), 10);
    }
}
