//! # Driven Ports (Outbound SPI)
//!
//! These are the interfaces this crate requires the host application to implement.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{
    Contact, DhtConfig, DhtRequest, DhtResponse, KvStoreError, Timestamp, TransportError,
};

/// Abstract interface for the persistent key/value engine.
///
/// Engines own their concurrency, so both operations take `&self`.
///
/// Production: `RocksDbKvStore` (feature `rocksdb`)
/// Testing: `MemoryKvStore`
pub trait KeyValueStore: Send + Sync {
    /// Store `value` under `key`; the engine drops it once `ttl` elapses.
    fn put(&self, key: &[u8], value: &[u8], ttl: Duration) -> Result<(), KvStoreError>;

    /// Read the value under `key`.
    ///
    /// Absent or expired keys fail with [`KvStoreError::KeyMissing`].
    fn get(&self, key: &[u8]) -> Result<Vec<u8>, KvStoreError>;
}

/// Abstract interface for sending DHT requests to remote contacts.
///
/// The transport owns framing, encryption and session setup. It must honor
/// `timeout` and report an expired request as [`TransportError::Timeout`].
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Send `request` to `contact` and await its reply.
    async fn send_request(
        &self,
        contact: &Contact,
        request: DhtRequest,
        timeout: Duration,
    ) -> Result<DhtResponse, TransportError>;
}

/// Abstract interface for time-related operations.
///
/// Enables deterministic testing by injecting controllable time sources.
/// Production implementations use system time; tests use fixed timestamps.
pub trait TimeSource: Send + Sync {
    /// Get the current timestamp.
    fn now(&self) -> Timestamp;
}

/// Abstract interface for configuration loading.
///
/// Allows different configuration sources (file, environment, etc.)
pub trait ConfigProvider: Send + Sync {
    /// Well-known contacts used to join the network.
    fn bootstrap_contacts(&self) -> Vec<Contact>;

    /// Routing, lookup and storage parameters.
    fn dht_config(&self) -> DhtConfig;
}
