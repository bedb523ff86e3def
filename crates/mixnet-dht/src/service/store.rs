//! Authenticated record store.

use std::time::Duration;

use tracing::debug;

use crate::domain::{KvStoreError, SignedRecord, StoreError};
use crate::ports::KeyValueStore;

/// Gates writes to a storage engine behind the signed record checks.
///
/// Reads are an unrestricted pass-through.
///
/// # Security (Unauthenticated Write Defense)
/// A write reaches the engine only after its signature verifies under the
/// key it is stored at.
pub struct AuthenticatedStore<S> {
    engine: S,
    ttl: Duration,
}

impl<S: KeyValueStore> AuthenticatedStore<S> {
    /// Wrap `engine`; accepted records expire after `ttl`.
    pub fn new(engine: S, ttl: Duration) -> Self {
        Self { engine, ttl }
    }

    /// TTL handed to the engine with every accepted record.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The wrapped storage engine.
    pub fn engine(&self) -> &S {
        &self.engine
    }

    /// Validate `value = payload || signature` against `key` and write it.
    ///
    /// Checks run in order and the first failure is returned: value too
    /// large, value too small, key wrong size, signature invalid. Engine
    /// failures are surfaced unchanged as [`StoreError::Backend`].
    pub fn store(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        let checked = SignedRecord::parse(key, value).and_then(|record| record.verify());
        if let Err(err) = checked {
            debug!(key = %hex::encode(key), len = value.len(), reason = %err, "rejected record");
            return Err(err);
        }

        self.engine
            .put(key, value, self.ttl)
            .map_err(StoreError::Backend)
    }

    /// Read the record under `key`.
    pub fn retrieve(&self, key: &[u8]) -> Result<Vec<u8>, StoreError> {
        self.engine.get(key).map_err(|err| match err {
            KvStoreError::KeyMissing => StoreError::NotFound,
            other => StoreError::Backend(other),
        })
    }
}
