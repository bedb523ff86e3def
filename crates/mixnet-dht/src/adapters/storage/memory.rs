//! # In-Memory Storage Engine
//!
//! Volatile [`KeyValueStore`] with per-entry expiry. Expired entries read as
//! missing and are dropped lazily on access or by [`MemoryKvStore::purge_expired`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::trace;

use crate::domain::{KvStoreError, Timestamp};
use crate::ports::{KeyValueStore, TimeSource};

#[derive(Debug, Clone)]
struct Entry {
    value: Vec<u8>,
    expires_at: Timestamp,
}

/// Thread-safe in-memory engine, expiring entries by an injected clock.
pub struct MemoryKvStore {
    entries: RwLock<HashMap<Vec<u8>, Entry>>,
    time_source: Arc<dyn TimeSource>,
}

impl MemoryKvStore {
    /// Create an empty store reading time from `time_source`.
    pub fn new(time_source: Arc<dyn TimeSource>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            time_source,
        }
    }

    /// Number of entries held, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.time_source.now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        let purged = before - entries.len();
        if purged > 0 {
            trace!(purged, "purged expired records");
        }
        purged
    }

    /// Remove `key` if its entry is expired at `now`. Re-checked under the
    /// write lock, so a record written since the caller's read survives.
    fn remove_if_expired(&self, key: &[u8], now: Timestamp) -> bool {
        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|entry| entry.expires_at <= now) {
            entries.remove(key);
            return true;
        }
        false
    }
}

impl KeyValueStore for MemoryKvStore {
    fn put(&self, key: &[u8], value: &[u8], ttl: Duration) -> Result<(), KvStoreError> {
        let expires_at = self.time_source.now().add_ttl(ttl);
        self.entries.write().insert(
            key.to_vec(),
            Entry {
                value: value.to_vec(),
                expires_at,
            },
        );
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Vec<u8>, KvStoreError> {
        let now = self.time_source.now();
        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => return Err(KvStoreError::KeyMissing),
                Some(entry) if entry.expires_at > now => return Ok(entry.value.clone()),
                Some(_) => {}
            }
        }
        if self.remove_if_expired(key, now) {
            trace!(key = %hex::encode(key), "dropped expired record");
        }
        Err(KvStoreError::KeyMissing)
    }
}
