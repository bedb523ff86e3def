//! # RocksDB Storage Engine
//!
//! Persistent [`KeyValueStore`] for records. Requires feature `rocksdb`.
//!
//! ## Layout
//!
//! Each value is stored as `expires_at (8 bytes, big-endian seconds) || value`.
//! RocksDB has no per-key TTL, so expiry is checked on read and expired
//! entries are deleted lazily. Writes and expiry deletes share one lock, and
//! a delete re-reads the entry first so it never removes a newer record.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rocksdb::{Options, WriteOptions, DB};
use tracing::trace;

use crate::domain::{KvStoreError, Timestamp};
use crate::ports::{KeyValueStore, TimeSource};

const EXPIRY_PREFIX_LEN: usize = 8;

/// RocksDB configuration for the record store
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory
    pub path: String,
    /// Write buffer size in bytes (default: 16MB)
    pub write_buffer_size: usize,
    /// Enable fsync after each write (default: true for durability)
    pub sync_writes: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: "./data/dht".to_string(),
            write_buffer_size: 16 * 1024 * 1024, // 16MB
            sync_writes: true,
        }
    }
}

impl RocksDbConfig {
    /// Create config for testing (small buffers, no sync)
    pub fn for_testing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            write_buffer_size: 1024 * 1024, // 1MB
            sync_writes: false,
        }
    }
}

/// RocksDB-backed record engine implementing the KeyValueStore trait
pub struct RocksDbKvStore {
    db: DB,
    config: RocksDbConfig,
    time_source: Arc<dyn TimeSource>,
    write_guard: Mutex<()>,
}

impl RocksDbKvStore {
    /// Open or create a RocksDB database
    pub fn open(config: RocksDbConfig, time_source: Arc<dyn TimeSource>) -> Result<Self, KvStoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let db = DB::open(&opts, Path::new(&config.path)).map_err(|e| KvStoreError::Io {
            message: format!("Failed to open RocksDB: {}", e),
        })?;

        Ok(Self {
            db,
            config,
            time_source,
            write_guard: Mutex::new(()),
        })
    }

    fn read_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KvStoreError> {
        self.db.get(key).map_err(|e| KvStoreError::Io {
            message: format!("RocksDB get failed: {}", e),
        })
    }

    /// Delete `key` if the stored entry is expired at `now`.
    fn delete_if_expired(&self, key: &[u8], now: Timestamp) -> Result<bool, KvStoreError> {
        let _guard = self.write_guard.lock();
        let Some(stored) = self.read_raw(key)? else {
            return Ok(false);
        };
        let (expires_at, _) = decode(&stored)?;
        if expires_at > now {
            return Ok(false);
        }
        self.db.delete(key).map_err(|e| KvStoreError::Io {
            message: format!("RocksDB delete failed: {}", e),
        })?;
        Ok(true)
    }
}

/// Split a stored entry into its expiry and value.
fn decode(stored: &[u8]) -> Result<(Timestamp, &[u8]), KvStoreError> {
    if stored.len() < EXPIRY_PREFIX_LEN {
        return Err(KvStoreError::Io {
            message: format!("corrupt entry: {} bytes", stored.len()),
        });
    }
    let (prefix, value) = stored.split_at(EXPIRY_PREFIX_LEN);
    let mut expiry = [0u8; EXPIRY_PREFIX_LEN];
    expiry.copy_from_slice(prefix);
    Ok((Timestamp::new(u64::from_be_bytes(expiry)), value))
}

impl KeyValueStore for RocksDbKvStore {
    fn put(&self, key: &[u8], value: &[u8], ttl: Duration) -> Result<(), KvStoreError> {
        let expires_at = self.time_source.now().add_ttl(ttl);
        let mut stored = Vec::with_capacity(EXPIRY_PREFIX_LEN + value.len());
        stored.extend_from_slice(&expires_at.as_secs().to_be_bytes());
        stored.extend_from_slice(value);

        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.config.sync_writes);
        let _guard = self.write_guard.lock();
        self.db
            .put_opt(key, stored, &write_opts)
            .map_err(|e| KvStoreError::Io {
                message: format!("RocksDB put failed: {}", e),
            })
    }

    fn get(&self, key: &[u8]) -> Result<Vec<u8>, KvStoreError> {
        let stored = self.read_raw(key)?.ok_or(KvStoreError::KeyMissing)?;
        let (expires_at, value) = decode(&stored)?;

        let now = self.time_source.now();
        if expires_at <= now {
            if self.delete_if_expired(key, now)? {
                trace!(key = %hex::encode(key), "dropped expired record");
            }
            return Err(KvStoreError::KeyMissing);
        }
        Ok(value.to_vec())
    }
}
