//! # Adapters Layer
//!
//! Concrete implementations of the driven ports:
//! - Storage engines (in-memory, RocksDB behind feature `rocksdb`)
//! - Configuration providers (static, TOML)
//! - System clock
//! - No-op RPC transport for offline use

pub mod config;
pub mod storage;
pub mod time;
pub mod transport;

pub use config::{parse_contact, ConfigError, StaticConfigProvider, TomlConfigProvider};
#[cfg(feature = "rocksdb")]
pub use storage::{RocksDbConfig, RocksDbKvStore};
pub use storage::MemoryKvStore;
pub use time::SystemTimeSource;
pub use transport::NoOpTransport;
