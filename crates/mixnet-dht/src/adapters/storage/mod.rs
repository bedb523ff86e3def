//! Storage engine adapters implementing [`KeyValueStore`](crate::ports::KeyValueStore).

mod memory;
#[cfg(feature = "rocksdb")]
mod rocks;

pub use memory::MemoryKvStore;
#[cfg(feature = "rocksdb")]
pub use rocks::{RocksDbConfig, RocksDbKvStore};
