//! # Mixnet DHT Core
//!
//! Routing and storage core of the Kademlia-derived distributed hash table
//! used as the membership and lookup substrate of the mix network.
//!
//! Every participant owns a 256-bit position in the keyspace (its ed25519
//! public key) and organizes what it knows about other participants into
//! k-buckets by XOR distance. Records are addressed by a public key and are
//! accepted only when signed by the matching private key.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture with:
//! - **Domain Layer:** Pure Kademlia logic (XOR distance, ordered keyed list,
//!   k-buckets, routing table, signed records)
//! - **Ports Layer:** Trait definitions for external dependencies
//! - **Service Layer:** Authenticated store, DHT facade, iterative lookup
//! - **Adapters Layer:** Storage engines, config loading, clock, transport
//!
//! ## Example
//!
//! ```rust
//! use mixnet_dht::{Contact, DhtConfig, NodeId, RoutingTable, Timestamp};
//!
//! let local = Contact::new(NodeId::new([0u8; 32]), "127.0.0.1:7400".parse().unwrap());
//! let mut table = RoutingTable::new(local, &DhtConfig::default());
//!
//! let peer = Contact::new(NodeId::new([1u8; 32]), "10.0.0.2:7400".parse().unwrap());
//! table.add_contact(peer, Timestamp::new(1000)).unwrap();
//!
//! let closest = table.closest_to(&NodeId::new([2u8; 32]), 20);
//! assert_eq!(closest, vec![peer]);
//! ```

// =============================================================================
// CORE MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Test utilities (FixedTimeSource, InProcessNetwork, etc.)
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// =============================================================================
// CORE RE-EXPORTS
// =============================================================================

// Domain entities
pub use domain::{
    AddOutcome, Contact, DhtConfig, Distance, KBucket, KeySpan, NodeId, NodeIdentity,
    OrderedKeyedList, Position, RoutingTable, RoutingTableStats, SignedRecord, Timestamp,
    KEY_SIZE, MAX_VALUE_SIZE, SIGNATURE_SIZE,
};

// Domain errors
pub use domain::{DhtError, KvStoreError, RoutingError, StoreError, TransportError};

// RPC messages
pub use domain::{DhtRequest, DhtResponse, FindValueOutcome};

// Domain services
pub use domain::{find_k_closest, sort_contacts_by_distance, xor_distance};

// Port traits
pub use ports::{ConfigProvider, DhtApi, KeyValueStore, RpcTransport, TimeSource};

// Service
pub use service::{AuthenticatedStore, DhtService};

// Adapters
pub use adapters::{
    ConfigError, MemoryKvStore, NoOpTransport, StaticConfigProvider, SystemTimeSource,
    TomlConfigProvider,
};
#[cfg(feature = "rocksdb")]
pub use adapters::{RocksDbConfig, RocksDbKvStore};
