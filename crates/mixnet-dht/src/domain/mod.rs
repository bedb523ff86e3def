//! Domain Layer - Pure business logic with no I/O
//!
//! This module contains the core Kademlia DHT logic including:
//! - Node identifiers and XOR distance calculation
//! - The ordered keyed list backing every k-bucket
//! - Routing table with k-buckets and replacement caches
//! - Signed record validation (Unauthenticated Write Defense)
//! - Node identity and the in-memory RPC messages

pub mod identity;
pub mod keyed_list;
pub mod record;
pub mod routing_table;
pub mod rpc;
pub mod services;
/// Core domain types (entities, values, errors)
pub mod types;

pub use identity::NodeIdentity;
pub use keyed_list::{Keyed, OrderedKeyedList, Position};
pub use record::SignedRecord;
pub use routing_table::*;
pub use rpc::{DhtRequest, DhtResponse, FindValueOutcome};
pub use services::*;
pub use types::*;
