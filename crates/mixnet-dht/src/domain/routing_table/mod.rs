//! Routing Table Implementation
//!
//! This module implements the Kademlia routing table: k-buckets with
//! replacement caches covering the keyspace, split on demand around the
//! local id.

// Semantic submodules
mod bucket;
mod stats;
mod table;

// Re-export public API
pub use bucket::{AddOutcome, KBucket};
pub use stats::RoutingTableStats;
pub use table::RoutingTable;
