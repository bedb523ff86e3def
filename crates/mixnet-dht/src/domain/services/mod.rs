//! Domain Services - Pure functions for Kademlia operations
//!
//! All functions in this module are pure (no I/O, no state mutation)
//! and deterministic (same inputs → same outputs).

// Semantic submodules
mod distance;
mod sorting;

// Re-export public API
pub use distance::{shared_prefix_bits, xor_distance};
pub use sorting::{compare_by_distance, find_k_closest, sort_contacts_by_distance};
