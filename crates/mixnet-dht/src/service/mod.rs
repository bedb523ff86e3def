//! # DHT Service
//!
//! High-level service implementing the `DhtApi` port.
//!
//! This service wraps the domain `RoutingTable`, gates writes through the
//! `AuthenticatedStore`, and drives iterative lookups over the
//! `RpcTransport` port.

// Semantic submodules
mod api;
mod core;
mod lookup;
mod maintenance;
mod store;

// Re-export public API
pub use core::DhtService;
pub use store::AuthenticatedStore;
