//! # Ports Layer - Hexagonal Architecture Boundaries
//!
//! This module defines the port interfaces (traits) for the DHT core.
//!
//! ## Architecture
//!
//! - **Driving Ports (Inbound):** APIs this crate exposes to consumers
//! - **Driven Ports (Outbound):** SPIs this crate requires from adapters
//!
//! ## Security
//!
//! Every write reaching a [`KeyValueStore`] has already passed the signed
//! record checks (Unauthenticated Write Defense).

pub mod inbound;
pub mod outbound;

pub use inbound::DhtApi;
pub use outbound::{ConfigProvider, KeyValueStore, RpcTransport, TimeSource};
