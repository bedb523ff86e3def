//! # Integration Tests
//!
//! Flows that cross the routing table, the authenticated store and the
//! facade through the public API only.

pub mod flows;
pub mod network;
