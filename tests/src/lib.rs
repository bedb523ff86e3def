//! # Mixnet DHT Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── benchmarks/       # Routing table and record validation throughput
//! │   └── routing_table.rs
//! │
//! └── integration/      # Whole-crate flows
//!     ├── flows.rs      # Single-node routing and storage flows
//!     └── network.rs    # Several nodes over the in-process network
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p mixnet-dht-tests
//!
//! # By category
//! cargo test -p mixnet-dht-tests integration::
//!
//! # Benchmarks
//! cargo bench -p mixnet-dht-tests
//! ```

pub mod benchmarks;
pub mod integration;
