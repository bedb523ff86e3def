//! # Mixnet DHT Benchmarks
//!
//! Criterion benchmarks for the hot paths of the routing and storage core.
//! Driven by `benches/dht_benchmarks.rs`.

pub mod records;
pub mod routing_table;
