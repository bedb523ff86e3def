//! # Mixnet DHT Benchmarks
//!
//! | Area | Operation |
//! |------|-----------|
//! | Routing | XOR distance, contact insertion, closest-contact query |
//! | Routing | Insertion with every peer clustered near the local id |
//! | Records | Signature-gated store, valid and forged |

use criterion::{criterion_group, criterion_main};
use mixnet_dht_tests::benchmarks::records::bench_authenticated_store;
use mixnet_dht_tests::benchmarks::routing_table::{
    bench_add_contact, bench_closest_to, bench_clustered_neighbourhood, bench_xor_distance,
};

criterion_group!(
    routing_benches,
    bench_xor_distance,
    bench_add_contact,
    bench_closest_to,
    bench_clustered_neighbourhood
);
criterion_group!(record_benches, bench_authenticated_store);
criterion_main!(routing_benches, record_benches);
