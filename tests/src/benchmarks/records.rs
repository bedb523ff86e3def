//! # Record Validation Benchmarks
//!
//! Every inbound store pays for a signature check, so its cost bounds how
//! many writes a node can absorb.

use std::sync::Arc;

use criterion::{black_box, Criterion};
use mixnet_dht::test_utils::FixedTimeSource;
use mixnet_dht::{AuthenticatedStore, DhtConfig, MemoryKvStore, NodeIdentity};

pub fn bench_authenticated_store(c: &mut Criterion) {
    let owner = NodeIdentity::from_seed([7u8; 32]);
    let key = owner.node_id();
    let valid = owner.sign_record(&[0x42; 1024]);
    let mut forged = valid.clone();
    let last = forged.len() - 1;
    forged[last] ^= 0x01;

    let store = AuthenticatedStore::new(
        MemoryKvStore::new(Arc::new(FixedTimeSource::new(1000))),
        DhtConfig::default().record_ttl(),
    );

    let mut group = c.benchmark_group("records/store");
    group.bench_function("valid_1k", |bench| {
        bench.iter(|| black_box(store.store(key.as_bytes(), black_box(&valid))))
    });
    group.bench_function("forged_1k", |bench| {
        bench.iter(|| black_box(store.store(key.as_bytes(), black_box(&forged))))
    });
    group.finish();
}
