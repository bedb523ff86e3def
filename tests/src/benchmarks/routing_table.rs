//! # Routing Table Benchmarks
//!
//! Conditions measured:
//! - XOR distance between random ids
//! - Contact insertion into a table that keeps splitting
//! - Closest-contact queries against a populated table
//! - Adversarial id distribution (every peer in the local id's neighbourhood)

use std::net::SocketAddr;
use std::time::Duration;

use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use mixnet_dht::{xor_distance, Contact, DhtConfig, NodeId, RoutingTable, Timestamp};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_contacts(rng: &mut StdRng, count: usize) -> Vec<Contact> {
    (0..count)
        .map(|i| {
            let address = SocketAddr::from(([10, 0, (i >> 8) as u8, i as u8], 7400));
            Contact::new(NodeId::new(rng.gen()), address)
        })
        .collect()
}

fn populated_table(rng: &mut StdRng, count: usize) -> RoutingTable {
    let local = Contact::new(NodeId::new(rng.gen()), SocketAddr::from(([127, 0, 0, 1], 7400)));
    let mut table = RoutingTable::new(local, &DhtConfig::default());
    for contact in random_contacts(rng, count) {
        let _ = table.add_contact(contact, Timestamp::new(1000));
    }
    table
}

pub fn bench_xor_distance(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let a = NodeId::new(rng.gen());
    let b = NodeId::new(rng.gen());

    c.bench_function("routing/xor_distance", |bench| {
        bench.iter(|| black_box(xor_distance(black_box(&a), black_box(&b))))
    });
}

pub fn bench_add_contact(c: &mut Criterion) {
    let mut group = c.benchmark_group("routing/add_contact");
    group.measurement_time(Duration::from_secs(5));

    for size in [100usize, 1_000, 5_000] {
        let mut rng = StdRng::seed_from_u64(2);
        let contacts = random_contacts(&mut rng, size);
        let local = Contact::new(NodeId::new(rng.gen()), SocketAddr::from(([127, 0, 0, 1], 7400)));

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &contacts, |bench, contacts| {
            bench.iter(|| {
                let mut table = RoutingTable::new(local, &DhtConfig::default());
                for contact in contacts {
                    let _ = table.add_contact(*contact, Timestamp::new(1000));
                }
                black_box(table.len())
            })
        });
    }
    group.finish();
}

pub fn bench_closest_to(c: &mut Criterion) {
    let mut group = c.benchmark_group("routing/closest_to");

    for size in [100usize, 1_000, 5_000] {
        let mut rng = StdRng::seed_from_u64(3);
        let table = populated_table(&mut rng, size);
        let target = NodeId::new(rng.gen());

        group.bench_with_input(BenchmarkId::from_parameter(size), &table, |bench, table| {
            bench.iter(|| black_box(table.closest_to(black_box(&target), 20)))
        });
    }
    group.finish();
}

pub fn bench_clustered_neighbourhood(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(4);
    let local_bytes: [u8; 32] = rng.gen();
    let local = Contact::new(NodeId::new(local_bytes), SocketAddr::from(([127, 0, 0, 1], 7400)));

    // Peers share the first 30 bytes with the local id.
    let clustered: Vec<Contact> = (0..2_000u16)
        .map(|i| {
            let mut bytes = local_bytes;
            bytes[30] = (i >> 8) as u8 ^ 0x80;
            bytes[31] = i as u8;
            Contact::new(NodeId::new(bytes), SocketAddr::from(([10, 9, 0, 1], i)))
        })
        .collect();

    c.bench_function("routing/clustered_2000", |bench| {
        bench.iter(|| {
            let mut table = RoutingTable::new(local, &DhtConfig::default());
            for contact in &clustered {
                let _ = table.add_contact(*contact, Timestamp::new(1000));
            }
            black_box(table.bucket_count())
        })
    });
}
