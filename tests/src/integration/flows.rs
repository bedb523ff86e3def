//! # Single-Node Flows
//!
//! Routing table population and authenticated storage exercised through
//! the crate's public API.
//!
//! ## Flows Tested:
//!
//! 1. **Bucket overflow**: a full non-local bucket parks newcomers as replacements
//! 2. **Record overwrite**: a forged update never replaces a valid record
//! 3. **Record expiry**: stored records disappear after their TTL
//! 4. **Configured node**: a node built from a TOML config answers peers

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use mixnet_dht::test_utils::{ControllableTimeSource, FixedTimeSource};
    use mixnet_dht::{
        AddOutcome, AuthenticatedStore, ConfigProvider, Contact, DhtApi, DhtConfig,
        DhtRequest, DhtResponse, DhtService, FindValueOutcome, MemoryKvStore, NoOpTransport,
        NodeId, NodeIdentity, RoutingTable, StoreError, Timestamp, TomlConfigProvider,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([10, 0, 0, 1], port))
    }

    /// Id whose big-endian value is `n`.
    fn small_id(n: u8) -> NodeId {
        let mut bytes = [0u8; 32];
        bytes[31] = n;
        NodeId::new(bytes)
    }

    fn memory_store(clock: ControllableTimeSource) -> AuthenticatedStore<MemoryKvStore> {
        AuthenticatedStore::new(
            MemoryKvStore::new(Arc::new(clock)),
            DhtConfig::default().record_ttl(),
        )
    }

    // =============================================================================
    // ROUTING TABLE FLOWS
    // =============================================================================

    #[test]
    fn test_overflowing_bucket_keeps_oldest_and_caches_newcomer() {
        let local = Contact::new(NodeId::new([0xFF; 32]), addr(7000));
        let config = DhtConfig {
            k: 2,
            ..DhtConfig::default()
        };
        let mut table = RoutingTable::new(local, &config);
        let now = Timestamp::new(1000);

        let outcomes: Vec<AddOutcome> = (1..=3)
            .map(|n| {
                table
                    .add_contact(Contact::new(small_id(n), addr(8000 + n as u16)), now)
                    .unwrap()
            })
            .collect();

        assert_eq!(
            outcomes,
            vec![AddOutcome::Added, AddOutcome::Added, AddOutcome::Cached]
        );
        let stats = table.stats();
        assert_eq!(stats.total_contacts, 2);
        assert_eq!(stats.total_replacements, 1);

        let closest: Vec<NodeId> = table
            .closest_to(&NodeId::zero(), 2)
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(closest, vec![small_id(1), small_id(2)]);
    }

    #[test]
    fn test_routing_table_spans_partition_keyspace_after_many_adds() {
        use rand::{Rng, SeedableRng};

        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let local = Contact::new(NodeId::new(rng.gen()), addr(7000));
        let mut table = RoutingTable::new(local, &DhtConfig::for_testing());

        for i in 0..500u16 {
            let peer = Contact::new(NodeId::new(rng.gen()), addr(i));
            table.add_contact(peer, Timestamp::new(1000)).unwrap();
        }

        let buckets = table.buckets();
        assert!(buckets[0].span().low().is_zero());
        assert_eq!(
            buckets[buckets.len() - 1].span().last(),
            NodeId::new([0xFF; 32]).to_u256()
        );
        for pair in buckets.windows(2) {
            assert_eq!((pair[1].span().low() - pair[0].span().last()).as_u64(), 1);
        }
        for bucket in buckets {
            assert!(bucket.len() <= 3);
            for contact in bucket.contacts() {
                assert!(bucket.span().contains(&contact.id));
            }
        }
    }

    // =============================================================================
    // STORAGE FLOWS
    // =============================================================================

    #[test]
    fn test_forged_update_leaves_valid_record_in_place() {
        let store = memory_store(ControllableTimeSource::new(1000));
        let owner = NodeIdentity::from_seed([3u8; 32]);
        let key = owner.node_id();

        let valid = owner.sign_record(b"mix node v1");
        let mut corrupted = owner.sign_record(b"mix node v2");
        let sig_byte = corrupted.len() - 1;
        corrupted[sig_byte] ^= 0x01;

        assert!(store.store(key.as_bytes(), &valid).is_ok());
        assert_eq!(
            store.store(key.as_bytes(), &corrupted),
            Err(StoreError::SignatureInvalid)
        );
        assert_eq!(store.retrieve(key.as_bytes()).unwrap(), valid);
    }

    #[test]
    fn test_record_expires_after_a_day() {
        let clock = ControllableTimeSource::new(1000);
        let store = memory_store(clock.clone());
        let owner = NodeIdentity::from_seed([4u8; 32]);
        let key = owner.node_id();
        store
            .store(key.as_bytes(), &owner.sign_record(b"short lived"))
            .unwrap();

        clock.advance(86_399);
        assert!(store.retrieve(key.as_bytes()).is_ok());

        clock.advance(1);
        assert_eq!(store.retrieve(key.as_bytes()), Err(StoreError::NotFound));
    }

    #[test]
    fn test_valid_update_replaces_record() {
        let store = memory_store(ControllableTimeSource::new(1000));
        let owner = NodeIdentity::from_seed([5u8; 32]);
        let key = owner.node_id();

        store.store(key.as_bytes(), &owner.sign_record(b"v1")).unwrap();
        store.store(key.as_bytes(), &owner.sign_record(b"v2")).unwrap();

        assert_eq!(
            store.retrieve(key.as_bytes()).unwrap(),
            owner.sign_record(b"v2")
        );
    }

    // =============================================================================
    // CONFIGURED NODE
    // =============================================================================

    #[test]
    fn test_node_built_from_toml_config_answers_peers() {
        let seed = NodeIdentity::from_seed([6u8; 32]).node_id();
        let provider = TomlConfigProvider::parse(&format!(
            r#"
            [bootstrap]
            nodes = ["{}@10.0.0.9:7400"]

            [dht]
            k = 4
            "#,
            seed.to_hex()
        ))
        .unwrap();

        assert_eq!(provider.bootstrap_contacts().len(), 1);
        assert_eq!(provider.bootstrap_contacts()[0].id, seed);

        let clock = FixedTimeSource::new(1000);
        let service = DhtService::new(
            NodeIdentity::from_seed([7u8; 32]),
            addr(7000),
            provider.dht_config(),
            MemoryKvStore::new(Arc::new(clock.clone())),
            Arc::new(NoOpTransport),
            Box::new(clock),
        );
        assert_eq!(service.config().k, 4);

        for n in 1..=6 {
            let peer = Contact::new(small_id(n), addr(9000 + n as u16));
            assert_eq!(service.handle_request(peer, DhtRequest::Ping), DhtResponse::Pong);
        }

        match service.find_value(&small_id(0)).unwrap() {
            FindValueOutcome::Nodes(nodes) => assert!(nodes.len() <= 4),
            other => panic!("expected Nodes, got {other:?}"),
        }
    }
}
