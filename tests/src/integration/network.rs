//! # Multi-Node Network Tests
//!
//! Several `DhtService` instances wired together over the in-process
//! network, each with its own identity, routing table and record store.
//!
//! ```text
//! [node 1] ──bootstrap──┐
//! [node 2] ──bootstrap──┼──→ [node 0 (seed)]
//!   ...                 │
//! [node N] ──bootstrap──┘
//! ```
//!
//! ## Test Categories
//!
//! 1. **Bootstrap**: joining through one seed populates every routing table
//! 2. **Lookup**: iterative lookups converge on the target's neighbourhood
//! 3. **Records**: a published record is found from any other node
//! 4. **Failures**: offline nodes are routed around and evicted

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use mixnet_dht::test_utils::{FixedTimeSource, InProcessNetwork};
    use mixnet_dht::{
        find_k_closest, Contact, DhtApi, DhtConfig, DhtError, DhtService, FindValueOutcome,
        MemoryKvStore, NodeId, NodeIdentity,
    };

    type Node = Arc<DhtService<MemoryKvStore>>;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn addr(index: usize) -> SocketAddr {
        SocketAddr::from(([10, 1, 0, index as u8], 7400))
    }

    fn spawn_node(
        network: &Arc<InProcessNetwork<MemoryKvStore>>,
        index: usize,
        config: DhtConfig,
    ) -> Node {
        let identity = NodeIdentity::from_seed([index as u8 + 1; 32]);
        let local = Contact::new(identity.node_id(), addr(index));
        let clock = FixedTimeSource::new(1000);
        let node = Arc::new(DhtService::new(
            identity,
            local.address,
            config,
            MemoryKvStore::new(Arc::new(clock.clone())),
            network.endpoint(local),
            Box::new(clock),
        ));
        network.register(&node);
        node
    }

    /// Spawn `size` nodes and bootstrap every one of them through node 0.
    async fn build_network(
        size: usize,
        config: DhtConfig,
    ) -> (Arc<InProcessNetwork<MemoryKvStore>>, Vec<Node>) {
        let network = InProcessNetwork::new();
        let nodes: Vec<Node> = (0..size)
            .map(|i| spawn_node(&network, i, config.clone()))
            .collect();

        let seed = *nodes[0].local();
        for node in &nodes[1..] {
            node.bootstrap(&[seed]).await.unwrap();
        }
        (network, nodes)
    }

    fn all_contacts(nodes: &[Node]) -> Vec<Contact> {
        nodes.iter().map(|n| *n.local()).collect()
    }

    // =============================================================================
    // BOOTSTRAP
    // =============================================================================

    #[tokio::test]
    async fn test_bootstrap_populates_seed_and_joiners() {
        let (_network, nodes) = build_network(12, DhtConfig::default()).await;

        assert_eq!(nodes[0].stats().total_contacts, 11);
        for node in &nodes[1..] {
            assert!(node.routing_table().contains(&nodes[0].node_id()));
            assert!(node.stats().total_contacts >= 1);
        }
    }

    #[tokio::test]
    async fn test_bootstrap_with_unreachable_seed_fails() {
        let network = InProcessNetwork::new();
        let node = spawn_node(&network, 0, DhtConfig::default());
        let ghost = Contact::new(NodeId::new([0xAB; 32]), addr(99));

        let result = node.bootstrap(&[ghost]).await;

        assert_eq!(result, Err(DhtError::LookupFailed));
    }

    // =============================================================================
    // LOOKUP
    // =============================================================================

    #[tokio::test]
    async fn test_lookup_finds_globally_closest_nodes() {
        let config = DhtConfig::default();
        let (_network, nodes) = build_network(16, config.clone()).await;
        let target = NodeId::new([0x5A; 32]);

        let found = nodes[7].lookup_node(target).await.unwrap();

        let others: Vec<Contact> = all_contacts(&nodes)
            .into_iter()
            .filter(|c| c.id != nodes[7].node_id())
            .collect();
        let expected = find_k_closest(&others, &target, config.k);
        assert_eq!(found, expected);
    }

    #[tokio::test]
    async fn test_lookup_results_are_sorted_and_bounded() {
        let config = DhtConfig::for_testing();
        let (_network, nodes) = build_network(20, config.clone()).await;
        let target = NodeId::new([0x11; 32]);

        let found = nodes[3].lookup_node(target).await.unwrap();

        assert!(!found.is_empty());
        assert!(found.len() <= config.k);
        assert!(!found.iter().any(|c| c.id == nodes[3].node_id()));
        for pair in found.windows(2) {
            assert!(pair[0].id.distance(&target) < pair[1].id.distance(&target));
        }
    }

    // =============================================================================
    // RECORDS
    // =============================================================================

    #[tokio::test]
    async fn test_published_record_found_from_other_node() {
        let (_network, nodes) = build_network(20, DhtConfig::default()).await;
        nodes[5].publish(b"mix node descriptor").unwrap();

        let outcome = nodes[17].lookup_value(nodes[5].node_id()).await.unwrap();

        let expected = NodeIdentity::from_seed([6u8; 32]).sign_record(b"mix node descriptor");
        assert_eq!(outcome, FindValueOutcome::Value(expected));
    }

    #[tokio::test]
    async fn test_missing_record_lookup_returns_nodes() {
        let (_network, nodes) = build_network(8, DhtConfig::default()).await;
        let absent = NodeIdentity::from_seed([0xEE; 32]).node_id();

        let outcome = nodes[2].lookup_value(absent).await.unwrap();

        match outcome {
            FindValueOutcome::Nodes(found) => assert!(!found.is_empty()),
            other => panic!("expected Nodes, got {other:?}"),
        }
    }

    // =============================================================================
    // FAILURES
    // =============================================================================

    #[tokio::test]
    async fn test_lookup_routes_around_offline_node() {
        let (network, nodes) = build_network(10, DhtConfig::default()).await;
        let offline = nodes[4].node_id();
        network.set_offline(offline, true);

        let found = nodes[8].lookup_node(offline).await.unwrap();

        assert!(!found.is_empty());
        assert!(!found.iter().any(|c| c.id == offline));
    }

    #[tokio::test]
    async fn test_ping_evicts_offline_node() {
        let (network, nodes) = build_network(6, DhtConfig::default()).await;
        let offline = *nodes[3].local();
        assert!(nodes[0].routing_table().contains(&offline.id));
        network.set_offline(offline.id, true);

        let result = nodes[0].ping(offline).await;

        assert_eq!(result, Err(DhtError::TransportTimeout));
        assert!(!nodes[0].routing_table().contains(&offline.id));

        network.set_offline(offline.id, false);
        nodes[0].ping(offline).await.unwrap();
        assert!(nodes[0].routing_table().contains(&offline.id));
    }
}
