use std::net::SocketAddr;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};
use tracing::{debug, trace};

use crate::domain::{
    AddOutcome, Contact, DhtConfig, NodeId, NodeIdentity, RoutingError, RoutingTable,
    RoutingTableStats, Timestamp,
};
use crate::ports::{KeyValueStore, RpcTransport, TimeSource};
use crate::service::AuthenticatedStore;

/// DHT facade implementing the driving port.
///
/// Composes the routing table, the authenticated store and the RPC
/// transport. The routing table sits behind one `RwLock`: mutations take
/// the write lock, queries the read lock, and no guard is held across an
/// `.await`.
///
/// # Example
///
/// ```rust,ignore
/// use mixnet_dht::service::DhtService;
/// use mixnet_dht::ports::DhtApi;
///
/// let service = DhtService::new(
///     NodeIdentity::generate(),
///     "127.0.0.1:4000".parse()?,
///     DhtConfig::default(),
///     MemoryKvStore::new(Arc::new(SystemTimeSource)),
///     Arc::new(NoOpTransport),
///     Box::new(SystemTimeSource),
/// );
///
/// let closest = service.lookup_node(target).await?;
/// ```
pub struct DhtService<S> {
    pub(crate) identity: NodeIdentity,
    pub(crate) local: Contact,
    pub(crate) config: DhtConfig,
    pub(crate) routing_table: RwLock<RoutingTable>,
    pub(crate) store: AuthenticatedStore<S>,
    pub(crate) transport: Arc<dyn RpcTransport>,
    pub(crate) time_source: Box<dyn TimeSource>,
}

impl<S: KeyValueStore> DhtService<S> {
    /// Create a new DHT service.
    ///
    /// # Arguments
    ///
    /// * `identity` - Node keypair; its public key is the local node id
    /// * `address` - Address remote contacts reach this node at
    /// * `config` - Routing, lookup and storage parameters
    /// * `engine` - Storage engine behind the authenticated store
    /// * `transport` - Outbound RPC transport
    /// * `time_source` - Provider for current time
    pub fn new(
        identity: NodeIdentity,
        address: SocketAddr,
        config: DhtConfig,
        engine: S,
        transport: Arc<dyn RpcTransport>,
        time_source: Box<dyn TimeSource>,
    ) -> Self {
        let local = Contact::new(identity.node_id(), address);
        Self {
            routing_table: RwLock::new(RoutingTable::new(local, &config)),
            store: AuthenticatedStore::new(engine, config.record_ttl()),
            identity,
            local,
            config,
            transport,
            time_source,
        }
    }

    /// Get the current timestamp from the time source.
    pub(crate) fn now(&self) -> Timestamp {
        self.time_source.now()
    }

    /// Our own contact.
    pub fn local(&self) -> &Contact {
        &self.local
    }

    /// Our own id (the identity's public key).
    pub fn node_id(&self) -> NodeId {
        self.local.id
    }

    /// Active configuration.
    pub fn config(&self) -> &DhtConfig {
        &self.config
    }

    /// The authenticated store.
    pub fn record_store(&self) -> &AuthenticatedStore<S> {
        &self.store
    }

    /// Read access to the routing table. Drop the guard before awaiting.
    pub fn routing_table(&self) -> RwLockReadGuard<'_, RoutingTable> {
        self.routing_table.read()
    }

    /// Get routing table statistics.
    pub fn stats(&self) -> RoutingTableStats {
        self.routing_table.read().stats()
    }

    /// Fold a sighting of `contact` into the routing table.
    ///
    /// The local node is silently ignored.
    pub fn observe(&self, contact: Contact) -> Option<AddOutcome> {
        let now = self.now();
        match self.routing_table.write().add_contact(contact, now) {
            Ok(outcome) => {
                trace!(contact = %contact, ?outcome, "observed contact");
                Some(outcome)
            }
            Err(RoutingError::SelfContact) => None,
            Err(err) => {
                debug!(contact = %contact, error = %err, "failed to add contact");
                None
            }
        }
    }

    /// Drop a live member that failed a liveness check, promoting a
    /// replacement if one is cached.
    pub(crate) fn evict_unreachable(&self, id: &NodeId) {
        let now = self.now();
        if let Err(err) = self.routing_table.write().remove_stale(id, now) {
            trace!(contact = %id, error = %err, "unreachable contact was not live");
        }
    }
}
