use async_trait::async_trait;
use tracing::debug;

use crate::domain::{
    Contact, DhtError, DhtRequest, DhtResponse, FindValueOutcome, NodeId, StoreError,
};
use crate::ports::{DhtApi, KeyValueStore};
use crate::service::lookup::LookupGoal;
use crate::service::DhtService;

impl<S: KeyValueStore> DhtService<S> {
    /// Sign `payload` with this node's identity and store it under the
    /// local node id.
    pub fn publish(&self, payload: &[u8]) -> Result<(), DhtError> {
        let value = self.identity.sign_record(payload);
        self.store.store(self.local.id.as_bytes(), &value)?;
        Ok(())
    }

    /// Answer an inbound RPC from `from`.
    ///
    /// The sender is folded into the routing table before the request is
    /// served, so every inbound request doubles as a sighting.
    pub fn handle_request(&self, from: Contact, request: DhtRequest) -> DhtResponse {
        self.observe(from);
        let kind = request.kind();

        let response = match request {
            DhtRequest::Ping => DhtResponse::Pong,
            DhtRequest::Store { key, value } => match self.store.store(&key, &value) {
                Ok(()) => DhtResponse::Stored,
                Err(err) => DhtResponse::Rejected(err.to_string()),
            },
            DhtRequest::FindNode { target } => {
                DhtResponse::Nodes(self.closest_excluding(&target, &from.id))
            }
            DhtRequest::FindValue { key } => match self.store.retrieve(key.as_bytes()) {
                Ok(value) => DhtResponse::Value(value),
                Err(StoreError::NotFound) => {
                    DhtResponse::Nodes(self.closest_excluding(&key, &from.id))
                }
                Err(err) => DhtResponse::Rejected(err.to_string()),
            },
        };

        debug!(from = %from, kind, "served request");
        response
    }

    /// Up to k closest live contacts to `target`, leaving out `skip`.
    fn closest_excluding(&self, target: &NodeId, skip: &NodeId) -> Vec<Contact> {
        let k = self.config.k;
        let mut closest = self.routing_table.read().closest_to(target, k + 1);
        closest.retain(|c| c.id != *skip);
        closest.truncate(k);
        closest
    }
}

#[async_trait]
impl<S: KeyValueStore> DhtApi for DhtService<S> {
    async fn ping(&self, contact: Contact) -> Result<(), DhtError> {
        match self.query(contact, DhtRequest::Ping).await {
            Ok(DhtResponse::Pong) => {
                self.observe(contact);
                Ok(())
            }
            Ok(_) => Err(DhtError::UnexpectedResponse),
            Err(err) => {
                debug!(contact = %contact, error = %err, "ping failed");
                self.evict_unreachable(&contact.id);
                Err(err)
            }
        }
    }

    fn store(&self, key: &[u8], value: &[u8]) -> Result<(), DhtError> {
        self.store.store(key, value)?;
        Ok(())
    }

    fn find_value(&self, key: &NodeId) -> Result<FindValueOutcome, DhtError> {
        match self.store.retrieve(key.as_bytes()) {
            Ok(value) => Ok(FindValueOutcome::Value(value)),
            Err(StoreError::NotFound) => Ok(FindValueOutcome::Nodes(self.find_node(key))),
            Err(err) => Err(err.into()),
        }
    }

    fn find_node(&self, target: &NodeId) -> Vec<Contact> {
        self.routing_table.read().closest_to(target, self.config.k)
    }

    async fn lookup_node(&self, target: NodeId) -> Result<Vec<Contact>, DhtError> {
        Ok(self.iterative_lookup(target, LookupGoal::Nodes).await?.closest)
    }

    async fn lookup_value(&self, key: NodeId) -> Result<FindValueOutcome, DhtError> {
        if let Ok(value) = self.store.retrieve(key.as_bytes()) {
            return Ok(FindValueOutcome::Value(value));
        }
        let result = self.iterative_lookup(key, LookupGoal::Value).await?;
        Ok(match result.value {
            Some(value) => FindValueOutcome::Value(value),
            None => FindValueOutcome::Nodes(result.closest),
        })
    }
}
