//! # Driving Ports (Inbound API)
//!
//! These are the public APIs this crate exposes to the application node.

use async_trait::async_trait;

use crate::domain::{Contact, DhtError, FindValueOutcome, NodeId};

/// Primary API for interacting with the DHT.
///
/// Local queries (`find_node`, `find_value`) answer from this node's own
/// state. The `lookup_*` methods walk the network through the RPC
/// transport.
///
/// # Example
///
/// ```rust,ignore
/// use mixnet_dht::ports::DhtApi;
///
/// async fn locate<T: DhtApi>(api: &T, target: NodeId) {
///     let closest = api.lookup_node(target).await?;
///     println!("Found {} contacts", closest.len());
/// }
/// ```
#[async_trait]
pub trait DhtApi: Send + Sync {
    /// Liveness check. On a reply the contact is added to the routing
    /// table.
    async fn ping(&self, contact: Contact) -> Result<(), DhtError>;

    /// Validate and store a signed record (`value = payload || signature`)
    /// under the signer's public key.
    ///
    /// # Security (Unauthenticated Write Defense)
    ///
    /// Checks run in a fixed order and the first failure is reported:
    /// value too large, value too small, key wrong size, signature invalid.
    fn store(&self, key: &[u8], value: &[u8]) -> Result<(), DhtError>;

    /// The locally stored record for `key`, or the closest known contacts
    /// so the caller can continue the search elsewhere.
    fn find_value(&self, key: &NodeId) -> Result<FindValueOutcome, DhtError>;

    /// Up to k locally known contacts closest to `target`, nearest first.
    fn find_node(&self, target: &NodeId) -> Vec<Contact>;

    /// Iterative network lookup for the k contacts closest to `target`.
    ///
    /// Converges in a bounded number of rounds, never returns duplicates,
    /// and returns at most k contacts sorted by ascending distance.
    async fn lookup_node(&self, target: NodeId) -> Result<Vec<Contact>, DhtError>;

    /// Iterative network lookup for a record. Values that fail signature
    /// verification are ignored.
    async fn lookup_value(&self, key: NodeId) -> Result<FindValueOutcome, DhtError>;
}
