use tracing::{debug, info};

use crate::domain::{Contact, DhtError, NodeId};
use crate::ports::{DhtApi, KeyValueStore};
use crate::service::DhtService;

impl<S: KeyValueStore> DhtService<S> {
    /// Join the network: add `seeds` to the routing table, then look up
    /// our own id so the neighbourhood around it gets populated.
    ///
    /// Returns the contacts closest to the local id.
    pub async fn bootstrap(&self, seeds: &[Contact]) -> Result<Vec<Contact>, DhtError> {
        for seed in seeds {
            self.observe(*seed);
        }
        let closest = self.lookup_node(self.node_id()).await?;
        info!(
            seeds = seeds.len(),
            found = closest.len(),
            contacts = self.stats().total_contacts,
            "bootstrap complete"
        );
        Ok(closest)
    }

    /// Look up a random id inside every bucket not touched within the
    /// configured refresh interval.
    ///
    /// Call from a timer task. A failed refresh is logged and skipped.
    /// Returns the number of buckets refreshed.
    pub async fn refresh_stale_buckets(&self) -> usize {
        let targets: Vec<NodeId> = {
            let table = self.routing_table.read();
            let mut rng = rand::thread_rng();
            table
                .stale_buckets(self.now(), self.config.bucket_refresh_secs)
                .iter()
                .map(|span| table.random_id_in(span, &mut rng))
                .collect()
        };

        let mut refreshed = 0;
        for target in targets {
            match self.lookup_node(target).await {
                Ok(_) => refreshed += 1,
                Err(err) => debug!(target = %target, error = %err, "bucket refresh failed"),
            }
        }
        refreshed
    }
}
