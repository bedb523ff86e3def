//! Main RoutingTable implementation.

use rand::Rng;
use tracing::debug;

use crate::domain::{
    find_k_closest, Contact, DhtConfig, KeySpan, NodeId, RoutingError, Timestamp,
};

use super::bucket::{AddOutcome, KBucket};
use super::stats::RoutingTableStats;

/// The routing table: k-buckets partitioning the whole keyspace.
///
/// Buckets are kept sorted by span. Their spans cover `[0, 2^256)` with no
/// gaps and no overlaps, so every id has exactly one owning bucket.
///
/// # Splitting
/// Only the bucket whose span contains the local id may split. Every other
/// bucket saturates and falls back to its replacement cache. This is
/// enforced here rather than left to callers.
#[derive(Debug, Clone)]
pub struct RoutingTable {
    /// Our own contact (immutable after creation)
    local: Contact,
    /// Buckets sorted by span
    buckets: Vec<KBucket>,
    k: usize,
    max_replacements: usize,
}

impl RoutingTable {
    /// Create a table holding a single bucket over the full keyspace.
    pub fn new(local: Contact, config: &DhtConfig) -> Self {
        Self {
            local,
            buckets: vec![KBucket::new(
                KeySpan::full(),
                config.k,
                config.max_replacements,
            )],
            k: config.k,
            max_replacements: config.max_replacements,
        }
    }

    /// Our own contact
    pub fn local(&self) -> &Contact {
        &self.local
    }

    /// Our own id
    pub fn local_id(&self) -> &NodeId {
        &self.local.id
    }

    /// Bucket capacity
    pub fn k(&self) -> usize {
        self.k
    }

    /// All buckets, sorted by span
    pub fn buckets(&self) -> &[KBucket] {
        &self.buckets
    }

    /// Number of buckets
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Total live contacts across all buckets
    pub fn len(&self) -> usize {
        self.buckets.iter().map(KBucket::len).sum()
    }

    /// Whether the table knows no live contacts
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(KBucket::is_empty)
    }

    /// Index of the unique bucket whose span contains `id`.
    ///
    /// Binary search over the sorted spans.
    pub fn bucket_index(&self, id: &NodeId) -> usize {
        let value = id.to_u256();
        let index = self.buckets.partition_point(|b| b.span().last() < value);
        index.min(self.buckets.len().saturating_sub(1))
    }

    /// The unique bucket whose span contains `id`.
    pub fn bucket_for(&self, id: &NodeId) -> &KBucket {
        &self.buckets[self.bucket_index(id)]
    }

    /// Check if `id` is a live member
    pub fn contains(&self, id: &NodeId) -> bool {
        self.bucket_for(id).contains(id)
    }

    /// Live member with the given id
    pub fn get(&self, id: &NodeId) -> Option<Contact> {
        self.bucket_for(id).get(id).copied()
    }

    /// Record a sighting of `contact`.
    ///
    /// If the owning bucket is full and covers the local id, it splits and
    /// the add is retried once against the half that now owns the contact.
    pub fn add_contact(
        &mut self,
        contact: Contact,
        now: Timestamp,
    ) -> Result<AddOutcome, RoutingError> {
        if contact.id == self.local.id {
            return Err(RoutingError::SelfContact);
        }

        let index = self.bucket_index(&contact.id);
        let outcome = self.buckets[index].add_contact(contact, now);
        if outcome != AddOutcome::Cached || !self.may_split(index) {
            return Ok(outcome);
        }

        self.split_bucket(index)?;
        let index = self.bucket_index(&contact.id);
        Ok(self.buckets[index].add_contact(contact, now))
    }

    /// Split the bucket at `index` into two halves and redistribute its
    /// members and replacements by which half their id falls in.
    ///
    /// Recency order is preserved within each half.
    pub fn split_bucket(&mut self, index: usize) -> Result<(), RoutingError> {
        let bucket = self
            .buckets
            .get(index)
            .ok_or(RoutingError::NoSuchBucket(index))?;
        if !bucket.span().contains(&self.local.id) {
            return Err(RoutingError::SplitNotAllowed);
        }
        let (left_span, right_span) = bucket.split().ok_or(RoutingError::SpanTooNarrow)?;

        let old = self.buckets.remove(index);
        let last_updated = old.last_updated();
        let mut left = KBucket::new(left_span, self.k, self.max_replacements);
        let mut right = KBucket::new(right_span, self.k, self.max_replacements);
        left.set_last_updated(last_updated);
        right.set_last_updated(last_updated);

        let (contacts, replacements) = old.into_parts();
        for contact in contacts {
            if left_span.contains(&contact.id) {
                left.adopt_contact(contact);
            } else {
                right.adopt_contact(contact);
            }
        }
        for contact in replacements {
            if left_span.contains(&contact.id) {
                left.adopt_replacement(contact);
            } else {
                right.adopt_replacement(contact);
            }
        }

        debug!(
            left = %left_span,
            right = %right_span,
            left_contacts = left.len(),
            right_contacts = right.len(),
            buckets = self.buckets.len() + 2,
            "split k-bucket"
        );

        self.buckets.insert(index, right);
        self.buckets.insert(index, left);
        Ok(())
    }

    /// Up to `count` live contacts ordered by ascending XOR distance to
    /// `target`, ties broken by the numerically smaller id.
    ///
    /// Scans every bucket: once splits have happened, the target's own
    /// bucket need not hold the globally closest contacts.
    pub fn closest_to(&self, target: &NodeId, count: usize) -> Vec<Contact> {
        let all: Vec<Contact> = self
            .buckets
            .iter()
            .flat_map(KBucket::contacts)
            .copied()
            .collect();
        find_k_closest(&all, target, count)
    }

    /// Drop a live member confirmed unreachable, promoting the best
    /// replacement from the same bucket.
    pub fn remove_stale(
        &mut self,
        id: &NodeId,
        now: Timestamp,
    ) -> Result<Option<Contact>, RoutingError> {
        let index = self.bucket_index(id);
        let promoted = self.buckets[index].remove_stale(id, now)?;
        debug!(
            removed = %id,
            promoted = ?promoted.map(|c| c.id.to_string()),
            "evicted unreachable contact"
        );
        Ok(promoted)
    }

    /// Spans of buckets not updated within `refresh_secs`.
    pub fn stale_buckets(&self, now: Timestamp, refresh_secs: u64) -> Vec<KeySpan> {
        self.buckets
            .iter()
            .filter(|b| now.secs_since(b.last_updated()) >= refresh_secs)
            .map(KBucket::span)
            .collect()
    }

    /// A random id inside `span`, used as the target of a refresh lookup.
    pub fn random_id_in<R: Rng + ?Sized>(&self, span: &KeySpan, rng: &mut R) -> NodeId {
        span.random_id(rng)
    }

    /// Get routing table statistics
    pub fn stats(&self) -> RoutingTableStats {
        RoutingTableStats {
            total_contacts: self.len(),
            total_replacements: self.buckets.iter().map(KBucket::replacement_count).sum(),
            bucket_count: self.buckets.len(),
            buckets_used: self.buckets.iter().filter(|b| !b.is_empty()).count(),
        }
    }

    fn may_split(&self, index: usize) -> bool {
        let span = self.buckets[index].span();
        span.contains(&self.local.id) && !span.is_single_point()
    }
}
