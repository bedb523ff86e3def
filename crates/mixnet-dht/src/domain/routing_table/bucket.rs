//! K-Bucket implementation for Kademlia routing.

use crate::domain::keyed_list::OrderedKeyedList;
use crate::domain::{Contact, KeySpan, NodeId, RoutingError, Timestamp};

/// What [`KBucket::add_contact`] did with the contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Inserted as a new live member
    Added,
    /// Already a live member; refreshed and moved to the front
    MovedToFront,
    /// Bucket full; parked at the front of the replacement cache
    Cached,
}

/// A k-bucket: bounded live membership for one span of the keyspace.
///
/// Both lists are ordered by recency, front = most recently seen.
///
/// # Security (Churn Resistance)
/// A full bucket never displaces a live member to admit a newcomer. The
/// newcomer waits in the replacement cache, and only the oldest cached
/// candidate is ever evicted. Long-lived contacts are kept, so flooding the
/// node with fresh identities cannot flush the table.
#[derive(Debug, Clone)]
pub struct KBucket {
    /// Live members (max size = k)
    contacts: OrderedKeyedList<NodeId, Contact>,
    /// Overflow candidates (max size = max_replacements)
    replacements: OrderedKeyedList<NodeId, Contact>,
    /// Ids this bucket is responsible for
    span: KeySpan,
    k: usize,
    max_replacements: usize,
    /// Last time a contact was added or refreshed
    last_updated: Timestamp,
}

impl KBucket {
    /// Create an empty bucket over `span`.
    pub fn new(span: KeySpan, k: usize, max_replacements: usize) -> Self {
        Self {
            contacts: OrderedKeyedList::new(),
            replacements: OrderedKeyedList::new(),
            span,
            k,
            max_replacements,
            last_updated: Timestamp::new(0),
        }
    }

    /// The span of ids this bucket covers.
    pub fn span(&self) -> KeySpan {
        self.span
    }

    /// Get the number of live members
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    /// Check if the bucket has no live members
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Check if the live list is at capacity
    pub fn is_full(&self) -> bool {
        self.contacts.len() >= self.k
    }

    /// Number of parked replacement candidates
    pub fn replacement_count(&self) -> usize {
        self.replacements.len()
    }

    /// Live members, most recently seen first
    pub fn contacts(&self) -> impl Iterator<Item = &Contact> + '_ {
        self.contacts.iter()
    }

    /// Replacement candidates, most recently seen first
    pub fn replacements(&self) -> impl Iterator<Item = &Contact> + '_ {
        self.replacements.iter()
    }

    /// Least recently seen live member
    pub fn oldest_contact(&self) -> Option<&Contact> {
        self.contacts.back().and_then(|pos| self.contacts.value(pos))
    }

    /// Check if `id` is a live member
    pub fn contains(&self, id: &NodeId) -> bool {
        self.contacts.contains_key(id)
    }

    /// Check if `id` is parked in the replacement cache
    pub fn has_replacement(&self, id: &NodeId) -> bool {
        self.replacements.contains_key(id)
    }

    /// Live member with the given id
    pub fn get(&self, id: &NodeId) -> Option<&Contact> {
        self.contacts.get(id).and_then(|pos| self.contacts.value(pos))
    }

    /// Last time a contact was added or refreshed
    pub fn last_updated(&self) -> Timestamp {
        self.last_updated
    }

    /// Record a sighting of `contact`.
    ///
    /// A live member is refreshed: moved to the front with its address
    /// replaced by the newer one. Otherwise the contact joins the live list
    /// if there is room, or the front of the replacement cache if not. An
    /// overfull cache drops its least recently seen candidate.
    pub fn add_contact(&mut self, contact: Contact, now: Timestamp) -> AddOutcome {
        self.last_updated = now;

        if let Some(pos) = self.contacts.get(&contact.id) {
            self.contacts.move_to_front(pos);
            if let Some(existing) = self.contacts.value_mut(pos) {
                *existing = contact;
            }
            return AddOutcome::MovedToFront;
        }

        if !self.is_full() {
            if let Some(pos) = self.replacements.get(&contact.id) {
                self.replacements.remove(pos);
            }
            self.contacts.push_front(contact);
            return AddOutcome::Added;
        }

        let pos = self.replacements.push_front(contact);
        if let Some(existing) = self.replacements.value_mut(pos) {
            *existing = contact;
        }
        while self.replacements.len() > self.max_replacements {
            match self.replacements.back() {
                Some(back) => {
                    self.replacements.remove(back);
                }
                None => break,
            }
        }
        AddOutcome::Cached
    }

    /// The two halves of this bucket's span, split at the numeric midpoint.
    ///
    /// `None` for a single-point span. The caller redistributes members and
    /// decides whether this bucket is allowed to split at all.
    pub fn split(&self) -> Option<(KeySpan, KeySpan)> {
        self.span.bisect()
    }

    /// Drop a live member confirmed unreachable and promote the most
    /// recently seen replacement into the freed slot.
    ///
    /// Returns the promoted contact, if any.
    pub fn remove_stale(
        &mut self,
        id: &NodeId,
        now: Timestamp,
    ) -> Result<Option<Contact>, RoutingError> {
        let pos = self.contacts.get(id).ok_or(RoutingError::ContactNotFound)?;
        self.contacts.remove(pos);
        self.last_updated = now;

        let promoted = self
            .replacements
            .front()
            .and_then(|front| self.replacements.remove(front));
        if let Some(contact) = promoted {
            // Longest-lived members stay at the back.
            self.contacts.push_front(contact);
        }
        Ok(promoted)
    }

    /// Append a live member during redistribution, keeping caller order.
    pub(crate) fn adopt_contact(&mut self, contact: Contact) {
        self.contacts.push_back(contact);
    }

    /// Append a replacement during redistribution, keeping caller order.
    pub(crate) fn adopt_replacement(&mut self, contact: Contact) {
        self.replacements.push_back(contact);
    }

    pub(crate) fn set_last_updated(&mut self, at: Timestamp) {
        self.last_updated = at;
    }

    /// Live members and replacements, each front to back.
    pub(crate) fn into_parts(self) -> (Vec<Contact>, Vec<Contact>) {
        (self.contacts.into_values(), self.replacements.into_values())
    }
}
