//! Contact sorting and selection.

use std::cmp::Ordering;

use super::distance::xor_distance;
use crate::domain::{Contact, NodeId};

/// Total order on contacts relative to `target`: ascending XOR distance,
/// ties broken by the numerically smaller id.
///
/// Distinct ids never tie on distance to the same target, so the tie-break
/// only matters for duplicate entries.
pub fn compare_by_distance(a: &Contact, b: &Contact, target: &NodeId) -> Ordering {
    xor_distance(&a.id, target)
        .cmp(&xor_distance(&b.id, target))
        .then_with(|| a.id.cmp(&b.id))
}

/// Sort contacts by XOR distance from a target node (closest first).
pub fn sort_contacts_by_distance(contacts: &[Contact], target: &NodeId) -> Vec<Contact> {
    let mut sorted = contacts.to_vec();
    sorted.sort_by_cached_key(|c| (xor_distance(&c.id, target), c.id));
    sorted
}

/// Find the k closest contacts to a target from a list
///
/// # Arguments
/// * `contacts` - List of all available contacts
/// * `target` - Target NodeId to measure distance from
/// * `k` - Maximum number of contacts to return
///
/// # Returns
/// Up to k contacts sorted by distance (closest first), one per id
pub fn find_k_closest(contacts: &[Contact], target: &NodeId, k: usize) -> Vec<Contact> {
    let mut sorted = sort_contacts_by_distance(contacts, target);
    sorted.dedup_by_key(|c| c.id);
    sorted.truncate(k);
    sorted
}
