//! Iterative network lookup.
//!
//! Each round queries up to `alpha` of the closest not-yet-queried
//! candidates in parallel and folds the contacts they return into the
//! shortlist. When a round that got answers brings nothing closer than the
//! best live contact, the lookup widens to every unqueried contact among the
//! k closest, and stops once all of those have been queried. A contact that
//! times out or fails is dropped for the rest of the lookup.

use std::collections::HashSet;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::domain::{
    find_k_closest, xor_distance, Contact, DhtError, DhtRequest, DhtResponse, Distance, NodeId,
    SignedRecord,
};
use crate::ports::KeyValueStore;
use crate::service::DhtService;

/// What a lookup is after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LookupGoal {
    /// The k closest contacts
    Nodes,
    /// The first verifiable record
    Value,
}

/// Final state of a lookup.
#[derive(Debug, Default)]
pub(crate) struct LookupResult {
    /// Responsive or unqueried contacts, nearest first, at most k
    pub closest: Vec<Contact>,
    /// A record that passed signature verification
    pub value: Option<Vec<u8>>,
}

/// Candidate bookkeeping for one lookup.
///
/// Every discovered contact that has not failed is held, nearest first, so
/// a contact pushed past the k closest can move back in once nearer ones
/// drop out.
struct Shortlist {
    target: NodeId,
    k: usize,
    local: NodeId,
    candidates: Vec<Contact>,
    queried: HashSet<NodeId>,
    failed: HashSet<NodeId>,
}

impl Shortlist {
    fn new(target: NodeId, k: usize, local: NodeId, initial: Vec<Contact>) -> Self {
        let mut list = Self {
            target,
            k,
            local,
            candidates: Vec::new(),
            queried: HashSet::new(),
            failed: HashSet::new(),
        };
        list.merge(initial);
        list
    }

    /// Add contacts not already held, skipping ourselves and failed ones.
    fn merge(&mut self, contacts: Vec<Contact>) {
        for contact in contacts {
            if contact.id == self.local
                || self.failed.contains(&contact.id)
                || self.candidates.iter().any(|c| c.id == contact.id)
            {
                continue;
            }
            self.candidates.push(contact);
        }
        self.candidates = find_k_closest(&self.candidates, &self.target, self.candidates.len());
    }

    /// Up to `width` unqueried contacts among the k closest, marked as
    /// queried.
    fn next_candidates(&mut self, width: usize) -> Vec<Contact> {
        let picked: Vec<Contact> = self
            .candidates
            .iter()
            .take(self.k)
            .filter(|c| !self.queried.contains(&c.id))
            .take(width)
            .copied()
            .collect();
        for contact in &picked {
            self.queried.insert(contact.id);
        }
        picked
    }

    fn drop_contact(&mut self, id: &NodeId) {
        self.candidates.retain(|c| c.id != *id);
        self.failed.insert(*id);
    }

    /// Distance of the closest live contact.
    fn best_distance(&self) -> Distance {
        self.candidates
            .first()
            .map(|c| xor_distance(&c.id, &self.target))
            .unwrap_or_else(Distance::max)
    }

    fn closest(&self) -> Vec<Contact> {
        self.candidates.iter().take(self.k).copied().collect()
    }
}

impl<S: KeyValueStore> DhtService<S> {
    /// Send `request` to `contact`, bounded by the configured timeout.
    pub(crate) async fn query(
        &self,
        contact: Contact,
        request: DhtRequest,
    ) -> Result<DhtResponse, DhtError> {
        let timeout = self.config.request_timeout();
        match tokio::time::timeout(timeout, self.transport.send_request(&contact, request, timeout))
            .await
        {
            Ok(result) => result.map_err(DhtError::from),
            Err(_) => Err(DhtError::TransportTimeout),
        }
    }

    pub(crate) async fn iterative_lookup(
        &self,
        target: NodeId,
        goal: LookupGoal,
    ) -> Result<LookupResult, DhtError> {
        let initial = self.routing_table.read().closest_to(&target, self.config.k);
        let mut shortlist = Shortlist::new(target, self.config.k, self.node_id(), initial);
        let mut best = shortlist.best_distance();
        let mut finishing = false;
        let mut queried_any = false;
        let mut answered_any = false;

        for round in 1..=self.config.max_lookup_rounds {
            let width = if finishing {
                self.config.k
            } else {
                self.config.alpha.max(1)
            };
            let candidates = shortlist.next_candidates(width);
            if candidates.is_empty() {
                debug!(target = %target, round, found = shortlist.closest().len(), "lookup converged");
                break;
            }
            queried_any = true;

            let request = match goal {
                LookupGoal::Nodes => DhtRequest::FindNode { target },
                LookupGoal::Value => DhtRequest::FindValue { key: target },
            };
            let replies = join_all(candidates.into_iter().map(|contact| {
                let request = request.clone();
                async move { (contact, self.query(contact, request).await) }
            }))
            .await;

            let mut answered_this_round = false;
            for (contact, reply) in replies {
                match reply {
                    Ok(DhtResponse::Nodes(nodes)) => {
                        answered_this_round = true;
                        self.observe(contact);
                        shortlist.merge(nodes);
                    }
                    Ok(DhtResponse::Value(value)) if goal == LookupGoal::Value => {
                        if verify_record(&target, &value) {
                            self.observe(contact);
                            debug!(target = %target, from = %contact, round, "lookup found value");
                            return Ok(LookupResult {
                                closest: shortlist.closest(),
                                value: Some(value),
                            });
                        }
                        debug!(target = %target, from = %contact, "ignoring forged value");
                        shortlist.drop_contact(&contact.id);
                    }
                    Ok(other) => {
                        debug!(from = %contact, response = ?other, "unexpected lookup response");
                        shortlist.drop_contact(&contact.id);
                    }
                    Err(err) => {
                        debug!(from = %contact, error = %err, "lookup query failed");
                        shortlist.drop_contact(&contact.id);
                    }
                }
            }
            answered_any |= answered_this_round;

            // Compared against live contacts only; a dropped best no longer counts.
            let new_best = shortlist.best_distance();
            if new_best < best {
                finishing = false;
            } else if answered_this_round && !finishing {
                debug!(target = %target, round, "no closer contact, querying rest of k closest");
                finishing = true;
            }
            best = new_best;
        }

        if queried_any && !answered_any {
            warn!(target = %target, "lookup failed: every queried contact failed");
            return Err(DhtError::LookupFailed);
        }

        Ok(LookupResult {
            closest: shortlist.closest(),
            value: None,
        })
    }
}

/// Whether `value` is a record correctly signed by `key`.
fn verify_record(key: &NodeId, value: &[u8]) -> bool {
    SignedRecord::parse(key.as_bytes(), value)
        .and_then(|record| record.verify())
        .is_ok()
}
