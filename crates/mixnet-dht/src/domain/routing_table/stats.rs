//! Routing table statistics.

/// Statistics about the routing table state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingTableStats {
    /// Total number of live contacts in buckets
    pub total_contacts: usize,
    /// Total number of parked replacement candidates
    pub total_replacements: usize,
    /// Number of buckets the keyspace is split into
    pub bucket_count: usize,
    /// Number of buckets with at least one live contact
    pub buckets_used: usize,
}
