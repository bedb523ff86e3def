//! Core Domain Entities for the DHT
//!
//! Identifiers, contacts and timestamps shared by every other module.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::SocketAddr;
use std::time::Duration;

use primitive_types::U256;

use crate::domain::keyed_list::Keyed;
use crate::domain::Distance;

/// Width of an identifier in bytes.
pub const NODE_ID_LEN: usize = 32;

/// 256-bit keyspace identifier.
///
/// Used both as a node's position in the keyspace and as the address of a
/// stored record (the signer's ed25519 public key). Ordering is by raw
/// big-endian byte value; closeness is measured with [`NodeId::distance`].
///
/// # Security
///
/// Equality is constant-time. Standard `PartialEq` for byte arrays
/// short-circuits on the first difference, which leaks where two ids
/// diverge through timing.
// SAFETY: derived_hash_with_manual_eq is intentionally allowed here.
// Equal ids have equal bytes, so hashing the bytes stays consistent.
#[allow(clippy::derived_hash_with_manual_eq)]
#[derive(Clone, Copy, Hash)]
pub struct NodeId(pub [u8; NODE_ID_LEN]);

impl PartialEq for NodeId {
    /// Constant-time comparison.
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        let mut result = 0u8;
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            result |= a ^ b;
        }
        result == 0
    }
}

impl Eq for NodeId {}

impl PartialOrd for NodeId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NodeId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl NodeId {
    /// Create a NodeId from a raw 32-byte array.
    pub const fn new(bytes: [u8; NODE_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Create a NodeId from a slice, `None` unless it is exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let array: [u8; NODE_ID_LEN] = bytes.try_into().ok()?;
        Some(Self(array))
    }

    /// Build the id whose big-endian value is `value`.
    pub fn from_u256(value: U256) -> Self {
        let mut bytes = [0u8; NODE_ID_LEN];
        value.to_big_endian(&mut bytes);
        Self(bytes)
    }

    /// Interpret the id as an unsigned 256-bit integer.
    pub fn to_u256(&self) -> U256 {
        U256::from_big_endian(&self.0)
    }

    /// Get the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; NODE_ID_LEN] {
        &self.0
    }

    /// The all-zero id.
    pub const fn zero() -> Self {
        Self([0u8; NODE_ID_LEN])
    }

    /// XOR distance to another id.
    pub fn distance(&self, other: &NodeId) -> Distance {
        Distance::between(self, other)
    }

    /// Parse a 64 character hex string.
    pub fn from_hex(s: &str) -> Option<Self> {
        let bytes = hex::decode(s).ok()?;
        Self::from_slice(&bytes)
    }

    /// Full lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; NODE_ID_LEN]> for NodeId {
    fn from(bytes: [u8; NODE_ID_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for NodeId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.to_hex())
    }
}

impl fmt::Display for NodeId {
    /// Abbreviated form used in log lines.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..8]))
    }
}

/// A known participant: its keyspace id and where to reach it.
///
/// Equality and hashing use `id` only. Two contacts with the same id and
/// different addresses are the same logical contact.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    /// Keyspace position of the participant.
    pub id: NodeId,
    /// Network address (host + port).
    pub address: SocketAddr,
}

impl Contact {
    /// Create a new contact.
    pub fn new(id: NodeId, address: SocketAddr) -> Self {
        Self { id, address }
    }
}

impl PartialEq for Contact {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Contact {}

impl Hash for Contact {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Keyed<NodeId> for Contact {
    fn key(&self) -> NodeId {
        self.id
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.address)
    }
}

/// Unix timestamp in seconds
///
/// # Security
///
/// Timestamps are clamped to a reasonable maximum to prevent overflow
/// in age computations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Maximum reasonable timestamp (year 9999).
    pub const MAX_REASONABLE: u64 = 253_402_300_799;

    /// Create a new timestamp, clamping to MAX_REASONABLE.
    pub fn new(secs: u64) -> Self {
        Self(secs.min(Self::MAX_REASONABLE))
    }

    /// Get the underlying seconds value.
    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Add seconds to timestamp (saturating at MAX_REASONABLE).
    pub fn add_secs(&self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs).min(Self::MAX_REASONABLE))
    }

    /// Add `ttl`, rounding a partial second up so a short TTL never
    /// expires on the spot.
    pub fn add_ttl(&self, ttl: Duration) -> Self {
        let secs = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
        self.add_secs(secs)
    }

    /// Subtract seconds from timestamp (saturating at 0).
    pub fn sub_secs(&self, secs: u64) -> Self {
        Self(self.0.saturating_sub(secs))
    }

    /// Seconds elapsed since `earlier`, zero if `earlier` is in the future.
    pub fn secs_since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}
