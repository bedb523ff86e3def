//! Value Objects for the DHT
//!
//! Distances, keyspace spans and configuration.

use std::fmt;
use std::time::Duration;

use primitive_types::U256;
use rand::Rng;

use crate::domain::NodeId;

/// Size of a record key (an ed25519 public key).
pub const KEY_SIZE: usize = 32;

/// Size of the detached ed25519 signature appended to every record.
pub const SIGNATURE_SIZE: usize = 64;

/// Largest accepted record, signature included.
pub const MAX_VALUE_SIZE: usize = 4096;

/// XOR distance between two identifiers, as an unsigned 256-bit integer.
///
/// Smaller is closer. `Distance::between(a, a)` is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Distance(pub U256);

impl Distance {
    /// XOR the two ids byte by byte.
    pub fn between(a: &NodeId, b: &NodeId) -> Self {
        let mut xor = [0u8; 32];
        for (out, (x, y)) in xor.iter_mut().zip(a.as_bytes().iter().zip(b.as_bytes())) {
            *out = x ^ y;
        }
        Self(U256::from_big_endian(&xor))
    }

    /// The zero distance (an id to itself).
    pub fn zero() -> Self {
        Self(U256::zero())
    }

    /// Maximum possible distance.
    pub fn max() -> Self {
        Self(U256::MAX)
    }

    /// Whether the two ids were equal.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Underlying integer.
    pub fn as_u256(&self) -> U256 {
        self.0
    }

    /// Length of the shared id prefix in bits (256 for identical ids).
    pub fn common_prefix_len(&self) -> u32 {
        self.0.leading_zeros()
    }
}

/// A contiguous region of the keyspace owned by one k-bucket.
///
/// Conceptually the half-open range `[low, high)`. The upper bound of the
/// full keyspace is 2^256, which does not fit in 256 bits, so the span keeps
/// its last member instead: `last = high - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpan {
    low: U256,
    last: U256,
}

impl KeySpan {
    /// The whole keyspace `[0, 2^256)`.
    pub fn full() -> Self {
        Self {
            low: U256::zero(),
            last: U256::MAX,
        }
    }

    /// Span covering `low..=last`. `None` if the range is empty.
    pub fn new(low: U256, last: U256) -> Option<Self> {
        (low <= last).then_some(Self { low, last })
    }

    /// Inclusive lower bound.
    pub fn low(&self) -> U256 {
        self.low
    }

    /// Last id inside the span (`high - 1`).
    pub fn last(&self) -> U256 {
        self.last
    }

    /// Whether `id` falls inside this span.
    pub fn contains(&self, id: &NodeId) -> bool {
        let value = id.to_u256();
        self.low <= value && value <= self.last
    }

    /// A span holding a single id cannot be divided any further.
    pub fn is_single_point(&self) -> bool {
        self.low == self.last
    }

    /// Bisect at the numeric midpoint.
    ///
    /// Returns `None` for a single-point span. Both halves are non-empty
    /// and together cover exactly this span.
    pub fn bisect(&self) -> Option<(KeySpan, KeySpan)> {
        if self.is_single_point() {
            return None;
        }
        let mid = self.low + (self.last - self.low) / U256::from(2u8);
        Some((
            KeySpan {
                low: self.low,
                last: mid,
            },
            KeySpan {
                low: mid + U256::one(),
                last: self.last,
            },
        ))
    }

    /// A uniformly-ish random id inside the span.
    pub fn random_id<R: Rng + ?Sized>(&self, rng: &mut R) -> NodeId {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        let raw = U256::from_big_endian(&bytes);
        if self.low.is_zero() && self.last == U256::MAX {
            return NodeId::from_u256(raw);
        }
        // Not the full keyspace, so the width fits in 256 bits.
        let width = self.last - self.low + U256::one();
        NodeId::from_u256(self.low + raw % width)
    }
}

impl fmt::Display for KeySpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:#x}, {:#x}]", self.low, self.last)
    }
}

/// Configuration for the routing table, the record store and lookups.
///
/// Record size limits are protocol constants ([`KEY_SIZE`],
/// [`SIGNATURE_SIZE`], [`MAX_VALUE_SIZE`]) and not configurable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DhtConfig {
    /// Bucket capacity and lookup result width (default: 20)
    pub k: usize,
    /// Parallel queries per lookup round (default: 3)
    pub alpha: usize,
    /// Replacement cache capacity per bucket (default: 20)
    pub max_replacements: usize,
    /// Per-RPC timeout in milliseconds (default: 3000)
    pub request_timeout_ms: u64,
    /// Hard bound on iterative lookup rounds (default: 20)
    pub max_lookup_rounds: usize,
    /// TTL handed to the storage engine for accepted records (default: 24h)
    pub record_ttl_secs: u64,
    /// Age after which an untouched bucket is refreshed (default: 1h)
    pub bucket_refresh_secs: u64,
}

impl Default for DhtConfig {
    fn default() -> Self {
        Self {
            k: 20,
            alpha: 3,
            max_replacements: 20,
            request_timeout_ms: 3_000,
            max_lookup_rounds: 20,
            record_ttl_secs: 86_400,
            bucket_refresh_secs: 3_600,
        }
    }
}

impl DhtConfig {
    /// Create a config suitable for testing (smaller values)
    pub fn for_testing() -> Self {
        Self {
            k: 3, // Smaller buckets for easier testing
            alpha: 2,
            max_replacements: 2,
            request_timeout_ms: 100,
            max_lookup_rounds: 10,
            record_ttl_secs: 86_400,
            bucket_refresh_secs: 60,
        }
    }

    /// Per-RPC timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// TTL for accepted records.
    pub fn record_ttl(&self) -> Duration {
        Duration::from_secs(self.record_ttl_secs)
    }
}
