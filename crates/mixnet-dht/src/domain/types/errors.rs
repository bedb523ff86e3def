//! Domain Errors for the DHT
//!
//! Every failure in this crate is returned as one of these typed errors.
//! None of them is fatal to the process.

use thiserror::Error;

/// Errors from the routing table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoutingError {
    /// Attempted to add the local node to its own routing table
    #[error("cannot add local node to routing table")]
    SelfContact,

    /// Only the bucket whose span contains the local id may split
    #[error("bucket does not contain the local id and may not split")]
    SplitNotAllowed,

    /// The bucket span holds a single id
    #[error("bucket span is too narrow to split")]
    SpanTooNarrow,

    /// Contact is not a live member of the routing table
    #[error("contact not found in routing table")]
    ContactNotFound,

    /// No bucket sits at the given index
    #[error("no bucket at index {0}")]
    NoSuchBucket(usize),
}

/// Errors reported by a storage engine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KvStoreError {
    /// Key is absent or its TTL has elapsed
    #[error("key does not exist")]
    KeyMissing,

    /// Engine-level failure
    #[error("storage I/O error: {message}")]
    Io {
        /// Engine error message
        message: String,
    },
}

/// Errors from the authenticated record store.
///
/// The validation variants are terminal for the request: the caller sent
/// bad or forged input and retrying it cannot succeed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Record exceeds the maximum value size
    #[error("value too large: {size} bytes (max {max})")]
    ValueTooLarge {
        /// Size of the rejected value
        size: usize,
        /// Largest accepted size
        max: usize,
    },

    /// Record is shorter than a detached signature
    #[error("value too small: {size} bytes (min {min})")]
    ValueTooSmall {
        /// Size of the rejected value
        size: usize,
        /// Smallest accepted size
        min: usize,
    },

    /// Key is not a 32-byte public key
    #[error("key wrong size: {size} bytes (expected {expected})")]
    KeyWrongSize {
        /// Size of the rejected key
        size: usize,
        /// Required key size
        expected: usize,
    },

    /// Signature does not verify under the key
    #[error("signature invalid")]
    SignatureInvalid,

    /// No record stored under the key
    #[error("record not found")]
    NotFound,

    /// Storage engine failure, surfaced unchanged
    #[error("storage backend error: {0}")]
    Backend(KvStoreError),
}

impl StoreError {
    /// Whether this error is a rejection of the caller's input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValueTooLarge { .. }
                | Self::ValueTooSmall { .. }
                | Self::KeyWrongSize { .. }
                | Self::SignatureInvalid
        )
    }
}

/// Errors from the RPC transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// No reply within the request timeout
    #[error("request timed out")]
    Timeout,

    /// Contact could not be reached
    #[error("contact unreachable: {0}")]
    Unreachable(String),

    /// Reply could not be understood
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Errors surfaced by the DHT facade.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DhtError {
    /// Record store rejected or failed the request
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Routing table rejected the request
    #[error(transparent)]
    Routing(#[from] RoutingError),

    /// Remote contact did not answer in time
    #[error("transport timeout")]
    TransportTimeout,

    /// Remote contact could not be reached or answered garbage
    #[error("transport error: {0}")]
    Transport(String),

    /// Remote contact answered with the wrong response kind
    #[error("unexpected response")]
    UnexpectedResponse,

    /// Every queried candidate of a lookup failed
    #[error("lookup failed: no candidate answered")]
    LookupFailed,
}

impl From<TransportError> for DhtError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => Self::TransportTimeout,
            other => Self::Transport(other.to_string()),
        }
    }
}
