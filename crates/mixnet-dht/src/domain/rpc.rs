//! DHT RPC messages
//!
//! In-memory request and response types exchanged over the
//! [`RpcTransport`](crate::ports::RpcTransport) port. Framing and
//! encryption belong to the transport.

use crate::domain::{Contact, NodeId};

/// A request sent to a remote contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DhtRequest {
    /// Liveness check
    Ping,
    /// Ask the remote to store a signed record
    Store {
        /// Signer's public key
        key: Vec<u8>,
        /// `payload || signature`
        value: Vec<u8>,
    },
    /// Ask for the remote's closest contacts to `target`
    FindNode {
        /// Id being looked up
        target: NodeId,
    },
    /// Ask for a record, or closest contacts if the remote lacks it
    FindValue {
        /// Record key
        key: NodeId,
    },
}

/// A reply from a remote contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DhtResponse {
    /// Answer to [`DhtRequest::Ping`]
    Pong,
    /// Record accepted
    Stored,
    /// Record refused, with the reason
    Rejected(String),
    /// Closest known contacts, nearest first
    Nodes(Vec<Contact>),
    /// The requested record
    Value(Vec<u8>),
}

/// Result of a value query: the record, or contacts closer to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindValueOutcome {
    /// The stored `payload || signature`
    Value(Vec<u8>),
    /// Closest known contacts, nearest first
    Nodes(Vec<Contact>),
}

impl DhtRequest {
    /// Short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::Store { .. } => "store",
            Self::FindNode { .. } => "find_node",
            Self::FindValue { .. } => "find_value",
        }
    }
}
