//! Node identity
//!
//! The node's ed25519 keypair. Its public key doubles as the node's
//! position in the keyspace and as the address of the node's own record.

use std::fmt;

use ed25519_dalek::{Signer, SigningKey};

use crate::domain::NodeId;

/// An ed25519 keypair owned by one DHT instance.
///
/// Injected into the facade at construction; there is no process-wide key.
#[derive(Clone)]
pub struct NodeIdentity {
    signing_key: SigningKey,
}

impl NodeIdentity {
    /// Generate a fresh random identity.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut rand::thread_rng()),
        }
    }

    /// Deterministic identity from a 32-byte secret seed.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    /// The node id, equal to the public key bytes.
    pub fn node_id(&self) -> NodeId {
        NodeId::new(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign `payload` and return the storable value `payload || signature`.
    pub fn sign_record(&self, payload: &[u8]) -> Vec<u8> {
        let signature = self.signing_key.sign(payload);
        let mut value = Vec::with_capacity(payload.len() + signature.to_bytes().len());
        value.extend_from_slice(payload);
        value.extend_from_slice(&signature.to_bytes());
        value
    }
}

impl fmt::Debug for NodeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the secret half.
        f.debug_struct("NodeIdentity")
            .field("node_id", &self.node_id())
            .finish()
    }
}
