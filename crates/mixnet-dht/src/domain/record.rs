//! Signed DHT records
//!
//! A record is stored under the signer's public key and carries a detached
//! ed25519 signature over its payload: `value = payload || signature`.
//!
//! # Security (Unauthenticated Write Defense)
//! Only the holder of the private key for `key` can produce a value that
//! [`SignedRecord::verify`] accepts, so a node cannot overwrite another
//! node's record.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};

use crate::domain::{StoreError, KEY_SIZE, MAX_VALUE_SIZE, SIGNATURE_SIZE};

/// A structurally valid `payload || signature` record, borrowed from the
/// caller's buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedRecord<'a> {
    key: &'a [u8; KEY_SIZE],
    payload: &'a [u8],
    signature: &'a [u8; SIGNATURE_SIZE],
}

impl<'a> SignedRecord<'a> {
    /// Run the structural checks in order: value too large, value too
    /// small, key wrong size. The first failure is reported.
    pub fn parse(key: &'a [u8], value: &'a [u8]) -> Result<Self, StoreError> {
        if value.len() > MAX_VALUE_SIZE {
            return Err(StoreError::ValueTooLarge {
                size: value.len(),
                max: MAX_VALUE_SIZE,
            });
        }
        if value.len() < SIGNATURE_SIZE {
            return Err(StoreError::ValueTooSmall {
                size: value.len(),
                min: SIGNATURE_SIZE,
            });
        }
        let key: &[u8; KEY_SIZE] = key.try_into().map_err(|_| StoreError::KeyWrongSize {
            size: key.len(),
            expected: KEY_SIZE,
        })?;

        let (payload, signature) = value.split_at(value.len() - SIGNATURE_SIZE);
        let signature: &[u8; SIGNATURE_SIZE] = signature
            .try_into()
            .map_err(|_| StoreError::ValueTooSmall {
                size: value.len(),
                min: SIGNATURE_SIZE,
            })?;

        Ok(Self {
            key,
            payload,
            signature,
        })
    }

    /// Public key the record is stored under.
    pub fn key(&self) -> &'a [u8; KEY_SIZE] {
        self.key
    }

    /// Signed payload (may be empty).
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// Detached signature over the payload.
    pub fn signature(&self) -> &'a [u8; SIGNATURE_SIZE] {
        self.signature
    }

    /// Verify the signature over the payload with the key as public key.
    ///
    /// A key that is not a valid curve point fails the same way as a bad
    /// signature.
    pub fn verify(&self) -> Result<(), StoreError> {
        let verifying_key =
            VerifyingKey::from_bytes(self.key).map_err(|_| StoreError::SignatureInvalid)?;
        let signature = Signature::from_bytes(self.signature);
        verifying_key
            .verify(self.payload, &signature)
            .map_err(|_| StoreError::SignatureInvalid)
    }
}
