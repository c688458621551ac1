use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::crypto::{SecretKey, Signature};
use crate::linked_data::{BlockEncoded, Link};

use super::name::{PointerName, PointerNameError};

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("pointer name error: {0}")]
    Name(#[from] PointerNameError),
    #[error("canonical encoding error: {0}")]
    Encoding(String),
    /// The signature does not verify against the name's public key.
    /// Never tolerated: an unverifiable record is never authoritative.
    #[error("record signature failed verification")]
    SignatureInvalid,
    #[error("signing key does not derive pointer name {0}")]
    KeyMismatch(PointerName),
}

/// The canonical signed payload of a record.
///
/// Field order is fixed by declaration order and encoded as DAG-CBOR;
/// signatures are computed over exactly these bytes, so this struct must
/// never be reordered or extended in place.
#[derive(Serialize)]
struct RecordPayload<'a> {
    name: &'a PointerName,
    sequence: u64,
    pointed: &'a Link,
    expires_at: i64,
}

/// A signed record binding a pointer name to a content identifier
///
/// Records form a monotonic chain per name: the first publish carries
/// `sequence = 0` and every update increments it by one. A record is only
/// authoritative if its signature verifies against the name's public key
/// and its sequence is strictly greater than any previously observed for
/// that name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutableRecord {
    name: PointerName,
    sequence: u64,
    pointed: Link,
    /// Unix seconds after which the record is considered stale
    expires_at: i64,
    signature: Signature,
}

impl BlockEncoded for MutableRecord {}

impl MutableRecord {
    /// Build and sign a record
    ///
    /// The name is derived from the signing key's public half; `expires_at`
    /// is `now + ttl`.
    pub fn sign(
        secret: &SecretKey,
        pointed: Link,
        sequence: u64,
        ttl: Duration,
    ) -> Result<Self, RecordError> {
        let name = PointerName::from_public_key(&secret.public());
        let expires_at = (OffsetDateTime::now_utc() + ttl).unix_timestamp();

        let payload = Self::payload_bytes(&name, sequence, &pointed, expires_at)?;
        let signature = secret.sign(&payload);

        Ok(MutableRecord {
            name,
            sequence,
            pointed,
            expires_at,
            signature,
        })
    }

    /// Build and sign the successor record, `sequence + 1`
    ///
    /// # Errors
    ///
    /// Fails with [`RecordError::KeyMismatch`] if the signing key does not
    /// derive this record's name.
    pub fn next(
        &self,
        secret: &SecretKey,
        pointed: Link,
        ttl: Duration,
    ) -> Result<Self, RecordError> {
        if PointerName::from_public_key(&secret.public()) != self.name {
            return Err(RecordError::KeyMismatch(self.name.clone()));
        }
        Self::sign(secret, pointed, self.sequence + 1, ttl)
    }

    /// Verify the record's signature against its name's public key
    ///
    /// # Errors
    ///
    /// Fails with [`RecordError::SignatureInvalid`] if verification fails;
    /// callers must never treat such a record as authoritative.
    pub fn verify(&self) -> Result<(), RecordError> {
        let public_key = self.name.public_key()?;
        let payload =
            Self::payload_bytes(&self.name, self.sequence, &self.pointed, self.expires_at)?;
        public_key
            .verify(&payload, &self.signature)
            .map_err(|_| RecordError::SignatureInvalid)
    }

    /// Check expiry against an explicit instant
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        now.unix_timestamp() > self.expires_at
    }

    /// Check expiry against the current wall clock
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(OffsetDateTime::now_utc())
    }

    fn payload_bytes(
        name: &PointerName,
        sequence: u64,
        pointed: &Link,
        expires_at: i64,
    ) -> Result<Vec<u8>, RecordError> {
        let payload = RecordPayload {
            name,
            sequence,
            pointed,
            expires_at,
        };
        serde_ipld_dagcbor::to_vec(&payload).map_err(|e| RecordError::Encoding(e.to_string()))
    }

    pub fn name(&self) -> &PointerName {
        &self.name
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn pointed(&self) -> &Link {
        &self.pointed
    }

    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    #[cfg(test)]
    pub(crate) fn with_tampered_pointed(mut self, pointed: Link) -> Self {
        self.pointed = pointed;
        self
    }

    #[cfg(test)]
    pub(crate) fn with_tampered_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    #[cfg(test)]
    pub(crate) fn with_tampered_expiry(mut self, expires_at: i64) -> Self {
        self.expires_at = expires_at;
        self
    }
}
