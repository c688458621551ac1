use std::fmt::{Debug, Display};

use async_trait::async_trait;

use super::name::PointerName;
use super::record::MutableRecord;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PointerError<T> {
    #[error("unhandled pointer provider error: {0}")]
    Provider(#[from] T),
    /// The name has never published a record
    #[error("no record published for {0}")]
    NotFound(PointerName),
    /// A record with a greater-or-equal sequence is already known for this
    /// name. Publishing the same sequence twice is rejected, never
    /// duplicated, which keeps publish retry-safe.
    #[error("stale sequence for {name}: have {have}, tried {tried}")]
    StaleSequence {
        name: PointerName,
        have: u64,
        tried: u64,
    },
    /// The record's signature does not verify against its name
    #[error("record signature failed verification for {0}")]
    SignatureInvalid(PointerName),
}

/// The mutable pointer network layer
///
/// Accepts signed records for broadcast/storage and serves the
/// highest-sequence record currently advertised for a name. The private
/// key never reaches this layer; records arrive already signed.
///
/// Ordering: within a single name, sequence monotonicity is the only
/// guarantee. Two devices publishing from the same base sequence race;
/// the network resolves by highest-sequence-wins and the loser is
/// silently superseded, not merged.
#[async_trait]
pub trait PointerProvider: Send + Sync + Debug + Clone + 'static {
    type Error: Display + Debug;

    /// Publish a signed record
    ///
    /// Should fail with the following errors to be considered correct:
    /// * `Err(PointerError::StaleSequence)` - a greater-or-equal sequence
    ///   is already known for this name
    /// * `Err(PointerError::SignatureInvalid)` - the record does not
    ///   verify; an unverifiable record is never stored
    async fn publish(&self, record: MutableRecord) -> Result<(), PointerError<Self::Error>>;

    /// Fetch the highest-sequence record advertised for a name
    ///
    /// Fails with `PointerError::NotFound` if the name has never
    /// published. Expiry is not checked here; the caller decides whether
    /// to tolerate staleness.
    async fn resolve_latest(
        &self,
        name: &PointerName,
    ) -> Result<MutableRecord, PointerError<Self::Error>>;
}
