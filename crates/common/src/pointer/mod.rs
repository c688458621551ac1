//! # Mutable Pointer
//!
//! A mutable pointer gives an immutable, content-addressed document a
//! single long-lived identity. It is a signing keypair whose public half
//! deterministically derives a stable [`PointerName`], plus a chain of
//! signed [`MutableRecord`]s binding `{name, sequence, pointed link,
//! expiry}`.
//!
//! ## Versioning
//!
//! Each publish creates a new record with `sequence` incremented by one;
//! records are never edited in place and never deleted, only superseded.
//! The network layer reconciles concurrent writers by
//! highest-sequence-wins: a record with a sequence less than or equal to
//! one already known for the same name is never accepted (last writer
//! wins, no merging).
//!
//! ## Lifecycle
//!
//! `Unpublished → Published(seq=0) → Published(seq=1) → …` — monotonic,
//! no terminal state. A retired identity simply stops being republished;
//! the registry's `active` flag is the explicit retirement signal, this
//! layer has no notion of deletion.

mod memory;
mod name;
mod provider;
mod record;

pub use memory::{MemoryPointerProvider, MemoryPointerProviderError};
pub use name::{PointerName, PointerNameError, POINTER_NAME_PREFIX};
pub use provider::{PointerError, PointerProvider};
pub use record::{MutableRecord, RecordError};

use crate::crypto::SecretKey;

/// Create a new mutable pointer identity
///
/// Generates a fresh signing keypair and derives the stable name from its
/// public half. Requires no registry or network round trip, so an identity
/// exists the moment this returns.
pub fn create() -> (PointerName, SecretKey) {
    let secret = SecretKey::generate();
    let name = PointerName::from_public_key(&secret.public());
    (name, secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_derives_name_from_key() {
        let (name, secret) = create();
        assert_eq!(name, PointerName::from_public_key(&secret.public()));
        assert_eq!(name.public_key().unwrap(), secret.public());
    }

    #[test]
    fn test_create_names_are_unique() {
        let (a, _) = create();
        let (b, _) = create();
        assert_ne!(a, b);
    }
}
