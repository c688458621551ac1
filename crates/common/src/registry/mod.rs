//! # Registry Client
//!
//! Client types for the on-chain registry ledger: the append-only,
//! ownership-authorized store of identity metadata and domain bindings.
//! The ledger itself is an external collaborator; this module defines the
//! entry shapes, the provider trait its clients implement, and an
//! in-memory ledger for local mode and tests.
//!
//! Every mutating call is authorization-checked against the ledger's
//! notion of ownership: the `owner` argument is the authenticated caller,
//! and a deployed provider signs each write with that owner's own
//! credential, never a shared service credential. Anonymous submission
//! paths affect only an entry's [`PrivacyMode`], not write authorization.

mod memory;
mod provider;

pub use memory::{MemoryRegistryProvider, MemoryRegistryProviderError};
pub use provider::{RegistryError, RegistryProvider};

use serde::{Deserialize, Serialize};

use crate::linked_data::{BlockEncoded, Link};
use crate::pointer::PointerName;
use crate::wallet::Address;

/// Whether an identity discloses its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrivacyMode {
    /// Responses are attributable to the owner's address
    Identified,
    /// Submissions are accepted unauthenticated by design
    Anonymous,
}

/// A registry ledger entry for one identity
///
/// Owned exclusively by `owner` and mutated only via owner-authorized
/// transactions. `active = false` is a soft delete: the entry and its
/// history stay queryable, but the identity is considered retired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub owner: Address,
    pub name: PointerName,
    /// Locator of the encrypted key blob in the content store, recorded
    /// once the vault backup completes and replaced on rotation
    pub encrypted_key_locator: Option<Link>,
    pub privacy: PrivacyMode,
    pub active: bool,
    /// Human-readable alias bound to this identity, if any. Logically a
    /// separate namespace with a global uniqueness invariant: at most one
    /// active binding per domain string.
    pub custom_domain: Option<String>,
    /// Unix seconds at registration time
    pub created_at: i64,
}

impl BlockEncoded for RegistryEntry {}
