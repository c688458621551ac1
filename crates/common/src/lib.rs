pub mod crypto;
/**
 * Internal wrapper around IPLD, renamed to
 *  something a little more down-to-earth.
 * Handles deriving and parsing content identifiers
 *  and DAG-CBOR block encoding for linked data.
 */
pub mod linked_data;
/**
 * Mutable pointer layer: keypair-derived names and
 *  monotonically sequenced signed records binding a
 *  name to a content identifier.
 */
pub mod pointer;
/**
 * Registry ledger client: ownership, aliasing, and
 *  key-locator bookkeeping against an external
 *  append-only ledger.
 */
pub mod registry;
/**
 * Resolver: classifies an incoming identifier and
 *  resolves it to a verified content identifier.
 */
pub mod resolver;
/**
 * Content store client: immutable, content-addressed
 *  blob storage behind a provider trait.
 */
pub mod store;
/**
 * Key recovery vault: wallet-signature-derived
 *  encryption of a pointer's signing key.
 */
pub mod vault;
/**
 * External wallet signer interface.
 */
pub mod wallet;

pub mod testkit;

pub mod prelude {
    pub use crate::crypto::{PublicKey, Secret, SecretKey};
    pub use crate::linked_data::{BlockEncoded, Cid, Link, LinkError};
    pub use crate::pointer::{MutableRecord, PointerName, PointerProvider};
    pub use crate::registry::{PrivacyMode, RegistryEntry, RegistryProvider};
    pub use crate::resolver::{Identifier, Resolved, Resolver};
    pub use crate::store::ContentStore;
    pub use crate::vault::KeyVault;
    pub use crate::wallet::{Address, WalletSigner};
}
