//! External wallet signer interface
//!
//! The wallet is an external collaborator: it exposes an address and a
//! `sign(message) -> signature` call and nothing else. The recovery vault
//! requires signatures to be deterministic for identical messages under
//! the same key, so the same wallet always re-derives the same vault key
//! with no prior state.

use std::fmt::{self, Display};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::crypto::SecretKey;

#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// The signer is unreachable or the user declined to sign. Wallet
    /// interaction is bounded by human response time, so callers should
    /// apply their own timeout.
    #[error("wallet signer unavailable: {0}")]
    Unavailable(String),
    #[error("wallet error: {0}")]
    Default(#[from] anyhow::Error),
}

/// An owner's wallet address
///
/// Opaque to this system beyond equality: it identifies the owner on the
/// registry ledger and keys the vault derivation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    pub fn new(text: impl Into<String>) -> Self {
        Address(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// External signer exposing `sign(message) -> signature` and `address()`
///
/// Signatures over identical messages must be deterministic; the vault's
/// re-derivation depends on it. The raw message is the only thing that
/// ever crosses this boundary.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// The wallet's address
    fn address(&self) -> Address;

    /// Sign a message, returning the detached signature bytes
    async fn sign(&self, message: &[u8]) -> Result<Vec<u8>, WalletError>;
}

/// Ed25519-backed wallet signer for local mode and tests
///
/// Ed25519 signatures are deterministic by construction, satisfying the
/// vault's requirement.
#[derive(Debug, Clone)]
pub struct LocalWalletSigner {
    secret: SecretKey,
}

impl LocalWalletSigner {
    pub fn new(secret: SecretKey) -> Self {
        Self { secret }
    }

    pub fn generate() -> Self {
        Self::new(SecretKey::generate())
    }
}

#[async_trait]
impl WalletSigner for LocalWalletSigner {
    fn address(&self) -> Address {
        Address(format!("0x{}", self.secret.public().to_hex()))
    }

    async fn sign(&self, message: &[u8]) -> Result<Vec<u8>, WalletError> {
        Ok(self.secret.sign(message).to_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_signer_is_deterministic() {
        let signer = LocalWalletSigner::generate();
        let message = b"formid-key-vault:v1:fp1abc";

        let first = signer.sign(message).await.unwrap();
        let second = signer.sign(message).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_different_wallets_sign_differently() {
        let a = LocalWalletSigner::generate();
        let b = LocalWalletSigner::generate();
        let message = b"formid-key-vault:v1:fp1abc";

        assert_ne!(a.address(), b.address());
        assert_ne!(
            a.sign(message).await.unwrap(),
            b.sign(message).await.unwrap()
        );
    }
}
