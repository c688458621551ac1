use std::fmt::Display;
use std::path::PathBuf;

use common::crypto::SecretKey;
use common::store::ContentStore;
use common::wallet::LocalWalletSigner;
use service::State;

/// Generates the CLI command enum and its dispatching `Op` impl from a
/// list of `(Variant, OpType)` pairs
#[macro_export]
macro_rules! command_enum {
    ($(($variant:ident, $type:ty),)*) => {
        #[derive(Debug, Clone, clap::Subcommand)]
        pub enum Command {
            $($variant($type),)*
        }

        #[async_trait::async_trait]
        impl $crate::op::Op for Command {
            type Error = $crate::op::OpError;
            type Output = String;

            async fn execute<C: common::store::ContentStore>(
                &self,
                ctx: &$crate::op::OpContext<C>,
            ) -> Result<Self::Output, Self::Error> {
                match self {
                    $(Self::$variant(op) => op
                        .execute(ctx)
                        .await
                        .map(|output| output.to_string())
                        .map_err(|e| $crate::op::OpError(e.to_string())),)*
                }
            }
        }
    };
}

/// Uniform error surfaced by the generated command dispatch
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct OpError(pub String);

#[derive(Debug, thiserror::Error)]
pub enum WalletLoadError {
    #[error("failed to access wallet key file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid wallet key file: {0}")]
    Key(String),
}

/// Everything an op needs to run
#[derive(Debug, Clone)]
pub struct OpContext<C: ContentStore> {
    state: State<C>,
    wallet_path: PathBuf,
}

impl<C: ContentStore> OpContext<C> {
    pub fn new(state: State<C>, wallet_path: PathBuf) -> Self {
        Self { state, wallet_path }
    }

    pub fn state(&self) -> &State<C> {
        &self.state
    }

    /// Load the wallet signing key, generating one on first use
    pub fn wallet(&self) -> Result<LocalWalletSigner, WalletLoadError> {
        if self.wallet_path.exists() {
            let pem = std::fs::read_to_string(&self.wallet_path)?;
            let secret =
                SecretKey::from_pem(&pem).map_err(|e| WalletLoadError::Key(e.to_string()))?;
            return Ok(LocalWalletSigner::new(secret));
        }

        let secret = SecretKey::generate();
        if let Some(parent) = self.wallet_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.wallet_path, secret.to_pem())?;
        tracing::info!(path = %self.wallet_path.display(), "generated new wallet key");
        Ok(LocalWalletSigner::new(secret))
    }
}

#[async_trait::async_trait]
pub trait Op {
    type Error: std::error::Error + Send + Sync + 'static;
    type Output: Display + Send;

    async fn execute<C: ContentStore>(
        &self,
        ctx: &OpContext<C>,
    ) -> Result<Self::Output, Self::Error>;
}

/// Read a signing key from a PEM file
pub fn load_key(path: &PathBuf) -> Result<SecretKey, WalletLoadError> {
    let pem = std::fs::read_to_string(path)?;
    SecretKey::from_pem(&pem).map_err(|e| WalletLoadError::Key(e.to_string()))
}

/// Write a signing key to a PEM file, creating parent directories
pub fn write_key(path: &PathBuf, secret: &SecretKey) -> Result<(), WalletLoadError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, secret.to_pem())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::wallet::WalletSigner;
    use service::Config;

    #[test]
    fn test_wallet_generated_once_then_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallet.pem");
        let ctx = OpContext::new(State::from_config(&Config::default()), path);

        let first = ctx.wallet().unwrap();
        let second = ctx.wallet().unwrap();
        assert_eq!(first.address(), second.address());
    }

    #[test]
    fn test_key_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("identity.pem");
        let secret = SecretKey::generate();

        write_key(&path, &secret).unwrap();
        let loaded = load_key(&path).unwrap();
        assert_eq!(loaded.to_bytes(), secret.to_bytes());
    }
}
