use std::path::PathBuf;

use clap::Args;

use common::store::ContentStore;

use crate::op::{Op, OpContext, WalletLoadError};

/// Re-encrypt the key backup under a fresh wrapper
#[derive(Args, Debug, Clone)]
pub struct Rotate {
    /// Path to the identity's signing key
    #[arg(short, long, default_value = "identity.pem")]
    pub key: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum RotateOpError {
    #[error("key error: {0}")]
    Key(#[from] WalletLoadError),
    #[error("rotation failed: {0}")]
    Failed(String),
}

#[async_trait::async_trait]
impl Op for Rotate {
    type Error = RotateOpError;
    type Output = String;

    async fn execute<C: ContentStore>(
        &self,
        ctx: &OpContext<C>,
    ) -> Result<Self::Output, Self::Error> {
        let wallet = ctx.wallet()?;
        let secret = crate::op::load_key(&self.key)?;

        let locator = ctx
            .state()
            .service()
            .rotate_backup(&secret, &wallet)
            .await
            .map_err(|e| RotateOpError::Failed(e.to_string()))?;

        Ok(format!("Key backup rotated\n  new locator: {}", locator))
    }
}
