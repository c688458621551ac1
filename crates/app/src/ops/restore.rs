use std::path::PathBuf;

use clap::Args;

use common::pointer::PointerName;
use common::store::ContentStore;

use crate::op::{Op, OpContext, WalletLoadError};

/// Recover an identity's signing key from the vault onto this device
#[derive(Args, Debug, Clone)]
pub struct Restore {
    /// The identity's pointer name
    pub name: PointerName,

    /// Where to write the recovered signing key
    #[arg(short, long, default_value = "identity.pem")]
    pub key_out: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum RestoreOpError {
    #[error("wallet error: {0}")]
    Wallet(#[from] WalletLoadError),
    #[error("recovery failed: {0}")]
    Failed(String),
}

#[async_trait::async_trait]
impl Op for Restore {
    type Error = RestoreOpError;
    type Output = String;

    async fn execute<C: ContentStore>(
        &self,
        ctx: &OpContext<C>,
    ) -> Result<Self::Output, Self::Error> {
        let wallet = ctx.wallet()?;
        let secret = ctx
            .state()
            .service()
            .recover(&self.name, &wallet)
            .await
            .map_err(|e| RestoreOpError::Failed(e.to_string()))?;

        crate::op::write_key(&self.key_out, &secret)?;
        Ok(format!(
            "Recovered key for {}\n  key written to: {}",
            self.name,
            self.key_out.display(),
        ))
    }
}
