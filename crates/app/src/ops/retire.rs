use clap::Args;

use common::pointer::PointerName;
use common::store::ContentStore;

use crate::op::{Op, OpContext, WalletLoadError};

/// Retire an identity (soft delete); `--undo` reactivates it
#[derive(Args, Debug, Clone)]
pub struct Retire {
    /// The identity's pointer name
    pub name: PointerName,

    /// Reactivate a previously retired identity
    #[arg(long)]
    pub undo: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum RetireOpError {
    #[error("wallet error: {0}")]
    Wallet(#[from] WalletLoadError),
    #[error("retire failed: {0}")]
    Failed(String),
}

#[async_trait::async_trait]
impl Op for Retire {
    type Error = RetireOpError;
    type Output = String;

    async fn execute<C: ContentStore>(
        &self,
        ctx: &OpContext<C>,
    ) -> Result<Self::Output, Self::Error> {
        let wallet = ctx.wallet()?;
        ctx.state()
            .service()
            .set_active(&wallet, &self.name, self.undo)
            .await
            .map_err(|e| RetireOpError::Failed(e.to_string()))?;

        Ok(if self.undo {
            format!("Reactivated {}", self.name)
        } else {
            format!("Retired {} (entry remains queryable)", self.name)
        })
    }
}
