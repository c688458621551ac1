use clap::Args;

use common::pointer::PointerName;
use common::registry::RegistryProvider;
use common::store::ContentStore;

use crate::op::{Op, OpContext, OpError, WalletLoadError};

crate::command_enum! {
    (Bind, Bind),
    (Release, Release),
}

pub type DomainCommand = Command;

/// Manage an identity's custom domain
#[derive(Args, Debug, Clone)]
pub struct Domain {
    #[command(subcommand)]
    pub command: DomainCommand,
}

#[async_trait::async_trait]
impl Op for Domain {
    type Error = OpError;
    type Output = String;

    async fn execute<C: ContentStore>(
        &self,
        ctx: &OpContext<C>,
    ) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

/// Bind a human-readable domain to an identity
#[derive(Args, Debug, Clone)]
pub struct Bind {
    /// The identity's pointer name
    pub name: PointerName,

    /// The domain to bind, e.g. "feedback"
    pub domain: String,

    /// Fee to offer; defaults to the registry's configured fee
    #[arg(long)]
    pub fee: Option<u64>,
}

#[derive(Debug, thiserror::Error)]
pub enum DomainOpError {
    #[error("wallet error: {0}")]
    Wallet(#[from] WalletLoadError),
    #[error("domain operation failed: {0}")]
    Failed(String),
}

#[async_trait::async_trait]
impl Op for Bind {
    type Error = DomainOpError;
    type Output = String;

    async fn execute<C: ContentStore>(
        &self,
        ctx: &OpContext<C>,
    ) -> Result<Self::Output, Self::Error> {
        let wallet = ctx.wallet()?;
        let service = ctx.state().service();
        let fee = self.fee.unwrap_or_else(|| service.registry().domain_fee());

        service
            .bind_domain(&wallet, &self.name, &self.domain, fee)
            .await
            .map_err(|e| DomainOpError::Failed(e.to_string()))?;

        Ok(format!("Bound domain '{}' to {}", self.domain, self.name))
    }
}

/// Release an identity's domain, freeing it for others
#[derive(Args, Debug, Clone)]
pub struct Release {
    /// The identity's pointer name
    pub name: PointerName,
}

#[async_trait::async_trait]
impl Op for Release {
    type Error = DomainOpError;
    type Output = String;

    async fn execute<C: ContentStore>(
        &self,
        ctx: &OpContext<C>,
    ) -> Result<Self::Output, Self::Error> {
        let wallet = ctx.wallet()?;
        ctx.state()
            .service()
            .release_domain(&wallet, &self.name)
            .await
            .map_err(|e| DomainOpError::Failed(e.to_string()))?;

        Ok(format!("Released domain for {}", self.name))
    }
}
