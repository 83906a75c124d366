//! Fund data providers.

use async_trait::async_trait;

use fundpulse_core::FundSnapshot;

use crate::error::TraitError;

/// Trait for sources of fund identity, yields and holdings.
#[async_trait]
pub trait FundSource: Send + Sync {
    /// Short name of the provider, for logs.
    fn source_name(&self) -> &'static str;

    /// Load a fresh snapshot of the fund identified by `fund_code`.
    async fn load_snapshot(&self, fund_code: &str) -> Result<FundSnapshot, TraitError>;
}
