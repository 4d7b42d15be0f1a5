use crate::vault::{SealStatus, Share, VaultError};
use async_trait::async_trait;

/// Seal operations the unseal orchestrator drives.
///
/// Implemented over HTTP by [`crate::vault::SealClient`].
#[async_trait]
pub trait SealApi: Send + Sync {
    /// Read the current seal status
    async fn seal_status(&self) -> Result<SealStatus, VaultError>;

    /// Submit one key share; returns the status reported after accepting it
    async fn submit_share(&self, share: &Share) -> Result<SealStatus, VaultError>;
}
