//! HTTP client for Vault's unauthenticated seal API.
//!
//! `sys/seal-status` and `sys/unseal` need no token, so unlike the rest of
//! the Vault API no `X-Vault-Token` header is sent.

use crate::interface::SealApi;
use crate::vault::share::UnsealRequest;
use crate::vault::{Endpoint, SealStatus, Share, VaultError};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::debug;

pub const SEAL_STATUS_PATH: &str = "/v1/sys/seal-status";
pub const UNSEAL_PATH: &str = "/v1/sys/unseal";

/// Client bound to a single Vault endpoint.
pub struct SealClient {
    status_url: String,
    unseal_url: String,
    client: Client,
}

impl SealClient {
    /// Creates a client whose `timeout` bounds every request independently.
    pub fn new(endpoint: &Endpoint, timeout: Duration) -> Result<Self, VaultError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VaultError::Client(e.to_string()))?;

        Ok(Self {
            status_url: endpoint.url(SEAL_STATUS_PATH),
            unseal_url: endpoint.url(UNSEAL_PATH),
            client,
        })
    }
}

/// Reads a seal-status document from a response, treating any status other
/// than `accepted` as an API error with the raw body preserved.
async fn read_status(resp: Response, accepted: fn(StatusCode) -> bool) -> Result<SealStatus, VaultError> {
    let status = resp.status();
    let body = resp.text().await?;
    if !accepted(status) {
        return Err(VaultError::HttpStatus(status.as_u16(), body));
    }
    Ok(serde_json::from_str(&body)?)
}

#[async_trait]
impl SealApi for SealClient {
    async fn seal_status(&self) -> Result<SealStatus, VaultError> {
        debug!("GET {}", self.status_url);
        let resp = self.client.get(&self.status_url).send().await?;
        read_status(resp, |s| s.is_success()).await
    }

    async fn submit_share(&self, share: &Share) -> Result<SealStatus, VaultError> {
        debug!("PUT {}", self.unseal_url);
        let resp = self
            .client
            .put(&self.unseal_url)
            .json(&UnsealRequest::from(share))
            .send()
            .await?;
        read_status(resp, |s| s == StatusCode::OK).await
    }
}
