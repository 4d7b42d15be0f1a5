//! Seal status as reported by Vault's `sys/seal-status` and `sys/unseal` endpoints.

use crate::interface::SealApi;
use crate::vault::{Endpoint, SealClient, VaultError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Snapshot of the store's seal state.
///
/// Only `sealed` is mandatory; the remaining fields are informational and
/// absent from some Vault versions and proxies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealStatus {
    pub sealed: bool,
    #[serde(default)]
    pub progress: u32,
    /// Unseal threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<u32>,
    /// Total number of key shares.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initialized: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl SealStatus {
    /// Renders progress as `progress/threshold`, or just `progress` when the
    /// threshold is unknown.
    pub fn progress_label(&self) -> String {
        match self.t {
            Some(t) => format!("{}/{}", self.progress, t),
            None => self.progress.to_string(),
        }
    }
}

/// Reads the seal status of the Vault at `addr` without touching its state.
pub async fn get_seal_status(endpoint: &Endpoint, timeout: Duration) -> Result<SealStatus, VaultError> {
    let client = SealClient::new(endpoint, timeout)?;
    let status = client.seal_status().await?;
    debug!(
        "Vault seal status at {}: sealed={}, progress={}",
        endpoint,
        status.sealed,
        status.progress_label()
    );
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_vault_response() {
        let body = r#"{
            "type": "shamir", "initialized": true, "sealed": true,
            "t": 3, "n": 5, "progress": 2, "nonce": "abc",
            "version": "1.13.3", "migration": false,
            "recovery_seal": false, "storage_type": "file"
        }"#;
        let status: SealStatus = serde_json::from_str(body).unwrap();
        assert!(status.sealed);
        assert_eq!(status.progress, 2);
        assert_eq!(status.t, Some(3));
        assert_eq!(status.n, Some(5));
        assert_eq!(status.initialized, Some(true));
        assert_eq!(status.progress_label(), "2/3");
    }

    #[test]
    fn test_deserialize_minimal_response() {
        let status: SealStatus = serde_json::from_str(r#"{"sealed": false}"#).unwrap();
        assert!(!status.sealed);
        assert_eq!(status.progress, 0);
        assert_eq!(status.progress_label(), "0");
    }

    #[test]
    fn test_missing_sealed_field_is_an_error() {
        assert!(serde_json::from_str::<SealStatus>(r#"{"progress": 1}"#).is_err());
    }

    #[tokio::test]
    async fn test_get_seal_status_connection_error() {
        crate::init_logging();
        let endpoint = Endpoint::parse("http://127.0.0.1:9").unwrap();
        let result = get_seal_status(&endpoint, Duration::from_secs(2)).await;
        match result {
            Err(e) => assert!(e.is_transport(), "expected transport error, got {:?}", e),
            Ok(status) => panic!("expected connection error, got {:?}", status),
        }
    }
}
