//! Base address of the Vault instance being bootstrapped.

use crate::vault::UnsealError;
use reqwest::Url;
use std::fmt;

/// Validated base URL of a Vault server, e.g. `http://127.0.0.1:8200`.
///
/// Only the syntax is checked; reachability is discovered by the first request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base: Url,
}

impl Endpoint {
    pub fn parse(addr: &str) -> Result<Self, UnsealError> {
        let addr = addr.trim();
        if addr.is_empty() {
            return Err(UnsealError::Configuration(
                "Vault address must not be empty".to_string(),
            ));
        }

        let base = Url::parse(addr).map_err(|e| {
            UnsealError::Configuration(format!("Invalid Vault address '{}': {}", addr, e))
        })?;

        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(UnsealError::Configuration(format!(
                "Vault address '{}' must use http or https, not '{}'",
                addr,
                base.scheme()
            )));
        }
        if base.host_str().is_none() {
            return Err(UnsealError::Configuration(format!(
                "Vault address '{}' has no host",
                addr
            )));
        }
        // Rejected without echoing the address, which would leak the password.
        if !base.username().is_empty() || base.password().is_some() {
            return Err(UnsealError::Configuration(
                "Vault address must not embed credentials".to_string(),
            ));
        }
        // API paths are appended to the serialized URL.
        if base.query().is_some() || base.fragment().is_some() {
            return Err(UnsealError::Configuration(format!(
                "Vault address '{}' must not carry a query or fragment",
                addr
            )));
        }

        Ok(Self { base })
    }

    /// Full URL for an API path such as `/v1/sys/seal-status`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base.as_str().trim_end_matches('/'), path)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base.as_str().trim_end_matches('/'))
    }
}
