/// Failure of a single HTTP exchange with the Vault seal API.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP status {0}: {1}")]
    HttpStatus(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

impl VaultError {
    /// True when no trustworthy answer was obtained from the store.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            VaultError::Timeout(_) | VaultError::Network(_) | VaultError::Parse(_)
        )
    }
}

impl From<reqwest::Error> for VaultError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            VaultError::Timeout(e.to_string())
        } else if e.is_decode() {
            VaultError::Parse(e.to_string())
        } else {
            VaultError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(e: serde_json::Error) -> Self {
        VaultError::Parse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_classification() {
        assert!(VaultError::Timeout("slow".into()).is_transport());
        assert!(VaultError::Network("refused".into()).is_transport());
        assert!(VaultError::Parse("not json".into()).is_transport());
        assert!(!VaultError::HttpStatus(400, "invalid key".into()).is_transport());
        assert!(!VaultError::Client("tls".into()).is_transport());
    }

    #[test]
    fn test_http_status_display_keeps_body() {
        let err = VaultError::HttpStatus(400, "invalid key".into());
        assert_eq!(err.to_string(), "HTTP status 400: invalid key");
    }
}
