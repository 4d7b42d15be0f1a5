//! Process-boundary configuration.
//!
//! Values come from command-line flags with environment fallbacks and are
//! handed to the library as plain arguments.

use crate::vault::UnsealError;
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_VAULT_ADDR: &str = "http://127.0.0.1:8200";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_STARTUP_DELAY_SECS: u64 = 5;

/// Where and how to reach Vault.
#[derive(Debug, Clone, Args)]
pub struct ConnectionArgs {
    /// Vault server address.
    #[arg(long, default_value = DEFAULT_VAULT_ADDR, env = "VAULT_ADDR")]
    pub vault_addr: String,

    /// Per-request timeout in seconds, applied to every call separately.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, env = "VAULT_TIMEOUT_SECS")]
    pub timeout_secs: u64,
}

impl ConnectionArgs {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Unseal keys from flags, `UNSEAL_KEYS` and an optional file.
#[derive(Clone, Args)]
pub struct KeyArgs {
    /// Unseal key; repeat the flag or pass a comma-separated list.
    #[arg(
        long = "key",
        value_name = "UNSEAL_KEY",
        env = "UNSEAL_KEYS",
        value_delimiter = ',',
        hide_env_values = true
    )]
    pub keys: Vec<String>,

    /// Read unseal keys from a file, one per line.
    #[arg(long)]
    pub keys_file: Option<PathBuf>,
}

/// Everything the `unseal` command needs.
pub struct UnsealConfig {
    pub vault_addr: String,
    pub keys: Vec<String>,
    pub timeout: Duration,
    /// Wait before the first request while Vault starts.
    pub startup_delay: Duration,
}

impl UnsealConfig {
    pub fn from_args(
        connection: &ConnectionArgs,
        key_args: KeyArgs,
        startup_delay_secs: u64,
    ) -> Result<Self, UnsealError> {
        let mut keys = Vec::new();
        if let Some(path) = &key_args.keys_file {
            keys.extend(read_keys_file(path)?);
        }
        // Stray commas in UNSEAL_KEYS leave empty entries behind; keys
        // themselves are passed through untouched.
        keys.extend(key_args.keys.into_iter().filter(|k| !k.trim().is_empty()));

        Ok(Self {
            vault_addr: connection.vault_addr.clone(),
            keys,
            timeout: connection.timeout(),
            startup_delay: Duration::from_secs(startup_delay_secs),
        })
    }
}

fn read_keys_file(path: &Path) -> Result<Vec<String>, UnsealError> {
    let contents = fs::read_to_string(path).map_err(|e| {
        UnsealError::Configuration(format!(
            "Failed to read keys file {}: {}",
            path.display(),
            e
        ))
    })?;
    Ok(contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect())
}
