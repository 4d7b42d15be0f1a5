//! vault-bootstrap - Vault unseal bootstrap library
//!
//! This crate drives a sealed HashiCorp Vault instance to an unsealed, ready
//! state through its HTTP seal API. It is used by the `vault-bootstrap`
//! binary and can be embedded in other provisioning tools.
//!
//! ## Architecture
//!
//! - `vault` module - seal API client and unseal orchestrator
//! - `interface` module - the `SealApi` trait the orchestrator is generic over
//! - `config` module - process-boundary configuration (address, keys, timeouts)
//! - `cli` module - command-line interface; the only layer that exits the process
//!
//! The library never reads ambient process state: endpoint, keys and timeout
//! are passed in explicitly.

pub mod cli;
pub mod config;
pub mod interface;
pub mod vault;

pub use interface::SealApi;
pub use vault::{unseal, UnsealError, UnsealOutcome};

/// Initialize logging for tests
#[allow(dead_code)]
pub(crate) fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_test_writer() // This ensures output goes to both stdout and test output
        .try_init();
}
