//! Vault module for the vault-bootstrap library
//!
//! This module implements the seal API client and the unseal orchestrator.
//!
//! ## Architectural role:
//! - `client` speaks HTTP to Vault's `sys/seal-status` and `sys/unseal` endpoints
//! - `unseal` drives the share-submission state machine over the
//!   [`crate::interface::SealApi`] seam
//! - `endpoint` and `share` validate operator input before any request is made
//!
//! ## Testing strategy:
//! - Each module contains its own unit tests within a `#[cfg(test)] mod tests` block
//! - The orchestrator is tested against a scripted in-memory `SealApi`
//! - Integration tests in the `tests/` directory drive the HTTP client against
//!   mocked Vault endpoints, and against a real Vault container when Docker is available

pub mod client;
pub mod endpoint;
pub mod error;
pub mod share;
pub mod status;
pub mod unseal;

pub use client::SealClient;
pub use endpoint::Endpoint;
pub use error::VaultError;
pub use share::{Share, Shares};
pub use status::{get_seal_status, SealStatus};
pub use unseal::{unseal, Orchestrator, Stage, UnsealError, UnsealOutcome};
