//! Unseal orchestration.
//!
//! Drives a sealed Vault to the unsealed state by reading its seal status and
//! then submitting key shares one at a time. The run is a strictly linear
//! state machine, `CheckingStatus -> Submitting(index) -> Done`, that never
//! goes back: every share is sent at most once, in the order given, and the
//! first transport failure or rejection ends the run.
//!
//! All unseal progress lives in Vault itself. The orchestrator only observes
//! it, so partial submission is reported precisely through `consumed` and the
//! caller decides whether to run again.

use crate::interface::SealApi;
use crate::vault::{Endpoint, SealClient, Shares, VaultError};
use std::fmt;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

/// Successful end of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsealOutcome {
    /// The status check found Vault unsealed; no share was sent.
    AlreadyUnsealed,
    /// Vault reported `sealed: false` after `consumed` shares; `progress` is
    /// the counter from that final response.
    Unsealed { consumed: usize, progress: u32 },
}

/// Which request a transport failure happened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    StatusCheck,
    /// 1-based position of the share being submitted.
    Submission { share: usize },
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::StatusCheck => f.write_str("seal status check"),
            Stage::Submission { share } => write!(f, "submission of unseal key #{}", share),
        }
    }
}

/// Terminal failure of a run. `consumed` counts shares Vault accepted.
#[derive(Debug, thiserror::Error)]
pub enum UnsealError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Vault unreachable during {stage} ({consumed} key(s) accepted): {source}")]
    Unreachable {
        stage: Stage,
        consumed: usize,
        #[source]
        source: VaultError,
    },

    #[error("Vault rejected unseal key #{share} with status {status} ({consumed} key(s) accepted): {body}")]
    Rejected {
        share: usize,
        consumed: usize,
        status: u16,
        body: String,
    },

    #[error("Vault is still sealed after all {consumed} unseal key(s) were used (progress {progress})")]
    Exhausted { consumed: usize, progress: u32 },

    #[error("Unseal cancelled after {consumed} key(s) were accepted")]
    Cancelled { consumed: usize },
}

impl UnsealError {
    /// Process exit code the CLI reports for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            UnsealError::Configuration(_) => 2,
            UnsealError::Unreachable { .. } => 3,
            UnsealError::Rejected { .. } => 4,
            UnsealError::Exhausted { .. } => 5,
            UnsealError::Cancelled { .. } => 130,
        }
    }

    /// Number of shares Vault accepted before the run ended.
    pub fn consumed(&self) -> usize {
        match self {
            UnsealError::Configuration(_) => 0,
            UnsealError::Unreachable { consumed, .. }
            | UnsealError::Rejected { consumed, .. }
            | UnsealError::Exhausted { consumed, .. }
            | UnsealError::Cancelled { consumed } => *consumed,
        }
    }
}

/// Runs one unseal attempt against a [`SealApi`].
pub struct Orchestrator<A> {
    api: A,
    cancel: Option<watch::Receiver<bool>>,
}

impl<A: SealApi> Orchestrator<A> {
    pub fn new(api: A) -> Self {
        Self { api, cancel: None }
    }

    /// Stops the run before the next submission once the channel holds `true`.
    /// A request already in flight always completes first.
    pub fn with_cancel(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    fn cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|rx| *rx.borrow())
    }

    pub async fn run(&self, shares: &Shares) -> Result<UnsealOutcome, UnsealError> {
        let status = self.api.seal_status().await.map_err(|source| {
            warn!("Error checking Vault seal status: {}", source);
            UnsealError::Unreachable {
                stage: Stage::StatusCheck,
                consumed: 0,
                source,
            }
        })?;

        if !status.sealed {
            info!("Vault is already unsealed");
            return Ok(UnsealOutcome::AlreadyUnsealed);
        }
        info!(
            "Vault is sealed (progress {}), submitting up to {} unseal key(s)",
            status.progress_label(),
            shares.len()
        );

        let mut progress = status.progress;
        for (index, share) in shares.iter().enumerate() {
            let consumed = index;
            let position = index + 1;

            if self.cancelled() {
                warn!("Unseal cancelled before key #{}", position);
                return Err(UnsealError::Cancelled { consumed });
            }

            let status = match self.api.submit_share(share).await {
                Ok(status) => status,
                Err(VaultError::HttpStatus(code, body)) => {
                    warn!("Vault rejected unseal key #{} with status {}", position, code);
                    return Err(UnsealError::Rejected {
                        share: position,
                        consumed,
                        status: code,
                        body,
                    });
                }
                Err(source) => {
                    warn!("Error submitting unseal key #{}: {}", position, source);
                    return Err(UnsealError::Unreachable {
                        stage: Stage::Submission { share: position },
                        consumed,
                        source,
                    });
                }
            };

            info!("Unseal progress: {}", status.progress_label());
            progress = status.progress;
            if !status.sealed {
                info!("Vault successfully unsealed after {} key(s)", position);
                return Ok(UnsealOutcome::Unsealed {
                    consumed: position,
                    progress: status.progress,
                });
            }
        }

        warn!("Vault is still sealed after all unseal keys were used");
        Err(UnsealError::Exhausted {
            consumed: shares.len(),
            progress,
        })
    }
}

/// Unseals the Vault at `endpoint` with `keys`, bounding each request by `timeout`.
///
/// Input is validated before any request is made: an invalid address, an
/// empty key list, a blank key or a zero timeout is a
/// [`UnsealError::Configuration`].
pub async fn unseal(
    endpoint: &str,
    keys: Vec<String>,
    timeout: Duration,
) -> Result<UnsealOutcome, UnsealError> {
    let (orchestrator, shares) = prepare(endpoint, keys, timeout)?;
    orchestrator.run(&shares).await
}

/// Validates input and builds an HTTP-backed orchestrator.
pub fn prepare(
    endpoint: &str,
    keys: Vec<String>,
    timeout: Duration,
) -> Result<(Orchestrator<SealClient>, Shares), UnsealError> {
    let shares = Shares::new(keys)?;
    let endpoint = Endpoint::parse(endpoint)?;
    if timeout.is_zero() {
        return Err(UnsealError::Configuration(
            "Request timeout must be greater than zero".to_string(),
        ));
    }
    let client = SealClient::new(&endpoint, timeout)
        .map_err(|e| UnsealError::Configuration(e.to_string()))?;
    info!("Unsealing Vault at {}", endpoint);
    Ok((Orchestrator::new(client), shares))
}
