use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::config::{ConnectionArgs, KeyArgs, UnsealConfig, DEFAULT_STARTUP_DELAY_SECS};
use crate::vault::unseal::prepare;
use crate::vault::{get_seal_status, Endpoint, UnsealOutcome};

#[derive(Parser)]
#[command(
    name = "vault-bootstrap",
    about = "Vault bootstrap CLI (supports unseal and status)",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Unseal Vault by submitting key shares one at a time.
    Unseal {
        #[command(flatten)]
        connection: ConnectionArgs,
        #[command(flatten)]
        keys: KeyArgs,
        /// Seconds to wait for Vault to start before the first request.
        #[arg(
            long,
            default_value_t = DEFAULT_STARTUP_DELAY_SECS,
            env = "VAULT_STARTUP_DELAY_SECS"
        )]
        startup_delay_secs: u64,
    },
    /// Check Vault seal status.
    Status {
        #[command(flatten)]
        connection: ConnectionArgs,
    },
}

/// Runs the parsed command and returns the process exit code.
pub async fn run_cli(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Unseal {
            connection,
            keys,
            startup_delay_secs,
        } => {
            let config = match UnsealConfig::from_args(&connection, keys, startup_delay_secs) {
                Ok(config) => config,
                Err(err) => {
                    error!("{}", err);
                    return Ok(err.exit_code());
                }
            };
            Ok(run_unseal(config).await)
        }

        Commands::Status { connection } => {
            let endpoint = Endpoint::parse(&connection.vault_addr)?;
            info!("Checking status of Vault at {}", endpoint);

            match get_seal_status(&endpoint, connection.timeout()).await {
                Ok(status) => {
                    info!(
                        "Vault Status: Sealed: {}, Progress: {}",
                        status.sealed,
                        status.progress_label()
                    );
                    if let Some(false) = status.initialized {
                        info!("Vault is not initialized.");
                    } else if status.sealed {
                        info!("Vault is sealed. Run the unseal command to unseal.");
                    }
                    Ok(0)
                }
                Err(e) => {
                    if e.is_transport() {
                        error!("Connection error: Ensure Vault is running at {}", endpoint);
                    }
                    Err(anyhow::anyhow!("Failed to check Vault status: {}", e))
                }
            }
        }
    }
}

async fn run_unseal(config: UnsealConfig) -> i32 {
    let (orchestrator, shares) = match prepare(&config.vault_addr, config.keys, config.timeout) {
        Ok(prepared) => prepared,
        Err(err) => {
            error!("{}", err);
            return err.exit_code();
        }
    };

    if !config.startup_delay.is_zero() {
        info!(
            "Waiting {}s for Vault to start...",
            config.startup_delay.as_secs()
        );
        tokio::time::sleep(config.startup_delay).await;
    }

    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the request in flight");
            let _ = cancel_tx.send(true);
        }
    });

    match orchestrator.with_cancel(cancel_rx).run(&shares).await {
        Ok(UnsealOutcome::AlreadyUnsealed) => {
            info!("Vault is already unsealed, nothing to do");
            0
        }
        Ok(UnsealOutcome::Unsealed { consumed, progress }) => {
            info!(
                "Vault unsealed successfully using {} key(s) (progress {})",
                consumed, progress
            );
            0
        }
        Err(err) => {
            error!("Failed to unseal Vault: {}", err);
            err.exit_code()
        }
    }
}
