use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;
use vault_bootstrap::cli::{run_cli, Cli};

#[tokio::main]
async fn main() {
    // RUST_LOG overrides the default level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let code = match run_cli(cli).await {
        Ok(code) => code,
        Err(err) => {
            error!("{:#}", err);
            1
        }
    };
    std::process::exit(code);
}
