//! sqlsnip CLI binary.

use anyhow::Result;
use sqlsnip::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Main entry point for the sqlsnip CLI.
///
/// Uses tokio's current_thread runtime; a session runs its cells sequentially.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Controlled via RUST_LOG, e.g. RUST_LOG=sqlsnip=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sqlsnip=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting sqlsnip CLI");

    let cli = Cli::parse_args();
    cli.execute().await?;

    tracing::debug!("sqlsnip CLI completed successfully");
    Ok(())
}
