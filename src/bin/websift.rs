//! `websift` binary: runs one search command and prints the envelope.
//!
//! All tracing output goes to stderr so that stdout carries only JSON.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use websift::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("websift=info,websift_search=info")),
        )
        .init();

    let cli = Cli::parse();

    let output = websift::cli::run(&cli).await.map_err(|e| {
        tracing::error!(error = %e, "websift failed");
        e
    })?;
    println!("{output}");
    Ok(())
}
