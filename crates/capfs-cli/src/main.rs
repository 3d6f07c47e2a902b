//! capfs entry point.
//!
//! ```bash
//! capfs -C ~/project tree -d 2
//! capfs glob '**/*.rs'
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use capfs_cli::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    capfs_cli::run(Cli::parse()).await
}
