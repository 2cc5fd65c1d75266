//! nxneo CLI
//!
//! Inspect and edit a NetworkX-style graph stored in Neo4j.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::Cli;

/// Logs go to stderr so command output on stdout stays pipeable.
fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "nxneo=debug,nxneo_graph=debug"
    } else {
        "nxneo=info,nxneo_graph=info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    cli.execute().await
}
