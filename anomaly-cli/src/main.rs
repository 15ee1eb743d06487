//! Binary crate for the `anomaly` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and installing the log subscriber
//! - Serving the adapter over plain HTTP
//! - One-shot checks and interactive configuration

use anyhow::Context;
use clap::Parser;

mod cli;
mod http;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();

    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(cmd.log_level)
            .with_writer(std::io::stderr)
            .finish(),
    )
    .context("failed to set tracing subscriber")?;

    cmd.run().await
}
