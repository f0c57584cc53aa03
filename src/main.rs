//! Threadscope - reply-tree analytics for discussion archives
//!
//! Rebuilds the conversation tree behind every submission in a flat
//! comment dump and derives structural and behavioral metrics.

use anyhow::Result;
use clap::Parser;
use threadscope::cli;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging; RUST_LOG wins over --log-level
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    cli::run(cli)
}
