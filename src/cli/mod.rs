//! CLI command definitions and handlers

mod analyze;
mod prep;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// Threadscope - reply-tree analytics for discussion archives
///
/// 100% LOCAL - no data leaves your machine.
#[derive(Parser, Debug)]
#[command(name = "threadscope")]
#[command(
    version,
    about = "Reply-tree analytics — rebuild conversation trees from flat comment dumps and measure their structure",
    long_about = "Threadscope rebuilds the reply tree behind every submission in a flat \
comment table and derives per-thread metrics: comment count, depth, branch \
dispersion, participation inequality, activity duration, and controversy.\n\n\
Input tables are CSV; the `prep` subcommand normalizes raw exports (epoch \
timestamps, t1_/t3_ id prefixes, missing values) into the form `analyze` expects.",
    after_help = "\
Examples:
  threadscope prep -s posts.csv -c comments.csv --out-dir prepared
  threadscope analyze -s prepared/posts.csv -c prepared/comments.csv
  threadscope analyze -s posts.csv -c comments.csv --format json -o metrics.json
  threadscope analyze -s posts.csv -c comments.csv --emotions
  RUST_LOG=debug threadscope analyze -s posts.csv -c comments.csv"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Number of parallel workers (1-64; default from threadscope.toml)
    #[arg(long, global = true, value_parser = parse_workers)]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build reply trees and compute per-submission metrics
    Analyze {
        /// Cleaned submission table (CSV, must have an `id` column)
        #[arg(long, short = 's')]
        submissions: PathBuf,

        /// Cleaned comment table (CSV)
        #[arg(long, short = 'c')]
        comments: PathBuf,

        /// Output format: csv, json (default from threadscope.toml)
        #[arg(long, short = 'f')]
        format: Option<String>,

        /// Write output to a file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Label submission text with the built-in lexicon classifier
        #[arg(long)]
        emotions: bool,

        /// Override the reply-chain depth cap
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Normalize raw exports into the tables `analyze` expects
    Prep {
        /// Raw submission table (CSV)
        #[arg(long, short = 's')]
        submissions: Option<PathBuf>,

        /// Raw comment table (CSV)
        #[arg(long, short = 'c')]
        comments: Option<PathBuf>,

        /// Directory for the prepared tables
        #[arg(long, default_value = "prepared")]
        out_dir: PathBuf,
    },
}

/// Dispatch a parsed CLI invocation.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze {
            submissions,
            comments,
            format,
            output,
            emotions,
            max_depth,
        } => analyze::run(analyze::AnalyzeArgs {
            submissions,
            comments,
            format,
            output,
            emotions,
            max_depth,
            workers: cli.workers,
        }),
        Commands::Prep {
            submissions,
            comments,
            out_dir,
        } => prep::run(submissions, comments, &out_dir),
    }
}
