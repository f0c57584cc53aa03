//! Analyze command implementation
//!
//! This command performs a full batch analysis:
//! 1. Load project config from the data directory
//! 2. Load the submission and comment tables
//! 3. Run the pipeline across a bounded worker pool
//! 4. Merge metrics into the submission table and render the report

use crate::classify::LexiconClassifier;
use crate::config::load_project_config;
use crate::ingest::{load_comments, SubmissionTable};
use crate::pipeline::Pipeline;
use crate::reporters;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

pub struct AnalyzeArgs {
    pub submissions: PathBuf,
    pub comments: PathBuf,
    pub format: Option<String>,
    pub output: Option<PathBuf>,
    pub emotions: bool,
    pub max_depth: Option<usize>,
    pub workers: Option<usize>,
}

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let config_dir = args
        .submissions
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let config = load_project_config(config_dir);

    let workers = args.workers.unwrap_or(config.defaults.workers);
    let format = args.format.unwrap_or(config.defaults.format);
    let max_depth = args.max_depth.unwrap_or(config.analysis.max_traversal_depth);

    info!(
        "loading tables: {} / {}",
        args.submissions.display(),
        args.comments.display()
    );
    let table = SubmissionTable::from_path(&args.submissions)?;
    let comments = load_comments(&args.comments)?;

    let bar = ProgressBar::new(table.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} submissions")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    let bar_for_callback = bar.clone();

    let mut pipeline = Pipeline::new(workers)
        .with_max_depth(max_depth)
        .with_excluded_authors(config.analysis.excluded_authors.clone())
        .with_progress_callback(Box::new(move |done, _total| {
            bar_for_callback.set_position(done as u64);
        }));
    if args.emotions {
        pipeline = pipeline.with_classifier(Arc::new(LexiconClassifier::default()));
    }

    let run = pipeline.run(&table, &comments)?;
    bar.finish_and_clear();

    let rendered = reporters::report(&table, &run, &format)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!(
                "{} {} -> {}",
                style("Analyzed").green().bold(),
                run.summary.summary(),
                path.display()
            );
        }
        None => {
            print!("{rendered}");
            eprintln!("{} {}", style("Analyzed").green().bold(), run.summary.summary());
        }
    }

    if run.summary.tree_failures > 0 {
        eprintln!(
            "{} {} submission(s) had malformed reply chains; their tree metrics are marked unknown",
            style("warning:").yellow().bold(),
            run.summary.tree_failures
        );
    }

    Ok(())
}
