//! Output reporters for analysis results
//!
//! Merges per-submission metrics back into the submission table, keyed by
//! submission id, and renders the augmented table:
//! - `csv` - the original columns plus metric columns, `unknown` markers
//! - `json` - one object per submission, `null` for undefined metrics

mod csv;
mod json;

use crate::ingest::SubmissionTable;
use crate::pipeline::RunReport;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Metric columns appended to the submission table, in output order.
pub const METRIC_COLUMNS: &[&str] = &[
    "no_comments",
    "depth",
    "wiener_index",
    "no_controversial",
    "post_duration",
    "gini_coefficient",
];

/// Column holding classifier labels, present only when one was injected.
pub const EMOTION_COLUMN: &str = "emotion";

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: csv, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Render the augmented submission table in the named format.
pub fn report(table: &SubmissionTable, run: &RunReport, format: &str) -> Result<String> {
    let fmt = OutputFormat::from_str(format)?;
    report_with_format(table, run, fmt)
}

/// Render using an OutputFormat enum.
pub fn report_with_format(
    table: &SubmissionTable,
    run: &RunReport,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Csv => csv::render(table, run),
        OutputFormat::Json => json::render(table, run),
    }
}

/// Get the recommended file extension for a format.
pub fn file_extension(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Csv => "csv",
        OutputFormat::Json => "json",
    }
}
