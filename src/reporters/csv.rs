//! CSV reporter
//!
//! Emits the submission table with metric columns appended. Every input
//! column passes through untouched; metrics that could not be computed
//! render as the explicit `unknown` marker, never as a made-up number.

use crate::ingest::SubmissionTable;
use crate::models::{ThreadMetrics, UNKNOWN_MARKER};
use crate::pipeline::RunReport;
use crate::reporters::{EMOTION_COLUMN, METRIC_COLUMNS};
use anyhow::{anyhow, Context, Result};
use rustc_hash::FxHashMap;

/// Render the augmented table as CSV.
pub fn render(table: &SubmissionTable, run: &RunReport) -> Result<String> {
    let by_id: FxHashMap<&str, &ThreadMetrics> = run
        .metrics
        .iter()
        .map(|m| (m.submission_id.as_str(), m))
        .collect();

    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut headers: Vec<&str> = table.headers().iter().collect();
    headers.extend_from_slice(METRIC_COLUMNS);
    if run.summary.emotions_enabled {
        headers.push(EMOTION_COLUMN);
    }
    writer.write_record(&headers)?;

    for record in table.records() {
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        match by_id.get(table.id_of(record)) {
            Some(m) => {
                row.push(m.no_comments.to_string());
                row.push(opt_u64(m.depth));
                row.push(opt_f64(m.wiener_index));
                row.push(m.no_controversial.to_string());
                row.push(opt_f64(m.post_duration));
                row.push(opt_f64(m.gini_coefficient));
                if run.summary.emotions_enabled {
                    row.push(m.emotion.clone().unwrap_or_else(|| UNKNOWN_MARKER.to_string()));
                }
            }
            None => {
                let missing = METRIC_COLUMNS.len() + usize::from(run.summary.emotions_enabled);
                row.extend(std::iter::repeat(UNKNOWN_MARKER.to_string()).take(missing));
            }
        }
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("flush CSV output: {e}"))?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}

fn opt_u64(value: Option<u64>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| UNKNOWN_MARKER.to_string())
}

fn opt_f64(value: Option<f64>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| UNKNOWN_MARKER.to_string())
}
