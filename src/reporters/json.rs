//! JSON reporter
//!
//! Outputs one object per submission: the original columns as strings
//! plus typed metric fields. Undefined metrics are `null`, so consumers
//! can tell "not computed" from any real value. Useful for piping to jq
//! or loading into a notebook.

use crate::ingest::SubmissionTable;
use crate::models::ThreadMetrics;
use crate::pipeline::RunReport;
use anyhow::Result;
use rustc_hash::FxHashMap;
use serde_json::{json, Map, Value};

/// Render the augmented table as pretty-printed JSON.
pub fn render(table: &SubmissionTable, run: &RunReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(&rows(table, run))?)
}

/// Render as compact JSON (single line).
pub fn render_compact(table: &SubmissionTable, run: &RunReport) -> Result<String> {
    Ok(serde_json::to_string(&rows(table, run))?)
}

fn rows(table: &SubmissionTable, run: &RunReport) -> Vec<Value> {
    let by_id: FxHashMap<&str, &ThreadMetrics> = run
        .metrics
        .iter()
        .map(|m| (m.submission_id.as_str(), m))
        .collect();

    table
        .records()
        .iter()
        .map(|record| {
            let mut obj = Map::new();
            for (header, cell) in table.headers().iter().zip(record.iter()) {
                obj.insert(header.to_string(), Value::String(cell.to_string()));
            }
            match by_id.get(table.id_of(record)) {
                Some(m) => {
                    obj.insert("no_comments".to_string(), json!(m.no_comments));
                    obj.insert("depth".to_string(), json!(m.depth));
                    obj.insert("wiener_index".to_string(), json!(m.wiener_index));
                    obj.insert("no_controversial".to_string(), json!(m.no_controversial));
                    obj.insert("post_duration".to_string(), json!(m.post_duration));
                    obj.insert("gini_coefficient".to_string(), json!(m.gini_coefficient));
                    if run.summary.emotions_enabled {
                        obj.insert("emotion".to_string(), json!(m.emotion));
                    }
                }
                None => {
                    for column in crate::reporters::METRIC_COLUMNS {
                        obj.insert(column.to_string(), Value::Null);
                    }
                    if run.summary.emotions_enabled {
                        obj.insert("emotion".to_string(), Value::Null);
                    }
                }
            }
            Value::Object(obj)
        })
        .collect()
}
