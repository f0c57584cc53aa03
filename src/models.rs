//! Core data models for Threadscope
//!
//! These models are used throughout the codebase for representing
//! comment rows and per-submission metric results.

use serde::{Deserialize, Serialize};

/// Marker written to CSV output for metrics that could not be computed.
///
/// Undefined metrics are never replaced with a fabricated numeric default;
/// they render as this marker in CSV and as `null` in JSON.
pub const UNKNOWN_MARKER: &str = "unknown";

/// Sentinel author name for deleted accounts.
///
/// Comments by this author still count toward thread size, but are
/// excluded from participation (Gini) statistics.
pub const DELETED_AUTHOR: &str = "[deleted]";

/// One comment row from the cleaned comment table.
///
/// `parent_id` references either another comment id or the owning
/// submission id (for a top-level reply); `link_id` always references the
/// owning submission. Both arrive with their type prefix already stripped
/// (see the `prep` module), so they compare directly against bare ids.
/// Unknown CSV columns are ignored on ingest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub parent_id: String,
    pub link_id: String,
    #[serde(default)]
    pub author: String,
    /// ISO-8601 timestamp, already normalized from epoch seconds upstream.
    #[serde(default)]
    pub created_utc: String,
    /// Binary flag marking contested reception (0 or 1).
    #[serde(default)]
    pub controversiality: u8,
    #[serde(default)]
    pub body: Option<String>,
}

/// Per-submission metric record produced by the pipeline.
///
/// `no_comments` and `no_controversial` are always computed from the raw
/// filtered comment subset. The four tree-dependent metrics are `None`
/// when the reply tree could not be built for this submission, or when
/// the metric itself is undefined (no qualifying authors, no timestamps).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreadMetrics {
    pub submission_id: String,
    /// Number of comments under the submission, reachable or not.
    pub no_comments: u64,
    /// Sum of controversiality flags over the same raw subset.
    pub no_controversial: u64,
    pub depth: Option<u64>,
    /// Branch-dispersion ("Wiener-like") index over top-level branches.
    pub wiener_index: Option<f64>,
    pub gini_coefficient: Option<f64>,
    /// Activity duration in hours, first top-level reply to last leaf.
    pub post_duration: Option<f64>,
    /// Top emotion label when a text classifier is injected.
    pub emotion: Option<String>,
}

impl ThreadMetrics {
    /// Record for a submission whose reply tree could not be built.
    ///
    /// Raw-subset counts survive; every tree-dependent metric is unknown.
    pub fn tree_failed(submission_id: String, no_comments: u64, no_controversial: u64) -> Self {
        Self {
            submission_id,
            no_comments,
            no_controversial,
            depth: None,
            wiener_index: None,
            gini_coefficient: None,
            post_duration: None,
            emotion: None,
        }
    }

    /// Whether the reply tree for this submission failed to build.
    ///
    /// Depth is defined (0) even for an empty thread, so a missing depth
    /// can only mean the builder gave up.
    pub fn tree_metrics_missing(&self) -> bool {
        self.depth.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_failed_keeps_raw_counts() {
        let m = ThreadMetrics::tree_failed("abc".to_string(), 7, 2);
        assert_eq!(m.no_comments, 7);
        assert_eq!(m.no_controversial, 2);
        assert!(m.depth.is_none());
        assert!(m.wiener_index.is_none());
        assert!(m.tree_metrics_missing());
    }
}
