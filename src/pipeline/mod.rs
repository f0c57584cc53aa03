//! Analysis pipeline
//!
//! Orchestrates the full run:
//! 1. For each submission, filter its comments and build the reply tree
//! 2. Run every metric extractor over the tree / raw subset
//! 3. Collect one metric record per submission, keyed by submission id
//!
//! Submissions are independent, so the pipeline fans them out over a
//! bounded rayon pool. Inputs are read-only for the whole pass; each
//! worker touches nothing but its own submission's filtered subset and
//! transient tree. A failed tree build (cycle, depth cap) downgrades
//! that submission's tree metrics to unknown and never aborts the batch.

use crate::classify::TextClassifier;
use crate::ingest::SubmissionTable;
use crate::metrics::{self, MetricError};
use crate::models::{Comment, ThreadMetrics};
use crate::tree::{self, DEFAULT_MAX_DEPTH};
use anyhow::Result;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Progress callback: (submissions done, submissions total).
pub type ProgressCallback = Box<dyn Fn(usize, usize) + Send + Sync>;

/// Per-submission analysis pipeline.
pub struct Pipeline {
    /// Number of worker threads for parallel execution
    workers: usize,
    /// Cap on reply-chain depth during tree construction
    max_depth: usize,
    /// Authors excluded from participation statistics
    excluded_authors: Vec<String>,
    /// Optional injected text classifier for submission sentiment
    classifier: Option<Arc<dyn TextClassifier>>,
    /// Progress callback for reporting execution status
    progress_callback: Option<ProgressCallback>,
}

impl Pipeline {
    /// Create a new pipeline.
    ///
    /// # Arguments
    /// * `workers` - Number of worker threads (0 = auto-detect)
    pub fn new(workers: usize) -> Self {
        let actual_workers = if workers == 0 {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
                .min(16)
        } else {
            workers
        };

        Self {
            workers: actual_workers,
            max_depth: DEFAULT_MAX_DEPTH,
            excluded_authors: vec![crate::models::DELETED_AUTHOR.to_string()],
            classifier: None,
            progress_callback: None,
        }
    }

    /// Set the traversal depth cap.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Replace the participation exclusion list.
    pub fn with_excluded_authors(mut self, authors: Vec<String>) -> Self {
        self.excluded_authors = authors;
        self
    }

    /// Inject a text classifier for submission sentiment labels.
    pub fn with_classifier(mut self, classifier: Arc<dyn TextClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Set a progress callback.
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Analyze every submission in the table.
    ///
    /// Results come back in table order regardless of worker count.
    pub fn run(&self, submissions: &SubmissionTable, comments: &[Comment]) -> Result<RunReport> {
        let start = Instant::now();
        info!(
            "analyzing {} submissions over {} comments on {} workers",
            submissions.len(),
            comments.len(),
            self.workers
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()?;

        let completed = Arc::new(AtomicUsize::new(0));
        let total = submissions.len();
        let items: Vec<(&str, Option<&str>)> = submissions
            .records()
            .iter()
            .map(|r| (submissions.id_of(r), submissions.text_of(r)))
            .collect();

        let metrics: Vec<ThreadMetrics> = pool.install(|| {
            items
                .par_iter()
                .map(|&(id, text)| {
                    let record = self.analyze_submission(id, text, comments);

                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    if let Some(ref callback) = self.progress_callback {
                        callback(done, total);
                    }

                    record
                })
                .collect()
        });

        let summary = RunSummary {
            submissions: metrics.len(),
            comments: comments.len(),
            tree_failures: metrics.iter().filter(|m| m.tree_metrics_missing()).count(),
            duration_ms: start.elapsed().as_millis() as u64,
            emotions_enabled: self.classifier.is_some(),
        };
        info!(
            "analysis complete: {} submissions, {} tree failures in {}ms",
            summary.submissions, summary.tree_failures, summary.duration_ms
        );

        Ok(RunReport { metrics, summary })
    }

    /// Analyze one submission. Never fails: every error downgrades to
    /// unknown metrics for this submission only.
    fn analyze_submission(
        &self,
        submission_id: &str,
        text: Option<&str>,
        comments: &[Comment],
    ) -> ThreadMetrics {
        let emotion = self.label_text(submission_id, text);

        match tree::build(submission_id, comments, self.max_depth) {
            Ok(tree) => {
                let gini = match metrics::gini_coefficient(&tree, &self.excluded_authors) {
                    Ok(g) => Some(g),
                    Err(e) => {
                        debug!(submission = submission_id, "gini unavailable: {e}");
                        None
                    }
                };
                let post_duration = match metrics::post_duration_hours(&tree) {
                    Ok(hours) => Some(hours),
                    Err(e @ MetricError::MalformedTimestamp { .. }) => {
                        warn!(submission = submission_id, "duration unavailable: {e}");
                        None
                    }
                    Err(e) => {
                        debug!(submission = submission_id, "duration unavailable: {e}");
                        None
                    }
                };

                ThreadMetrics {
                    submission_id: submission_id.to_string(),
                    no_comments: metrics::node_count(&tree),
                    no_controversial: metrics::controversial_count(&tree),
                    depth: Some(metrics::depth(&tree)),
                    wiener_index: Some(metrics::wiener_index(&tree)),
                    gini_coefficient: gini,
                    post_duration,
                    emotion,
                }
            }
            Err(e) => {
                warn!("tree construction failed for submission '{submission_id}': {e}");
                let (no_comments, no_controversial) = raw_counts(submission_id, comments);
                let mut record =
                    ThreadMetrics::tree_failed(submission_id.to_string(), no_comments, no_controversial);
                record.emotion = emotion;
                record
            }
        }
    }

    fn label_text(&self, submission_id: &str, text: Option<&str>) -> Option<String> {
        let classifier = self.classifier.as_ref()?;
        let text = text?;
        match classifier.classify(text) {
            Ok(labels) => labels.into_iter().next().map(|l| l.name),
            Err(e) => {
                warn!(
                    submission = submission_id,
                    "classifier {} failed: {e}",
                    classifier.name()
                );
                None
            }
        }
    }
}

/// Counts over the raw filtered subset, used when no tree exists.
fn raw_counts(submission_id: &str, comments: &[Comment]) -> (u64, u64) {
    comments
        .iter()
        .filter(|c| c.link_id == submission_id)
        .fold((0, 0), |(n, contested), c| {
            (n + 1, contested + u64::from(c.controversiality))
        })
}

/// Everything one `run` produced.
pub struct RunReport {
    /// One record per submission, in table order.
    pub metrics: Vec<ThreadMetrics>,
    pub summary: RunSummary,
}

/// Statistics from one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub submissions: usize,
    pub comments: usize,
    /// Submissions whose reply tree could not be built
    pub tree_failures: usize,
    pub duration_ms: u64,
    /// Whether a classifier contributed an emotion column
    pub emotions_enabled: bool,
}

impl RunSummary {
    /// Get a summary string.
    pub fn summary(&self) -> String {
        let mut parts = vec![
            format!("{} submissions", self.submissions),
            format!("{} comments", self.comments),
        ];
        if self.tree_failures > 0 {
            parts.push(format!("{} tree failures", self.tree_failures));
        }
        if self.emotions_enabled {
            parts.push("emotions labeled".to_string());
        }
        parts.push(format!("{}ms", self.duration_ms));
        parts.join(", ")
    }
}
