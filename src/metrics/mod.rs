//! Per-thread metric extractors
//!
//! Each extractor is an independent function over one submission's reply
//! tree and/or its raw filtered comment subset:
//! - `structure`: node count, depth, branch-dispersion index, controversy
//! - `authors`: participation Gini coefficient
//! - `dates`: activity duration in hours
//!
//! Two scopes matter and deliberately differ: counts read the raw subset
//! (unreachable comments included), everything else walks the tree.

mod authors;
mod dates;
mod structure;

pub use authors::gini_coefficient;
pub use dates::post_duration_hours;
pub use structure::{controversial_count, depth, node_count, wiener_index};

use thiserror::Error;

/// Errors scoped to a single metric for a single submission.
///
/// Neither aborts anything: the pipeline records the metric as unknown
/// and every other metric for the submission is unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricError {
    /// The metric has no defined value on this input (for example a Gini
    /// coefficient over zero qualifying authors). Distinct from a
    /// division fault by construction: the denominator is never formed.
    #[error("metric undefined: {reason}")]
    Undefined { reason: &'static str },

    /// A `created_utc` value did not parse as ISO-8601. Upstream prep is
    /// responsible for normalization, so this indicates a dirty input.
    #[error("malformed timestamp '{value}'")]
    MalformedTimestamp { value: String },
}
