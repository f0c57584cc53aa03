//! Participation inequality over thread authors

use crate::metrics::MetricError;
use crate::tree::ReplyTree;
use rustc_hash::FxHashMap;

/// Gini coefficient of per-author comment counts within one thread.
///
/// Walks every reachable tree node, tallies comments per author, and
/// drops authors on the exclusion list (deleted accounts). With the
/// remaining counts sorted ascending as y_1..y_n, the coefficient is
/// `Σ (2i − n − 1) · y_i / (n · Σy)` (1-indexed).
///
/// Zero qualifying authors (empty thread, or every author excluded) has
/// no defined value and returns [`MetricError::Undefined`].
pub fn gini_coefficient(
    tree: &ReplyTree<'_>,
    excluded_authors: &[String],
) -> Result<f64, MetricError> {
    let mut per_author: FxHashMap<&str, u64> = FxHashMap::default();
    for node in tree.nodes() {
        let author = tree.comment_of(node).author.as_str();
        if excluded_authors.iter().any(|e| e == author) {
            continue;
        }
        *per_author.entry(author).or_insert(0) += 1;
    }

    let mut counts: Vec<u64> = per_author.into_values().collect();
    counts.sort_unstable();

    let n = counts.len();
    let total: u64 = counts.iter().sum();
    if n == 0 || total == 0 {
        return Err(MetricError::Undefined {
            reason: "no qualifying authors",
        });
    }

    let weighted: i64 = counts
        .iter()
        .enumerate()
        .map(|(i, &y)| (2 * (i as i64 + 1) - n as i64 - 1) * y as i64)
        .sum();

    Ok(weighted as f64 / (n as f64 * total as f64))
}
