//! Activity duration of a thread

use crate::metrics::MetricError;
use crate::tree::ReplyTree;
use chrono::NaiveDateTime;

/// Hours between the first top-level reply and the last leaf reply.
///
/// `first` is the minimum `created_utc` over the tree's top-level
/// comments; `last` is the maximum over its leaves (nodes nobody replied
/// to), found by walking the full tree. The result is fractional hours
/// and can be negative if a top-level comment postdates every leaf.
///
/// Timestamps must already be ISO-8601 (upstream prep normalizes epochs);
/// a value that does not parse fails with
/// [`MetricError::MalformedTimestamp`], which is scoped to this metric
/// only. An empty tree has no defined duration.
pub fn post_duration_hours(tree: &ReplyTree<'_>) -> Result<f64, MetricError> {
    if tree.is_empty() {
        return Err(MetricError::Undefined {
            reason: "no reachable comments",
        });
    }

    let mut first: Option<NaiveDateTime> = None;
    for &root in tree.roots() {
        let ts = parse_timestamp(&tree.comment_of(tree.node(root)).created_utc)?;
        first = Some(match first {
            Some(cur) => cur.min(ts),
            None => ts,
        });
    }

    let mut last: Option<NaiveDateTime> = None;
    for node in tree.nodes() {
        if !node.is_leaf() {
            continue;
        }
        let ts = parse_timestamp(&tree.comment_of(node).created_utc)?;
        last = Some(match last {
            Some(cur) => cur.max(ts),
            None => ts,
        });
    }

    match (first, last) {
        (Some(first), Some(last)) => Ok((last - first).num_seconds() as f64 / 3600.0),
        // a non-empty tree always has at least one root and one leaf
        _ => Err(MetricError::Undefined {
            reason: "no timestamps",
        }),
    }
}

fn parse_timestamp(value: &str) -> Result<NaiveDateTime, MetricError> {
    value
        .parse::<NaiveDateTime>()
        .map_err(|_| MetricError::MalformedTimestamp {
            value: value.to_string(),
        })
}
