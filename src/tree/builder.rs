//! Iterative reply-tree builder
//!
//! Builds the arena tree for one submission from the flat comment table:
//! group comments by `parent_id`, then walk down from the submission id
//! with an explicit stack. Native recursion is never used, so hostile
//! input depth cannot exhaust the call stack; a configurable depth cap
//! bounds the walk outright.
//!
//! Cycle detection runs twice. The descent tracks the ids on the current
//! path and fails the moment a comment would be revisited along its own
//! ancestor chain. Comments the descent never reached are then scanned by
//! walking their parent chains, so a detached cycle (A's parent is B, B's
//! parent is A) still fails the build instead of hiding among the
//! silently-unreachable.

use crate::models::Comment;
use crate::tree::{NodeId, ReplyTree, TreeError, TreeNode};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

/// Default cap on reply-chain depth during construction.
pub const DEFAULT_MAX_DEPTH: usize = 500;

enum Step<'a> {
    /// Visit a comment at the given depth, attaching under `parent`
    /// (`None` = top level).
    Enter {
        comment: usize,
        parent: Option<NodeId>,
        depth: usize,
        id: &'a str,
    },
    /// Pop a comment id off the ancestor path.
    Leave { id: &'a str },
}

/// Build the reply tree for `submission_id`.
///
/// The builder performs the `link_id` filter itself; zero matching
/// comments yields an empty tree, not an error.
pub fn build<'a>(
    submission_id: &str,
    comments: &'a [Comment],
    max_depth: usize,
) -> Result<ReplyTree<'a>, TreeError> {
    let filtered: Vec<&'a Comment> = comments
        .iter()
        .filter(|c| c.link_id == submission_id)
        .collect();

    // Adjacency: parent id -> filtered indices, preserving input order.
    let mut children_of: FxHashMap<&'a str, Vec<usize>> = FxHashMap::default();
    for (i, &c) in filtered.iter().enumerate() {
        children_of.entry(c.parent_id.as_str()).or_default().push(i);
    }

    let mut tree = ReplyTree {
        comments: filtered,
        nodes: Vec::new(),
        roots: Vec::new(),
    };
    let mut placed = vec![false; tree.comments.len()];
    let mut on_path: FxHashSet<&'a str> = FxHashSet::default();
    let mut stack: Vec<Step<'a>> = Vec::new();

    if let Some(top) = children_of.get(submission_id) {
        for &i in top.iter().rev() {
            stack.push(Step::Enter {
                comment: i,
                parent: None,
                depth: 1,
                id: tree.comments[i].id.as_str(),
            });
        }
    }

    while let Some(step) = stack.pop() {
        match step {
            Step::Leave { id } => {
                on_path.remove(id);
            }
            Step::Enter {
                comment,
                parent,
                depth,
                id,
            } => {
                if on_path.contains(id) {
                    return Err(TreeError::CycleDetected {
                        submission_id: submission_id.to_string(),
                        comment_id: id.to_string(),
                    });
                }
                if depth > max_depth {
                    return Err(TreeError::DepthLimitExceeded {
                        submission_id: submission_id.to_string(),
                        limit: max_depth,
                    });
                }
                // Duplicate ids alias the same children list; keep the
                // first placement so a comment appears at most once.
                if placed[comment] {
                    continue;
                }
                placed[comment] = true;

                let node_id = tree.nodes.len();
                tree.nodes.push(TreeNode {
                    comment,
                    children: Vec::new(),
                });
                match parent {
                    Some(p) => tree.nodes[p].children.push(node_id),
                    None => tree.roots.push(node_id),
                }

                on_path.insert(id);
                stack.push(Step::Leave { id });
                if let Some(kids) = children_of.get(id) {
                    for &k in kids.iter().rev() {
                        stack.push(Step::Enter {
                            comment: k,
                            parent: Some(node_id),
                            depth: depth + 1,
                            id: tree.comments[k].id.as_str(),
                        });
                    }
                }
            }
        }
    }

    scan_unreachable(submission_id, &tree, &placed, max_depth)?;

    if tree.nodes.len() < tree.comments.len() {
        debug!(
            submission = submission_id,
            reachable = tree.nodes.len(),
            total = tree.comments.len(),
            "some comments are unreachable from the submission root"
        );
    }

    Ok(tree)
}

/// Walk the parent chains of comments the descent never placed.
///
/// An unplaced comment is fine when its chain dangles (parent deleted
/// upstream) or rejoins the built tree; a chain that revisits itself is a
/// cycle and fails the build.
fn scan_unreachable(
    submission_id: &str,
    tree: &ReplyTree<'_>,
    placed: &[bool],
    max_depth: usize,
) -> Result<(), TreeError> {
    let mut by_id: FxHashMap<&str, usize> = FxHashMap::default();
    for (i, &c) in tree.comments().iter().enumerate() {
        by_id.entry(c.id.as_str()).or_insert(i);
    }

    let mut cleared = vec![false; placed.len()];
    for start in 0..placed.len() {
        if placed[start] || cleared[start] {
            continue;
        }
        let mut chain: Vec<usize> = Vec::new();
        let mut chain_ids: FxHashSet<&str> = FxHashSet::default();
        let mut cur = start;
        loop {
            let c = tree.comments()[cur];
            if !chain_ids.insert(c.id.as_str()) {
                return Err(TreeError::CycleDetected {
                    submission_id: submission_id.to_string(),
                    comment_id: c.id.clone(),
                });
            }
            if chain.len() >= max_depth {
                return Err(TreeError::DepthLimitExceeded {
                    submission_id: submission_id.to_string(),
                    limit: max_depth,
                });
            }
            chain.push(cur);
            match by_id.get(c.parent_id.as_str()) {
                Some(&next) if !placed[next] && !cleared[next] => cur = next,
                _ => break,
            }
        }
        for i in chain {
            cleared[i] = true;
        }
    }
    Ok(())
}
