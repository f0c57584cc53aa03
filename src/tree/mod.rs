//! Reply tree construction and representation
//!
//! One tree per submission. The root is implicit (the submission itself is
//! never materialized as a node); top-level comments hang directly off it.
//! Nodes live in a flat arena and parent→child edges are arena indices, so
//! traversal never follows owned pointers deeper than one hop and needs no
//! back-references.
//!
//! Trees are transient: the pipeline builds one, reads its metrics, and
//! drops it.

mod builder;

pub use builder::{build, DEFAULT_MAX_DEPTH};

use crate::models::Comment;
use thiserror::Error;

/// Index of a node in the tree arena.
pub type NodeId = usize;

/// Errors that can occur while building a reply tree.
///
/// Both are non-fatal to a batch run: the affected submission's
/// tree-dependent metrics are recorded as unknown and processing moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The parent/child relation revisits a comment along its own
    /// ancestor chain. Covers cycles reachable from the root as well as
    /// detached ones (e.g. two comments naming each other as parent).
    #[error("reply cycle at comment '{comment_id}' under submission '{submission_id}'")]
    CycleDetected {
        submission_id: String,
        comment_id: String,
    },

    /// A reply chain descended past the configured traversal cap.
    #[error("reply chain under submission '{submission_id}' exceeds depth limit {limit}")]
    DepthLimitExceeded { submission_id: String, limit: usize },
}

/// A single node in the reply tree arena.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Index of this node's comment in the tree's filtered subset.
    pub comment: usize,
    /// Arena ids of direct replies, in input order.
    pub children: Vec<NodeId>,
}

impl TreeNode {
    /// A comment nobody replied to.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// The reply tree for one submission.
///
/// Holds the raw filtered comment subset alongside the arena. The two can
/// disagree on size: a comment whose parent was never reached stays in the
/// subset (and in subset-scoped metrics) without ever becoming a node.
/// That inconsistency is part of the metric contract, not an oversight.
#[derive(Debug)]
pub struct ReplyTree<'a> {
    /// Every comment whose `link_id` names this submission, input order.
    comments: Vec<&'a Comment>,
    /// Arena of reachable nodes, in depth-first discovery order.
    nodes: Vec<TreeNode>,
    /// Arena ids of top-level comments (direct replies to the submission).
    roots: Vec<NodeId>,
}

impl<'a> ReplyTree<'a> {
    /// Number of comments under this submission, reachable or not.
    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    /// Number of comments actually reachable from the implicit root.
    pub fn reachable_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no reachable comments at all.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Arena ids of the top-level comments.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id]
    }

    /// All reachable nodes, in discovery order.
    pub fn nodes(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter()
    }

    /// The comment a node was built from.
    pub fn comment_of(&self, node: &TreeNode) -> &'a Comment {
        self.comments[node.comment]
    }

    /// The raw filtered subset this tree was built from.
    pub fn comments(&self) -> &[&'a Comment] {
        &self.comments
    }
}
