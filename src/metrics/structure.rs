//! Structural metrics: size, depth, branch dispersion, controversy

use crate::tree::{NodeId, ReplyTree};

/// Number of comments under the submission.
///
/// Counts the raw filtered subset, not the tree: a comment whose parent
/// vanished upstream is invisible to every tree walk but still counts
/// here. Historical behavior, kept on purpose.
pub fn node_count(tree: &ReplyTree<'_>) -> u64 {
    tree.comment_count() as u64
}

/// Sum of controversiality flags over the raw filtered subset.
///
/// Same scope as [`node_count`]: tree reachability is irrelevant.
pub fn controversial_count(tree: &ReplyTree<'_>) -> u64 {
    tree.comments()
        .iter()
        .map(|c| u64::from(c.controversiality))
        .sum()
}

/// Depth of the conversation.
///
/// An empty tree has depth 0. A non-empty tree counts one level for the
/// root being non-empty plus one level per node along the longest reply
/// chain: a single unanswered top-level comment measures 2, a linear
/// chain of k comments measures k+1. The extra root level is the
/// documented contract for this metric, not an off-by-one to fix.
pub fn depth(tree: &ReplyTree<'_>) -> u64 {
    if tree.roots().is_empty() {
        0
    } else {
        1 + chain_levels(tree, tree.roots())
    }
}

/// Branch-dispersion ("Wiener-like") index.
///
/// Not the classical Wiener index: no pairwise distances are summed.
/// With n = number of top-level branches and each branch measured as the
/// node-count of its longest chain, the index is
/// `sum(branch depths) / (n * (n - 1)) + 1`, and 0 by definition when
/// n <= 1.
pub fn wiener_index(tree: &ReplyTree<'_>) -> f64 {
    let n = tree.roots().len();
    if n <= 1 {
        return 0.0;
    }
    let total: u64 = tree
        .roots()
        .iter()
        .map(|&r| chain_levels(tree, &[r]))
        .sum();
    total as f64 / (n * (n - 1)) as f64 + 1.0
}

/// Longest chain length, in nodes, reachable from `start`.
///
/// Level-order walk; the frontier vectors keep the traversal off the
/// native call stack regardless of input shape.
fn chain_levels(tree: &ReplyTree<'_>, start: &[NodeId]) -> u64 {
    let mut frontier: Vec<NodeId> = start.to_vec();
    let mut levels = 0u64;
    while !frontier.is_empty() {
        levels += 1;
        frontier = frontier
            .iter()
            .flat_map(|&id| tree.node(id).children.iter().copied())
            .collect();
    }
    levels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Comment;
    use crate::tree::{build, DEFAULT_MAX_DEPTH};

    fn comment(id: &str, parent_id: &str) -> Comment {
        Comment {
            id: id.to_string(),
            parent_id: parent_id.to_string(),
            link_id: "s1".to_string(),
            author: format!("user_{id}"),
            created_utc: "2015-05-01T00:00:00".to_string(),
            controversiality: 0,
            body: None,
        }
    }

    fn tree_of(comments: &[Comment]) -> ReplyTree<'_> {
        build("s1", comments, DEFAULT_MAX_DEPTH).expect("build")
    }

    #[test]
    fn test_empty_thread() {
        let tree = tree_of(&[]);
        assert_eq!(node_count(&tree), 0);
        assert_eq!(depth(&tree), 0);
        assert_eq!(wiener_index(&tree), 0.0);
        assert_eq!(controversial_count(&tree), 0);
    }

    #[test]
    fn test_single_leaf_measures_two() {
        let comments = vec![comment("a", "s1")];
        let tree = tree_of(&comments);
        assert_eq!(depth(&tree), 2);
        // n = 1, defined as zero
        assert_eq!(wiener_index(&tree), 0.0);
    }

    #[test]
    fn test_linear_chain_depth_is_k_plus_one() {
        for k in 1..6usize {
            let mut comments = vec![comment("c0", "s1")];
            for i in 1..k {
                comments.push(comment(&format!("c{i}"), &format!("c{}", i - 1)));
            }
            let tree = tree_of(&comments);
            assert_eq!(depth(&tree), k as u64 + 1, "chain of {k}");
            assert_eq!(wiener_index(&tree), 0.0, "chain of {k} has one branch");
        }
    }

    #[test]
    fn test_two_leaf_branches_dispersion() {
        let comments = vec![comment("a", "s1"), comment("b", "s1")];
        let tree = tree_of(&comments);
        // (1 + 1) / (2 * 1) + 1
        assert_eq!(wiener_index(&tree), 2.0);
        assert_eq!(depth(&tree), 2);
    }

    #[test]
    fn test_uneven_branches_dispersion() {
        // branch a: a <- b <- c (3 levels), branch d: leaf (1 level)
        let comments = vec![
            comment("a", "s1"),
            comment("b", "a"),
            comment("c", "b"),
            comment("d", "s1"),
        ];
        let tree = tree_of(&comments);
        assert_eq!(wiener_index(&tree), (3.0 + 1.0) / 2.0 + 1.0);
        assert_eq!(depth(&tree), 4);
    }

    #[test]
    fn test_counts_include_unreachable() {
        let comments = vec![comment("a", "s1"), comment("b", "gone")];
        let tree = tree_of(&comments);
        assert_eq!(node_count(&tree), 2);
        assert_eq!(tree.reachable_count(), 1);
        // but depth only sees the reachable branch
        assert_eq!(depth(&tree), 2);
    }

    #[test]
    fn test_controversial_count() {
        let mut comments = vec![comment("a", "s1"), comment("b", "a"), comment("c", "gone")];
        comments[0].controversiality = 1;
        comments[2].controversiality = 1; // unreachable, still counted
        let tree = tree_of(&comments);
        assert_eq!(controversial_count(&tree), 2);
    }
}
