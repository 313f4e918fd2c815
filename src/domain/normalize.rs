//! Normalization engine and the non-mutating "not normalized" check.

use tracing::{instrument, warn};

use crate::domain::mutation::map_node;
use crate::domain::node::{Mode, Node};

/// Absolute tolerance used when reporting a node as not normalized.
pub const SUM_TOLERANCE: f64 = 0.01;

/// Rescale the children of `node_id` so unlocked siblings fill what the locked
/// ones leave of the target, then do the same for every descendant.
///
/// Locked children keep their exact value. Returns the tree unchanged when
/// `node_id` does not exist.
#[instrument(level = "debug", skip(root))]
pub fn normalize(root: &Node, node_id: &str, mode: Mode) -> Node {
    map_node(root, node_id, |n| normalize_subtree(n, mode))
}

/// Normalize `node` and its whole subtree.
pub fn normalize_subtree(node: &Node, mode: Mode) -> Node {
    let Some(children) = node.children.as_ref() else {
        return node.clone();
    };

    let target = mode.target_for(node.probability);
    let locked_sum: f64 = children
        .iter()
        .filter(|c| c.locked)
        .map(|c| c.probability)
        .sum();
    if locked_sum > target {
        warn!(
            "locked children of {} sum to {} which exceeds target {}",
            node.id, locked_sum, target
        );
    }
    let remaining = (target - locked_sum).max(0.0);

    let unlocked_count = children.iter().filter(|c| !c.locked).count();
    let unlocked_sum: f64 = children
        .iter()
        .filter(|c| !c.locked)
        .map(|c| c.probability)
        .sum();

    let normalized = children
        .iter()
        .map(|child| {
            let scaled = if child.locked {
                child.clone()
            } else if unlocked_sum > 0.0 {
                child
                    .clone()
                    .with_probability(child.probability / unlocked_sum * remaining)
            } else {
                child
                    .clone()
                    .with_probability(remaining / unlocked_count as f64)
            };
            normalize_subtree(&scaled, mode)
        })
        .collect();

    let mut copy = node.clone();
    copy.children = Some(normalized);
    copy
}

/// A node whose children do not sum to its target.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub node_id: String,
    pub name: String,
    pub sum: f64,
    pub target: f64,
    /// Locked children alone exceed the target; normalizing cannot fix this.
    pub over_committed: bool,
}

/// Whether the direct children of `node` sum to its target within [`SUM_TOLERANCE`].
///
/// Leaves are always normalized.
pub fn is_normalized(node: &Node, mode: Mode) -> bool {
    if node.is_leaf() {
        return true;
    }
    (node.children_sum() - mode.target_for(node.probability)).abs() < SUM_TOLERANCE
}

/// Every internal node failing [`is_normalized`], in pre-order.
pub fn violations(root: &Node, mode: Mode) -> Vec<Violation> {
    root.iter()
        .filter(|n| !is_normalized(n, mode))
        .map(|n| {
            let target = mode.target_for(n.probability);
            let locked_sum: f64 = n
                .children()
                .iter()
                .filter(|c| c.locked)
                .map(|c| c.probability)
                .sum();
            Violation {
                node_id: n.id.clone(),
                name: n.name.clone(),
                sum: n.children_sum(),
                target,
                over_committed: locked_sum > target,
            }
        })
        .collect()
}
