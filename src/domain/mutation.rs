//! Structure-preserving tree edits.
//!
//! Every function borrows the current root and returns a new root. When the
//! target id is absent the returned tree equals the input. Ids are expected to
//! be unique; if they are not, the first match in pre-order is the one edited.

use std::cmp::Ordering;

use itertools::Itertools;
use tracing::{debug, instrument, trace};
use uuid::Uuid;

use crate::domain::node::Node;

/// Pre-order first-match lookup.
pub fn find<'a>(root: &'a Node, id: &str) -> Option<&'a Node> {
    root.iter().find(|n| n.id == id)
}

/// Apply `edit` to the first node (pre-order) whose id is `id`.
///
/// Returns `None` when no node matched; otherwise the rebuilt subtree.
/// Siblings and untouched branches are cloned unchanged.
fn edit_first<F>(node: &Node, id: &str, edit: &mut F) -> Option<Node>
where
    F: FnMut(&Node) -> Node,
{
    if node.id == id {
        return Some(edit(node));
    }
    let children = node.children.as_ref()?;
    for (i, child) in children.iter().enumerate() {
        if let Some(replaced) = edit_first(child, id, edit) {
            let mut new_children = children.clone();
            new_children[i] = replaced;
            let mut copy = node.clone();
            copy.children = Some(new_children);
            return Some(copy);
        }
    }
    None
}

/// Run `edit_first` from the root, falling back to an unchanged copy.
pub(crate) fn map_node<F>(root: &Node, id: &str, mut edit: F) -> Node
where
    F: FnMut(&Node) -> Node,
{
    edit_first(root, id, &mut edit).unwrap_or_else(|| {
        trace!("node not found: {}", id);
        root.clone()
    })
}

/// Replace the node carrying `updated.id` wholesale.
#[instrument(level = "debug", skip(root, updated), fields(id = %updated.id))]
pub fn update(root: &Node, updated: Node) -> Node {
    let id = updated.id.clone();
    map_node(root, &id, |_| updated.clone())
}

pub fn rename(root: &Node, id: &str, name: &str) -> Node {
    map_node(root, id, |n| Node {
        name: name.to_string(),
        ..n.clone()
    })
}

pub fn reweight(root: &Node, id: &str, probability: f64) -> Node {
    map_node(root, id, |n| n.clone().with_probability(probability))
}

pub fn set_locked(root: &Node, id: &str, locked: bool) -> Node {
    map_node(root, id, |n| n.clone().with_locked(locked))
}

/// Append a fresh leaf under `parent_id` and expand the parent.
///
/// Returns the new root and the generated child id, or `None` for the id
/// when the parent does not exist.
#[instrument(level = "debug", skip(root))]
pub fn add_child(root: &Node, parent_id: &str) -> (Node, Option<String>) {
    let child = Node::leaf(Uuid::new_v4().to_string(), "");
    let child_id = child.id.clone();
    let mut added = false;
    let new_root = map_node(root, parent_id, |parent| {
        added = true;
        let mut children = parent.children().to_vec();
        children.push(child.clone());
        parent.clone().with_children(children).with_expanded(true)
    });
    if added {
        debug!("added child {} under {}", child_id, parent_id);
        (new_root, Some(child_id))
    } else {
        (new_root, None)
    }
}

/// Drop the first node (pre-order) with `node_id` together with its subtree.
///
/// The node passed in as `root` is never removed. A parent left without
/// children becomes a leaf.
#[instrument(level = "debug", skip(root))]
pub fn remove_node(root: &Node, node_id: &str) -> Node {
    if root.id == node_id {
        return root.clone();
    }
    remove_first(root, node_id).unwrap_or_else(|| root.clone())
}

fn remove_first(node: &Node, node_id: &str) -> Option<Node> {
    let children = node.children.as_ref()?;
    for (i, child) in children.iter().enumerate() {
        if child.id == node_id {
            let mut remaining = children.clone();
            remaining.remove(i);
            return Some(node.clone().with_children(remaining));
        }
        if let Some(replaced) = remove_first(child, node_id) {
            let mut new_children = children.clone();
            new_children[i] = replaced;
            return Some(node.clone().with_children(new_children));
        }
    }
    None
}

/// Flip `expanded`; leaves are left alone.
pub fn toggle(root: &Node, node_id: &str) -> Node {
    map_node(root, node_id, |n| {
        if n.is_leaf() {
            n.clone()
        } else {
            let expanded = !n.expanded;
            n.clone().with_expanded(expanded)
        }
    })
}

/// Order every children list by probability, highest first.
///
/// Equal probabilities keep their current order.
pub fn sort(root: &Node) -> Node {
    let mut copy = root.clone();
    copy.children = root.children.as_ref().map(|children| {
        children
            .iter()
            .map(sort)
            .sorted_by(|a, b| {
                b.probability
                    .partial_cmp(&a.probability)
                    .unwrap_or(Ordering::Equal)
            })
            .collect()
    });
    copy
}
