//! Belief tree entity and representation mode

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Reserved identifier of the tree's root node.
pub const ROOT_ID: &str = "root";

/// Probability every root denotes, in either mode.
pub const CERTAINTY: f64 = 100.0;

/// How `Node::probability` is expressed across the whole tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Share of the root (0-100), bounded by the parent's absolute value
    Absolute,
    /// Percentage of the immediate parent (0-100)
    #[default]
    Relative,
}

impl Mode {
    pub fn from_is_absolute(is_absolute: bool) -> Self {
        if is_absolute {
            Mode::Absolute
        } else {
            Mode::Relative
        }
    }

    pub fn is_absolute(self) -> bool {
        matches!(self, Mode::Absolute)
    }

    /// Value the children of a node with `probability` should sum to.
    pub fn target_for(self, probability: f64) -> f64 {
        match self {
            Mode::Absolute => probability,
            Mode::Relative => CERTAINTY,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Absolute => write!(f, "absolute"),
            Mode::Relative => write!(f, "relative"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "absolute" | "abs" => Ok(Mode::Absolute),
            "relative" | "rel" => Ok(Mode::Relative),
            other => Err(format!("unknown mode: {other}")),
        }
    }
}

/// A named belief carrying a probability weight.
///
/// Nodes are plain values: every operation in [`crate::domain`] takes a borrowed
/// tree and returns a new one, so a snapshot held by a caller never changes.
/// `children` is `None` for leaves; an empty list is never produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub probability: f64,
    #[serde(default, skip_serializing_if = "is_false")]
    pub locked: bool,
    #[serde(default)]
    pub expanded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Node {
    /// Fresh leaf: unlocked, collapsed, probability 0.
    pub fn leaf(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            probability: 0.0,
            locked: false,
            expanded: false,
            children: None,
        }
    }

    /// Root of a new distribution: full certainty, expanded, no children.
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            id: ROOT_ID.to_string(),
            name: name.into(),
            probability: CERTAINTY,
            locked: false,
            expanded: true,
            children: None,
        }
    }

    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    /// Replace the children; an empty vector turns the node into a leaf.
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = if children.is_empty() {
            None
        } else {
            Some(children)
        };
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Children as a slice; empty for leaves.
    pub fn children(&self) -> &[Node] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Sum of the direct children's probabilities.
    pub fn children_sum(&self) -> f64 {
        self.children().iter().map(|c| c.probability).sum()
    }

    /// Number of nodes in this subtree, including self.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(Node::node_count).sum::<usize>()
    }

    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(Node::depth).max().unwrap_or(0)
    }

    /// Pre-order iterator over this subtree.
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }

    /// Turn every `Some(vec![])` in the subtree into `None`.
    pub fn prune_empty_children(mut self) -> Self {
        self.children = match self.children.take() {
            Some(children) if !children.is_empty() => Some(
                children
                    .into_iter()
                    .map(Node::prune_empty_children)
                    .collect(),
            ),
            _ => None,
        };
        self
    }

    /// Absolute share of every node in this tree, pre-order.
    ///
    /// The receiver is treated as the root and always reports [`CERTAINTY`].
    pub fn absolute_values(&self, mode: Mode) -> Vec<(String, f64)> {
        let mut out = Vec::with_capacity(self.node_count());
        out.push((self.id.clone(), CERTAINTY));
        for child in self.children() {
            collect_absolute(child, CERTAINTY, mode, &mut out);
        }
        out
    }
}

fn collect_absolute(node: &Node, parent_abs: f64, mode: Mode, out: &mut Vec<(String, f64)>) {
    let abs = match mode {
        Mode::Absolute => node.probability,
        Mode::Relative => node.probability / CERTAINTY * parent_abs,
    };
    out.push((node.id.clone(), abs));
    for child in node.children() {
        collect_absolute(child, abs, mode, out);
    }
}

pub struct PreOrder<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        for child in current.children().iter().rev() {
            self.stack.push(child);
        }
        Some(current)
    }
}
