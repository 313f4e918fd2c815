//! Read-only terminal rendering of a tree snapshot.

use colored::Colorize;
use termtree::Tree;

use crate::domain::{is_normalized, Mode, Node, CERTAINTY};

pub trait ToTermTree {
    /// Render as a `termtree` tree. Collapsed subtrees are folded unless `all`.
    fn to_term_tree(&self, mode: Mode, all: bool) -> Tree<String>;
}

impl ToTermTree for Node {
    fn to_term_tree(&self, mode: Mode, all: bool) -> Tree<String> {
        build(self, mode, all, None)
    }
}

/// `parent_abs` is `None` for the top of the rendering, which counts as certainty.
fn build(node: &Node, mode: Mode, all: bool, parent_abs: Option<f64>) -> Tree<String> {
    let abs = match (parent_abs, mode) {
        (None, _) => CERTAINTY,
        (Some(_), Mode::Absolute) => node.probability,
        (Some(parent), Mode::Relative) => node.probability / CERTAINTY * parent,
    };
    // the top of the rendering is always open
    let folded = !(parent_abs.is_none() || all || node.expanded) && !node.is_leaf();
    let mut tree = Tree::new(label(node, mode, folded, abs));
    if folded {
        return tree;
    }
    for child in node.children() {
        tree.push(build(child, mode, all, Some(abs)));
    }
    tree
}

fn label(node: &Node, mode: Mode, folded: bool, abs: f64) -> String {
    let name = if node.name.is_empty() {
        "(unnamed)".dimmed().to_string()
    } else {
        node.name.bold().to_string()
    };
    // full id: editing commands match it exactly
    let mut parts = vec![
        name,
        format!("{:.1}%", node.probability),
        format!("[{}]", node.id).dimmed().to_string(),
    ];
    if mode == Mode::Relative {
        parts.push(format!("(abs {:.1}%)", abs).dimmed().to_string());
    }
    if node.locked {
        parts.push("locked".blue().to_string());
    }
    if folded {
        parts.push(format!("+{} hidden", node.node_count() - 1).dimmed().to_string());
    }
    if !is_normalized(node, mode) {
        parts.push(
            format!(
                "children sum to {:.1}, expected {:.1}",
                node.children_sum(),
                mode.target_for(node.probability)
            )
            .yellow()
            .to_string(),
        );
    }
    parts.join(" ")
}
