//! Shared tree builders and proptest strategies.
#![allow(dead_code)]

use proptest::prelude::*;

use probtree::domain::{Node, ROOT_ID};

/// Give every non-root node a unique id `n<k>` in pre-order.
pub fn assign_ids(root: Node) -> Node {
    fn walk(mut node: Node, next: &mut usize) -> Node {
        if node.id != ROOT_ID {
            node.id = format!("n{next}");
            node.name = format!("belief {next}");
            *next += 1;
        }
        node.children = node
            .children
            .map(|children| children.into_iter().map(|c| walk(c, next)).collect());
        node
    }
    let mut next = 0;
    walk(root, &mut next)
}

fn arb_node() -> impl Strategy<Value = Node> {
    let leaf = (0.0f64..100.0, any::<bool>()).prop_map(|(p, locked)| {
        Node::leaf("", "").with_probability(p).with_locked(locked)
    });
    leaf.prop_recursive(4, 48, 5, |inner| {
        (
            0.0f64..100.0,
            any::<bool>(),
            any::<bool>(),
            prop::collection::vec(inner, 1..5),
        )
            .prop_map(|(p, locked, expanded, children)| {
                Node::leaf("", "")
                    .with_probability(p)
                    .with_locked(locked)
                    .with_expanded(expanded)
                    .with_children(children)
            })
    })
}

/// Random tree rooted at `"root"` with unique ids and unconstrained weights.
pub fn arb_tree() -> impl Strategy<Value = Node> {
    prop::collection::vec(arb_node(), 0..5)
        .prop_map(|children| assign_ids(Node::root("question").with_children(children)))
}

/// The worked example: root with children A (locked) B C D.
pub fn four_children(values: [f64; 4], locked: [bool; 4]) -> Node {
    let names = ["A", "B", "C", "D"];
    let children = names
        .iter()
        .zip(values.iter().zip(locked.iter()))
        .map(|(name, (p, l))| {
            Node::leaf(name.to_lowercase(), *name)
                .with_probability(*p)
                .with_locked(*l)
        })
        .collect();
    Node::root("question").with_children(children)
}

pub fn probability_of(tree: &Node, id: &str) -> f64 {
    tree.iter()
        .find(|n| n.id == id)
        .map(|n| n.probability)
        .unwrap_or_else(|| panic!("no node {id}"))
}
