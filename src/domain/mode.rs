//! Conversion between absolute and relative representation.

use tracing::instrument;

use crate::domain::node::{Mode, Node, CERTAINTY};

/// Re-express every probability in `root` for mode `to`, given it is stored in `from`.
///
/// The receiver is the root: it always ends up at [`CERTAINTY`]. Converting to
/// the mode the tree is already in returns an unchanged copy.
#[instrument(level = "debug", skip(root))]
pub fn switch_mode(root: &Node, from: Mode, to: Mode) -> Node {
    if from == to {
        return root.clone();
    }
    let mut copy = root.clone();
    copy.probability = CERTAINTY;
    // children of the root always convert against full certainty
    copy.children = root.children.as_ref().map(|children| {
        children
            .iter()
            .map(|c| convert(c, CERTAINTY, to))
            .collect()
    });
    copy
}

/// `parent_abs` is the parent's absolute value before conversion.
fn convert(node: &Node, parent_abs: f64, to: Mode) -> Node {
    let (value, own_abs) = match to {
        Mode::Absolute => {
            let abs = node.probability / CERTAINTY * parent_abs;
            (abs, abs)
        }
        Mode::Relative => (ratio(node.probability, parent_abs) * CERTAINTY, node.probability),
    };

    let mut copy = node.clone();
    copy.probability = value;
    copy.children = node.children.as_ref().map(|children| {
        children
            .iter()
            .map(|c| convert(c, own_abs, to))
            .collect()
    });
    copy
}

/// `numerator / denominator`, or 0 when the denominator is 0.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::mutation::find;

    fn relative_tree() -> Node {
        Node::root("q").with_children(vec![
            Node::leaf("p", "P")
                .with_probability(50.0)
                .with_children(vec![
                    Node::leaf("x", "X")
                        .with_probability(40.0)
                        .with_children(vec![Node::leaf("x1", "X1").with_probability(25.0)]),
                    Node::leaf("y", "Y").with_probability(60.0),
                ]),
            Node::leaf("q", "Q").with_probability(50.0),
        ])
    }

    fn prob(tree: &Node, id: &str) -> f64 {
        find(tree, id).unwrap().probability
    }

    #[test]
    fn given_relative_tree_when_switch_to_absolute_then_scales_by_parent_absolute() {
        let abs = switch_mode(&relative_tree(), Mode::Relative, Mode::Absolute);
        assert_eq!(abs.probability, 100.0);
        assert!((prob(&abs, "p") - 50.0).abs() < 1e-9);
        assert!((prob(&abs, "x") - 20.0).abs() < 1e-9);
        assert!((prob(&abs, "x1") - 5.0).abs() < 1e-9);
        assert!((prob(&abs, "y") - 30.0).abs() < 1e-9);
    }

    #[test]
    fn given_absolute_tree_when_switch_to_relative_then_uses_old_parent_absolute() {
        let abs = switch_mode(&relative_tree(), Mode::Relative, Mode::Absolute);
        let rel = switch_mode(&abs, Mode::Absolute, Mode::Relative);
        assert!((prob(&rel, "x") - 40.0).abs() < 1e-9);
        assert!((prob(&rel, "x1") - 25.0).abs() < 1e-9);
        assert_eq!(rel.probability, 100.0);
    }

    #[test]
    fn given_zero_parent_when_switch_to_relative_then_yields_zero() {
        let tree = Node::root("q").with_children(vec![Node::leaf("p", "P")
            .with_probability(0.0)
            .with_children(vec![Node::leaf("c", "C").with_probability(7.0)])]);
        let rel = switch_mode(&tree, Mode::Absolute, Mode::Relative);
        assert_eq!(prob(&rel, "c"), 0.0);
        assert!(prob(&rel, "c").is_finite());
    }

    #[test]
    fn given_same_mode_when_switching_then_unchanged() {
        let tree = relative_tree();
        assert_eq!(switch_mode(&tree, Mode::Relative, Mode::Relative), tree);
    }

    #[test]
    fn given_root_with_odd_value_when_switching_then_root_reports_certainty() {
        let tree = relative_tree().with_probability(42.0);
        assert_eq!(
            switch_mode(&tree, Mode::Relative, Mode::Absolute).probability,
            100.0
        );
    }
}
