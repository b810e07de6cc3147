//! Deterministic 2-D layout of a binary tree.
//!
//! Each level sits `vertical_step` below its parent; children are offset
//! horizontally by the current spacing, which halves per level. Sibling
//! subtrees stay apart for shallow trees only, which is all this crate builds.

use generational_arena::Index;
use tracing::{instrument, trace};

use crate::domain::{Position, TreeArena};

/// Vertical distance between two levels, in layout units.
pub const VERTICAL_STEP: f64 = 80.0;

/// Assigns a position to every node, starting with the root at `(x, y)`.
pub fn assign_layout(tree: &mut TreeArena, x: f64, y: f64, spacing: f64) {
    assign_layout_with_step(tree, x, y, spacing, VERTICAL_STEP);
}

#[instrument(level = "debug", skip(tree))]
pub fn assign_layout_with_step(
    tree: &mut TreeArena,
    x: f64,
    y: f64,
    spacing: f64,
    vertical_step: f64,
) {
    if let Some(root) = tree.root() {
        place(tree, root, Position::new(x, y), spacing, vertical_step);
    }
}

fn place(tree: &mut TreeArena, idx: Index, position: Position, spacing: f64, step: f64) {
    let Some(node) = tree.get_node_mut(idx) else {
        return;
    };
    node.position = Some(position);
    trace!(id = %node.id(), %position, "placed node");
    let (left, right) = (node.left, node.right);

    let y = position.y + step;
    if let Some(left) = left {
        place(tree, left, Position::new(position.x - spacing, y), spacing / 2.0, step);
    }
    if let Some(right) = right {
        place(tree, right, Position::new(position.x + spacing, y), spacing / 2.0, step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TreeBuilder;

    #[test]
    fn test_spacing_halves_per_level() {
        let mut tree = TreeBuilder::build_sample_tree();
        assign_layout(&mut tree, 300.0, 50.0, 140.0);

        let x_of = |value: i64| {
            tree.iter()
                .find(|(_, n)| n.value() == value)
                .and_then(|(_, n)| n.position)
                .map(|p| p.x)
                .unwrap()
        };
        assert_eq!(x_of(1), 300.0);
        assert_eq!(x_of(2), 160.0);
        assert_eq!(x_of(3), 440.0);
        assert_eq!(x_of(4), 90.0);
        assert_eq!(x_of(7), 510.0);
    }

    #[test]
    fn test_empty_tree_is_noop() {
        let mut tree = TreeArena::new();
        assign_layout(&mut tree, 0.0, 0.0, 10.0);
        assert!(tree.is_empty());
    }
}
