//! Inorder traversal planning.

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::{TraversalStep, TreeArena};

/// Plans the inorder traversal of `tree`: left subtree, node, right subtree.
///
/// Produces exactly one step per node. An empty tree yields an empty plan.
#[instrument(level = "debug", skip(tree))]
pub fn plan_inorder(tree: &TreeArena) -> Vec<TraversalStep> {
    let mut steps = Vec::with_capacity(tree.node_count());
    if let Some(root) = tree.root() {
        visit(tree, root, &mut steps);
    }
    debug!("planned {} steps", steps.len());
    steps
}

fn visit(tree: &TreeArena, idx: Index, steps: &mut Vec<TraversalStep>) {
    if let Some(node) = tree.get_node(idx) {
        if let Some(left) = node.left {
            visit(tree, left, steps);
        }
        steps.push(TraversalStep::visit(node.id().clone(), node.value()));
        if let Some(right) = node.right {
            visit(tree, right, steps);
        }
    }
}
