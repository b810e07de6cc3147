use generational_arena::{Arena, Index};
use std::fmt;
use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::{NodeId, Position, Side};

/// Data payload for tree nodes. Set once at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// Unique id within the tree
    pub id: NodeId,
    /// Value emitted when the node is visited
    pub value: i64,
}

impl NodeData {
    /// Node data whose id is the decimal string of its value.
    pub fn from_value(value: i64) -> Self {
        Self {
            id: NodeId::from_value(value),
            value,
        }
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Binary tree node in the arena.
#[derive(Debug)]
pub struct TreeNode {
    data: NodeData,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    pub left: Option<Index>,
    pub right: Option<Index>,
    /// Layout position, None until a layout pass has run
    pub position: Option<Position>,
}

impl TreeNode {
    pub fn id(&self) -> &NodeId {
        &self.data.id
    }

    pub fn value(&self) -> i64 {
        self.data.value
    }

    pub fn child(&self, side: Side) -> Option<Index> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

/// Arena-based binary tree.
///
/// Nodes are only created through [`TreeArena::insert_node`], which links each
/// new node into exactly one free child slot. Children are therefore never
/// shared and the structure cannot contain cycles.
#[derive(Debug)]
pub struct TreeArena {
    arena: Arena<TreeNode>,
    root: Option<Index>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Inserts a node as the root (`parent == None`) or into the given child
    /// slot of an existing node.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(
        &mut self,
        data: NodeData,
        parent: Option<(Index, Side)>,
    ) -> DomainResult<Index> {
        if self.find(&data.id).is_some() {
            return Err(DomainError::DuplicateNodeId(data.id));
        }

        match parent {
            None => {
                if let Some(root) = self.root.and_then(|idx| self.arena.get(idx)) {
                    return Err(DomainError::SlotOccupied(root.id().clone()));
                }
                let idx = self.arena.insert(TreeNode::detached(data, None));
                self.root = Some(idx);
                Ok(idx)
            }
            Some((parent_idx, side)) => {
                let parent_node = self
                    .arena
                    .get(parent_idx)
                    .ok_or(DomainError::UnknownParent)?;
                if parent_node.child(side).is_some() {
                    return Err(DomainError::SlotOccupied(parent_node.id().clone()));
                }
                let idx = self
                    .arena
                    .insert(TreeNode::detached(data, Some(parent_idx)));
                if let Some(parent_node) = self.arena.get_mut(parent_idx) {
                    match side {
                        Side::Left => parent_node.left = Some(idx),
                        Side::Right => parent_node.right = Some(idx),
                    }
                }
                Ok(idx)
            }
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Finds the arena index of the node with the given id.
    pub fn find(&self, id: &NodeId) -> Option<Index> {
        self.arena
            .iter()
            .find(|(_, node)| node.id() == id)
            .map(|(idx, _)| idx)
    }

    /// Node values in construction (arena) order.
    pub fn values(&self) -> Vec<i64> {
        self.arena.iter().map(|(_, node)| node.value()).collect()
    }

    /// Pre-order iterator (node, then left subtree, then right subtree).
    pub fn iter(&self) -> TreeIterator {
        TreeIterator::new(self)
    }

    /// Number of levels; a single root has depth 1, an empty tree depth 0.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + [node.left, node.right]
                .into_iter()
                .flatten()
                .map(|child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }
}

impl TreeNode {
    fn detached(data: NodeData, parent: Option<Index>) -> Self {
        Self {
            data,
            parent,
            left: None,
            right: None,
            position: None,
        }
    }
}

pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push(root);
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Right first so the left child is popped next
                self.stack.extend(node.right);
                self.stack.extend(node.left);
                return Some((current_idx, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_node_tree() -> TreeArena {
        let mut tree = TreeArena::new();
        let root = tree.insert_node(NodeData::from_value(2), None).unwrap();
        tree.insert_node(NodeData::from_value(1), Some((root, Side::Left)))
            .unwrap();
        tree.insert_node(NodeData::from_value(3), Some((root, Side::Right)))
            .unwrap();
        tree
    }

    #[test]
    fn test_insert_links_children() {
        let tree = three_node_tree();
        let root = tree.get_node(tree.root().unwrap()).unwrap();
        let left = tree.get_node(root.left.unwrap()).unwrap();
        assert_eq!(left.value(), 1);
        assert_eq!(left.parent, tree.root());
        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let mut tree = three_node_tree();
        let root = tree.root().unwrap();
        let left = tree.get_node(root).unwrap().left.unwrap();
        let result = tree.insert_node(NodeData::from_value(3), Some((left, Side::Left)));
        assert_eq!(
            result,
            Err(DomainError::DuplicateNodeId(NodeId::from_value(3)))
        );
    }

    #[test]
    fn test_insert_rejects_occupied_slot() {
        let mut tree = three_node_tree();
        let root = tree.root().unwrap();
        let result = tree.insert_node(NodeData::from_value(9), Some((root, Side::Left)));
        assert!(matches!(result, Err(DomainError::SlotOccupied(_))));
        let result = tree.insert_node(NodeData::from_value(9), None);
        assert!(matches!(result, Err(DomainError::SlotOccupied(_))));
    }

    #[test]
    fn test_preorder_iterator() {
        let tree = three_node_tree();
        let pre: Vec<i64> = tree.iter().map(|(_, n)| n.value()).collect();
        assert_eq!(pre, vec![2, 1, 3]);
    }

    #[test]
    fn test_empty_tree() {
        let tree = TreeArena::new();
        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.iter().count(), 0);
    }
}
