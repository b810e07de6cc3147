//! Tree builder for the fixed sample tree and randomly shaped trees.

use std::iter::Peekable;

use generational_arena::Index;
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument};

use crate::domain::arena::{NodeData, TreeArena};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::Side;

/// Values used for random trees unless configured otherwise.
pub const DEFAULT_POOL: [i64; 7] = [1, 2, 3, 4, 5, 6, 7];

/// Shape parameters for random trees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomTreeOptions {
    /// Maximum number of levels, the root being level 1
    pub max_depth: usize,
    /// Independent probability of attaching each child
    pub branch_probability: f64,
}

impl Default for RandomTreeOptions {
    fn default() -> Self {
        Self {
            max_depth: 3,
            branch_probability: 0.7,
        }
    }
}

impl RandomTreeOptions {
    pub fn validate(&self) -> DomainResult<()> {
        if self.max_depth == 0 {
            return Err(DomainError::InvalidDepth);
        }
        if !(0.0..=1.0).contains(&self.branch_probability) {
            return Err(DomainError::InvalidProbability(self.branch_probability));
        }
        Ok(())
    }
}

/// Constructs binary trees.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    options: RandomTreeOptions,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: RandomTreeOptions) -> DomainResult<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &RandomTreeOptions {
        &self.options
    }

    /// Fixed sample tree:
    ///
    /// ```text
    ///        1
    ///      /   \
    ///     2     3
    ///    / \   / \
    ///   4   5 6   7
    /// ```
    pub fn build_sample_tree() -> TreeArena {
        Self::sample_tree().expect("sample tree values are distinct")
    }

    fn sample_tree() -> DomainResult<TreeArena> {
        let mut tree = TreeArena::new();
        let root = tree.insert_node(NodeData::from_value(1), None)?;
        for (value, side, children) in [(2, Side::Left, [4, 5]), (3, Side::Right, [6, 7])] {
            let idx = tree.insert_node(NodeData::from_value(value), Some((root, side)))?;
            tree.insert_node(NodeData::from_value(children[0]), Some((idx, Side::Left)))?;
            tree.insert_node(NodeData::from_value(children[1]), Some((idx, Side::Right)))?;
        }
        Ok(tree)
    }

    /// Builds a randomly shaped tree from `pool`.
    ///
    /// The pool is shuffled, then consumed front to back while growing the
    /// tree depth-first: each node may get a left child, then independently a
    /// right child, with `branch_probability` each, as long as the depth limit
    /// allows and values remain. Trees may be as small as a single node and
    /// need not use the whole pool.
    #[instrument(level = "debug", skip(self, rng))]
    pub fn build_random_tree<R: Rng + ?Sized>(
        &self,
        pool: &[i64],
        rng: &mut R,
    ) -> DomainResult<TreeArena> {
        self.options.validate()?;
        validate_pool(pool)?;

        let mut values = pool.to_vec();
        values.shuffle(rng);
        debug!("shuffled pool: {:?}", values);

        let mut tree = TreeArena::new();
        let mut values = values.into_iter().peekable();
        self.grow(&mut tree, &mut values, rng, None, 1)?;
        debug!(
            "random tree: {} nodes, depth {}",
            tree.node_count(),
            tree.depth()
        );
        Ok(tree)
    }

    /// Same as [`TreeBuilder::build_random_tree`] with a reproducible RNG.
    pub fn build_random_tree_seeded(&self, pool: &[i64], seed: u64) -> DomainResult<TreeArena> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.build_random_tree(pool, &mut rng)
    }

    fn grow<R, I>(
        &self,
        tree: &mut TreeArena,
        values: &mut Peekable<I>,
        rng: &mut R,
        parent: Option<(Index, Side)>,
        depth: usize,
    ) -> DomainResult<()>
    where
        R: Rng + ?Sized,
        I: Iterator<Item = i64>,
    {
        let Some(value) = values.next() else {
            return Ok(());
        };
        let idx = tree.insert_node(NodeData::from_value(value), parent)?;

        if depth < self.options.max_depth {
            for side in [Side::Left, Side::Right] {
                if values.peek().is_some() && rng.gen_bool(self.options.branch_probability) {
                    self.grow(tree, values, rng, Some((idx, side)), depth + 1)?;
                }
            }
        }
        Ok(())
    }
}

fn validate_pool(pool: &[i64]) -> DomainResult<()> {
    if pool.is_empty() {
        return Err(DomainError::EmptyPool);
    }
    if let Some(&dup) = pool.iter().duplicates().next() {
        return Err(DomainError::DuplicateValue(dup));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_tree_shape() {
        let tree = TreeBuilder::build_sample_tree();
        assert_eq!(tree.node_count(), 7);
        assert_eq!(tree.depth(), 3);
        let order: Vec<i64> = tree.iter().map(|(_, n)| n.value()).collect();
        assert_eq!(order, vec![1, 2, 4, 5, 3, 6, 7]);
    }

    #[test]
    fn test_zero_probability_gives_single_node() {
        let builder = TreeBuilder::with_options(RandomTreeOptions {
            max_depth: 3,
            branch_probability: 0.0,
        })
        .unwrap();
        let tree = builder.build_random_tree_seeded(&DEFAULT_POOL, 1).unwrap();
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_certain_branching_fills_all_levels() {
        let builder = TreeBuilder::with_options(RandomTreeOptions {
            max_depth: 3,
            branch_probability: 1.0,
        })
        .unwrap();
        let tree = builder.build_random_tree_seeded(&DEFAULT_POOL, 7).unwrap();
        assert_eq!(tree.node_count(), 7);
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn test_same_seed_same_tree() {
        let builder = TreeBuilder::new();
        let a = builder.build_random_tree_seeded(&DEFAULT_POOL, 99).unwrap();
        let b = builder.build_random_tree_seeded(&DEFAULT_POOL, 99).unwrap();
        let pre = |t: &TreeArena| t.iter().map(|(_, n)| n.value()).collect::<Vec<_>>();
        assert_eq!(pre(&a), pre(&b));
    }

    #[test]
    fn test_invalid_input_rejected() {
        let builder = TreeBuilder::new();
        assert_eq!(
            builder.build_random_tree_seeded(&[], 0).unwrap_err(),
            DomainError::EmptyPool
        );
        assert_eq!(
            builder.build_random_tree_seeded(&[1, 2, 2], 0).unwrap_err(),
            DomainError::DuplicateValue(2)
        );
        assert!(TreeBuilder::with_options(RandomTreeOptions {
            max_depth: 0,
            branch_probability: 0.5,
        })
        .is_err());
        assert!(TreeBuilder::with_options(RandomTreeOptions {
            max_depth: 3,
            branch_probability: 1.5,
        })
        .is_err());
    }
}
