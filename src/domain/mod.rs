//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod layout;
pub mod planner;

pub use arena::{NodeData, TreeArena, TreeNode};
pub use builder::{RandomTreeOptions, TreeBuilder, DEFAULT_POOL};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use layout::{assign_layout, assign_layout_with_step, VERTICAL_STEP};
pub use planner::plan_inorder;
