//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::NodeId;

/// Domain errors represent invalid input to tree construction.
/// Layout and planning are total and never produce one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("value pool is empty")]
    EmptyPool,

    #[error("duplicate value in pool: {0}")]
    DuplicateValue(i64),

    #[error("branch probability must be within [0, 1], got {0}")]
    InvalidProbability(f64),

    #[error("max depth must be at least 1")]
    InvalidDepth,

    #[error("duplicate node id: {0}")]
    DuplicateNodeId(NodeId),

    #[error("slot already occupied at node: {0}")]
    SlotOccupied(NodeId),

    #[error("parent node not found in tree")]
    UnknownParent,
}

/// Result type for tree operations.
pub type DomainResult<T> = Result<T, DomainError>;
