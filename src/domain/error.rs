//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent tree invariant violations.
/// A failed operation leaves the tree unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("stale node handle")]
    InvalidIndex,

    #[error("the root node cannot be removed")]
    RootRemoval,

    #[error("the root node cannot be moved")]
    RootMove,

    #[error("cannot move {node} under its own descendant {target}")]
    CycleDetected { node: String, target: String },

    #[error("duplicate node id: {0}")]
    DuplicateId(String),

    #[error("invalid node id: {0:?}")]
    InvalidId(String),

    #[error("invalid node name: {0:?}")]
    InvalidName(String),

    #[error("tree already has a root")]
    RootExists,

    #[error("tree is empty")]
    EmptyTree,

    #[error("invalid template: {0}")]
    InvalidTemplate(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
