//! Error types for relation containers.
//!
//! Precondition violations surface as `Err` before any mutation takes
//! place. Tolerated inputs (out-of-range kill ids, unmapped permutation
//! values, out-of-range query nodes) never produce an error; the affected
//! operation returns an empty or degraded result instead.

use thiserror::Error;

/// Errors raised by relation containers on precondition violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelationError {
    /// Element index outside `[0, count)` where a bounded index is required
    #[error("element {element} out of bounds (relation has {count} elements)")]
    ElementOutOfBounds { element: usize, count: usize },

    /// Node index outside the relation's node space
    #[error("node {node} out of bounds (node space is {bound})")]
    NodeOutOfBounds { node: usize, bound: usize },

    /// Position index outside a row's occurrence list
    #[error("offset {offset} out of bounds (row has {len} entries)")]
    OffsetOutOfBounds { offset: usize, len: usize },

    /// Type index outside `[0, types)` in a typed matrix
    #[error("type {index} out of bounds (matrix has {types} types)")]
    TypeOutOfBounds { index: usize, types: usize },

    /// A typed matrix must carry at least one type
    #[error("typed matrix requires at least one type")]
    EmptyTypeCount,

    /// Malformed CSR or boolean-matrix input
    #[error("malformed sparse input: {0}")]
    MalformedInput(String),

    /// A row contains the same node more than once
    #[error("element {element} lists node {node} more than once")]
    DuplicateNode { element: usize, node: usize },
}

/// Convenience result alias used across the crate.
pub type Result<T> = std::result::Result<T, RelationError>;
