use thiserror::Error;

pub type TraversalResult<T> = Result<T, TraversalError>;

/// Rejected traversal requests
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraversalError {
    #[error("start concept label must not be empty")]
    EmptyStartLabel,

    #[error("invalid max depth {0}: use -1 for unbounded or a non-negative cutoff")]
    InvalidMaxDepth(i64),
}
