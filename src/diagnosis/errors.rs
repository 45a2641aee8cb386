use thiserror::Error;

use crate::rules::EvaluationError;
use crate::traversal::TraversalError;

pub type DiagnosisResult<T> = Result<T, DiagnosisError>;

/// A diagnostic run ended without a report
#[derive(Debug, Clone, Error)]
pub enum DiagnosisError {
    #[error("traversal rejected: {0}")]
    Traversal(#[from] TraversalError),

    #[error("evaluation failed: {0}")]
    Evaluation(#[from] EvaluationError),
}
