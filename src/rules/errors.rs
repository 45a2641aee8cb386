use thiserror::Error;

use crate::evidence::{EvidenceError, EvidenceShape, RunId};

use super::catalogue::RuleId;

pub type EvaluationResult<T> = Result<T, EvaluationError>;

/// A rule could not produce a verdict
#[derive(Debug, Clone, Error)]
pub enum EvaluationError {
    #[error("rule {rule} for trigger '{trigger}' failed on run {run_id}: {source}")]
    Evidence {
        rule: RuleId,
        trigger: String,
        run_id: RunId,
        #[source]
        source: EvidenceError,
    },

    #[error("rule {rule} on run {run_id} expected {expected:?} evidence, store returned {actual:?}")]
    ShapeMismatch {
        rule: RuleId,
        run_id: RunId,
        expected: EvidenceShape,
        actual: EvidenceShape,
    },
}

impl EvaluationError {
    pub fn rule(&self) -> RuleId {
        match self {
            EvaluationError::Evidence { rule, .. } | EvaluationError::ShapeMismatch { rule, .. } => {
                *rule
            }
        }
    }

    pub fn run_id(&self) -> RunId {
        match self {
            EvaluationError::Evidence { run_id, .. }
            | EvaluationError::ShapeMismatch { run_id, .. } => *run_id,
        }
    }

    /// The underlying store error, if the store failed
    pub fn evidence_error(&self) -> Option<&EvidenceError> {
        match self {
            EvaluationError::Evidence { source, .. } => Some(source),
            EvaluationError::ShapeMismatch { .. } => None,
        }
    }
}
