//! Evidence store error types
//!
//! Error codes:
//! - FG_EVIDENCE_UNREACHABLE: telemetry backend cannot be reached
//! - FG_EVIDENCE_QUERY_FAILED: backend reached, query did not complete
//! - FG_RUN_SELECTION_AMBIGUOUS: selection matched zero or several runs
//! - FG_RUN_SELECTION_INVALID: selection could not be interpreted
//!
//! All of them end the current diagnostic run. "No rows" is never an error.

use std::fmt;

use super::runs::RunId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceErrorCode {
    EvidenceUnreachable,
    EvidenceQueryFailed,
    RunSelectionAmbiguous,
    RunSelectionInvalid,
}

impl EvidenceErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            EvidenceErrorCode::EvidenceUnreachable => "FG_EVIDENCE_UNREACHABLE",
            EvidenceErrorCode::EvidenceQueryFailed => "FG_EVIDENCE_QUERY_FAILED",
            EvidenceErrorCode::RunSelectionAmbiguous => "FG_RUN_SELECTION_AMBIGUOUS",
            EvidenceErrorCode::RunSelectionInvalid => "FG_RUN_SELECTION_INVALID",
        }
    }

    /// Whether a retry against the same backend could succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            EvidenceErrorCode::EvidenceUnreachable | EvidenceErrorCode::EvidenceQueryFailed
        )
    }
}

impl fmt::Display for EvidenceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Evidence error with the run and query it concerns
#[derive(Debug, Clone)]
pub struct EvidenceError {
    code: EvidenceErrorCode,
    message: String,
    run_id: Option<RunId>,
    query: Option<&'static str>,
}

impl EvidenceError {
    /// Backend unreachable (connection refused, file missing, ...)
    pub fn unreachable(reason: impl Into<String>) -> Self {
        Self {
            code: EvidenceErrorCode::EvidenceUnreachable,
            message: reason.into(),
            run_id: None,
            query: None,
        }
    }

    /// A named query failed for a run
    pub fn query_failed(run_id: RunId, query: &'static str, reason: impl Into<String>) -> Self {
        Self {
            code: EvidenceErrorCode::EvidenceQueryFailed,
            message: reason.into(),
            run_id: Some(run_id),
            query: Some(query),
        }
    }

    /// Selection resolved to `matches` distinct runs
    pub fn ambiguous_selection(selection: impl fmt::Display, matches: usize) -> Self {
        let message = if matches == 0 {
            format!("No run found for {}", selection)
        } else {
            format!("{} runs match {}; refine the selection", matches, selection)
        };
        Self {
            code: EvidenceErrorCode::RunSelectionAmbiguous,
            message,
            run_id: None,
            query: None,
        }
    }

    pub fn invalid_selection(reason: impl Into<String>) -> Self {
        Self {
            code: EvidenceErrorCode::RunSelectionInvalid,
            message: reason.into(),
            run_id: None,
            query: None,
        }
    }

    /// Attach the run the failing operation was scoped to
    pub fn for_run(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }

    pub fn code(&self) -> EvidenceErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn run_id(&self) -> Option<RunId> {
        self.run_id
    }

    pub fn query(&self) -> Option<&'static str> {
        self.query
    }

    pub fn is_transient(&self) -> bool {
        self.code.is_transient()
    }
}

impl fmt::Display for EvidenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ERROR] {}: {}", self.code, self.message)?;
        if let Some(run_id) = self.run_id {
            write!(f, " [run {}]", run_id)?;
        }
        if let Some(query) = self.query {
            write!(f, " [query {}]", query)?;
        }
        Ok(())
    }
}

impl std::error::Error for EvidenceError {}

pub type EvidenceResult<T> = Result<T, EvidenceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            EvidenceErrorCode::EvidenceUnreachable.code(),
            "FG_EVIDENCE_UNREACHABLE"
        );
        assert_eq!(
            EvidenceErrorCode::RunSelectionAmbiguous.code(),
            "FG_RUN_SELECTION_AMBIGUOUS"
        );
    }

    #[test]
    fn test_query_failure_carries_context() {
        let err = EvidenceError::query_failed(RunId(42), "limit_check_errors", "timeout");
        let display = err.to_string();
        assert!(display.contains("run 42"));
        assert!(display.contains("limit_check_errors"));
        assert!(err.is_transient());
    }

    #[test]
    fn test_selection_errors_are_not_transient() {
        let none = EvidenceError::ambiguous_selection("serial S1", 0);
        assert!(none.message().starts_with("No run found"));
        assert!(!none.is_transient());

        let many = EvidenceError::ambiguous_selection("serial S1", 2);
        assert!(many.message().contains("2 runs"));
    }
}
