//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit status after the
//! JSON error envelope has been written.

use std::fmt;
use std::io;

use crate::diagnosis::DiagnosisError;
use crate::evidence::EvidenceError;
use crate::graph::GraphError;
use crate::traversal::TraversalError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file missing, unreadable or invalid
    ConfigError,
    /// stdout or JSON encoding failure
    IoError,
    /// Argument combination clap cannot express
    InvalidArguments,
    /// Knowledge graph could not be loaded
    GraphUnavailable,
    /// Telemetry could not be opened or queried, or no single run selected
    EvidenceUnavailable,
    /// Diagnostic run ended without a report
    DiagnosisFailed,
}

impl CliErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "FG_CLI_CONFIG_ERROR",
            Self::IoError => "FG_CLI_IO_ERROR",
            Self::InvalidArguments => "FG_CLI_INVALID_ARGUMENTS",
            Self::GraphUnavailable => "FG_CLI_GRAPH_UNAVAILABLE",
            Self::EvidenceUnavailable => "FG_CLI_EVIDENCE_UNAVAILABLE",
            Self::DiagnosisFailed => "FG_CLI_DIAGNOSIS_FAILED",
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidArguments, msg)
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<GraphError> for CliError {
    fn from(e: GraphError) -> Self {
        Self::new(CliErrorCode::GraphUnavailable, e.to_string())
    }
}

impl From<EvidenceError> for CliError {
    fn from(e: EvidenceError) -> Self {
        Self::new(CliErrorCode::EvidenceUnavailable, e.to_string())
    }
}

impl From<TraversalError> for CliError {
    fn from(e: TraversalError) -> Self {
        Self::invalid_arguments(e.to_string())
    }
}

impl From<DiagnosisError> for CliError {
    fn from(e: DiagnosisError) -> Self {
        match e {
            DiagnosisError::Traversal(e) => e.into(),
            DiagnosisError::Evaluation(e) => Self::new(CliErrorCode::DiagnosisFailed, e.to_string()),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
