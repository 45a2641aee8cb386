//! Graph loading errors
//!
//! Error codes:
//! - FG_GRAPH_UNREADABLE (FATAL)
//! - FG_GRAPH_MALFORMED (FATAL)
//!
//! Lookups never fail: an unknown label is an empty result, not an error.
//! These errors only arise while building the graph at startup.

use std::fmt;

/// Graph error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphErrorCode {
    /// Persisted graph could not be read
    GraphUnreadable,
    /// Persisted graph violates the ontology
    GraphMalformed,
}

impl GraphErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            GraphErrorCode::GraphUnreadable => "FG_GRAPH_UNREADABLE",
            GraphErrorCode::GraphMalformed => "FG_GRAPH_MALFORMED",
        }
    }
}

impl fmt::Display for GraphErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Graph error with the source location it refers to
#[derive(Debug)]
pub struct GraphError {
    code: GraphErrorCode,
    message: String,
    source_path: Option<String>,
}

impl GraphError {
    /// The graph file could not be read
    pub fn unreadable(path: impl Into<String>, reason: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            code: GraphErrorCode::GraphUnreadable,
            message: format!("Cannot read graph '{}': {}", path, reason.into()),
            source_path: Some(path),
        }
    }

    /// The graph content is invalid
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self {
            code: GraphErrorCode::GraphMalformed,
            message: reason.into(),
            source_path: None,
        }
    }

    /// Attach the file the graph came from
    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    pub fn code(&self) -> GraphErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_path(&self) -> Option<&str> {
        self.source_path.as_deref()
    }

    /// Graph errors only occur at startup and always abort it
    pub fn is_fatal(&self) -> bool {
        true
    }
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[FATAL] {}: {}", self.code, self.message)?;
        if let (GraphErrorCode::GraphMalformed, Some(path)) = (self.code, &self.source_path) {
            write!(f, " (in {})", path)?;
        }
        Ok(())
    }
}

impl std::error::Error for GraphError {}

/// Result type for graph loading
pub type GraphResult<T> = Result<T, GraphError>;
