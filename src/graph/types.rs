//! Knowledge graph vocabulary
//!
//! The diagnostic ontology has exactly four concept types and five relation
//! predicates. Type assertions live on the concept itself and are never
//! materialized as a [`Triple`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four concept types of the diagnostic ontology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConceptType {
    /// Observable equipment failure
    Failure,
    /// Underlying cause of a failure
    RootCause,
    /// Condition that activates a root cause
    Trigger,
    /// Telemetry channel consumed by a trigger
    DataChannel,
}

impl ConceptType {
    /// All concept types, in ontology order
    pub const ALL: [ConceptType; 4] = [
        ConceptType::Failure,
        ConceptType::RootCause,
        ConceptType::Trigger,
        ConceptType::DataChannel,
    ];

    /// Returns the ontology class name
    pub fn as_str(&self) -> &'static str {
        match self {
            ConceptType::Failure => "Failure",
            ConceptType::RootCause => "RootCause",
            ConceptType::Trigger => "Trigger",
            ConceptType::DataChannel => "DataChannel",
        }
    }
}

impl fmt::Display for ConceptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Relation vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Predicate {
    /// Failure → Failure
    Cause,
    /// Failure → RootCause
    HasRootCause,
    /// RootCause → RootCause
    Next,
    /// RootCause → Trigger
    IsTriggeredBy,
    /// Trigger → DataChannel
    Consume,
}

impl Predicate {
    /// Returns the predicate local name as it appears in the ontology
    pub fn as_str(&self) -> &'static str {
        match self {
            Predicate::Cause => "cause",
            Predicate::HasRootCause => "hasRootCause",
            Predicate::Next => "next",
            Predicate::IsTriggeredBy => "isTriggeredBy",
            Predicate::Consume => "consume",
        }
    }

    /// Expected (subject, object) types for this predicate
    pub fn signature(&self) -> (ConceptType, ConceptType) {
        match self {
            Predicate::Cause => (ConceptType::Failure, ConceptType::Failure),
            Predicate::HasRootCause => (ConceptType::Failure, ConceptType::RootCause),
            Predicate::Next => (ConceptType::RootCause, ConceptType::RootCause),
            Predicate::IsTriggeredBy => (ConceptType::RootCause, ConceptType::Trigger),
            Predicate::Consume => (ConceptType::Trigger, ConceptType::DataChannel),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A node of the knowledge graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    /// Canonical identifier (URI-like)
    pub id: String,
    /// Human-readable label, the lookup key everywhere else
    pub label: String,
    /// Ontology class
    #[serde(rename = "type")]
    pub concept_type: ConceptType,
}

impl Concept {
    pub fn new(id: impl Into<String>, label: impl Into<String>, concept_type: ConceptType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            concept_type,
        }
    }
}

/// A directed, typed edge between two concept ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub subject: String,
    pub predicate: Predicate,
    pub object: String,
}

/// (subject label, predicate, object label)
///
/// Equality is structural over all three fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: Predicate,
    pub object: String,
}

impl Triple {
    pub fn new(subject: impl Into<String>, predicate: Predicate, object: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            predicate,
            object: object.into(),
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.subject, self.predicate, self.object)
    }
}
