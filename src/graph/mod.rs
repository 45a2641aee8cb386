//! Graph store adapter
//!
//! Wraps the failure → root cause → trigger → data channel knowledge graph
//! and answers the single pattern query traversal needs: every triple leaving
//! a labelled concept.

mod errors;
mod loader;
mod store;
mod types;

pub use errors::{GraphError, GraphErrorCode, GraphResult};
pub use loader::{GraphDocument, GraphLoader};
pub use store::{GraphStore, KnowledgeGraph};
pub use types::{Concept, ConceptType, Predicate, Relation, Triple};
