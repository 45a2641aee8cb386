//! Loads the persisted knowledge graph
//!
//! The graph is stored as a single JSON document:
//!
//! ```json
//! {
//!   "concepts": [{"id": "urn:fg:PumpStall", "label": "PumpStall", "type": "Failure"}],
//!   "relations": [{"subject": "urn:fg:PumpStall", "predicate": "hasRootCause", "object": "urn:fg:LowVoltage"}]
//! }
//! ```
//!
//! Malformed documents are fatal at startup.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::observability::{log_event_with_fields, Event, Logger};

use super::errors::{GraphError, GraphResult};
use super::store::KnowledgeGraph;
use super::types::{Concept, Relation};

/// On-disk representation of the graph
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    pub concepts: Vec<Concept>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl GraphDocument {
    /// Builds the in-memory graph, validating every concept and relation
    pub fn into_graph(self) -> GraphResult<KnowledgeGraph> {
        let mut graph = KnowledgeGraph::new();
        for concept in self.concepts {
            graph.add_concept(concept)?;
        }
        for relation in self.relations {
            graph.add_relation(relation)?;
        }
        Ok(graph)
    }
}

pub struct GraphLoader;

impl GraphLoader {
    /// Reads and validates the graph file at `path`
    pub fn load_file(path: &Path) -> GraphResult<KnowledgeGraph> {
        let display = path.display().to_string();
        let bytes = fs::read(path).map_err(|e| GraphError::unreadable(&display, e.to_string()))?;
        let graph = Self::load_slice(&bytes).map_err(|e| e.at(&display))?;

        let concepts = graph.concept_count().to_string();
        let relations = graph.relation_count().to_string();
        log_event_with_fields(
            Event::GraphLoaded,
            &[
                ("concepts", concepts.as_str()),
                ("path", display.as_str()),
                ("relations", relations.as_str()),
            ],
        );
        Ok(graph)
    }

    /// Parses a graph document from raw bytes and stamps it with their digest
    pub fn load_slice(bytes: &[u8]) -> GraphResult<KnowledgeGraph> {
        let document: GraphDocument = serde_json::from_slice(bytes)
            .map_err(|e| GraphError::malformed(format!("Invalid graph JSON: {}", e)))?;

        let mut graph = document.into_graph()?;
        graph.set_digest(Self::digest(bytes));

        for (label, types) in graph.label_collisions() {
            let types = types
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(",");
            Logger::warn(
                Event::LabelCollision.as_str(),
                &[("label", label.as_str()), ("types", types.as_str())],
            );
        }

        Ok(graph)
    }

    /// Lowercase hex SHA-256
    pub fn digest(bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ConceptType, GraphErrorCode, GraphStore, Predicate, Triple};
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn document() -> serde_json::Value {
        json!({
            "concepts": [
                {"id": "urn:fg:PumpStall", "label": "PumpStall", "type": "Failure"},
                {"id": "urn:fg:LowVoltage", "label": "LowVoltage", "type": "RootCause"}
            ],
            "relations": [
                {"subject": "urn:fg:PumpStall", "predicate": "hasRootCause", "object": "urn:fg:LowVoltage"}
            ]
        })
    }

    #[test]
    fn test_load_slice_builds_graph() {
        let bytes = serde_json::to_vec(&document()).unwrap();
        let graph = GraphLoader::load_slice(&bytes).unwrap();

        assert_eq!(graph.concept_count(), 2);
        assert_eq!(
            graph.find_related_concepts("PumpStall"),
            vec![Triple::new("PumpStall", Predicate::HasRootCause, "LowVoltage")]
        );
        assert_eq!(graph.digest(), Some(GraphLoader::digest(&bytes).as_str()));
    }

    #[test]
    fn test_load_file_roundtrip() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(document().to_string().as_bytes()).unwrap();

        let graph = GraphLoader::load_file(file.path()).unwrap();
        assert_eq!(
            graph.list_concepts_of_type(ConceptType::Failure),
            vec!["PumpStall".to_string()]
        );
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let err = GraphLoader::load_file(Path::new("/nonexistent/graph.json")).unwrap_err();
        assert_eq!(err.code(), GraphErrorCode::GraphUnreadable);
    }

    #[test]
    fn test_unknown_concept_type_is_malformed() {
        let bytes = br#"{"concepts":[{"id":"a","label":"A","type":"Sensor"}]}"#;
        let err = GraphLoader::load_slice(bytes).unwrap_err();
        assert_eq!(err.code(), GraphErrorCode::GraphMalformed);
    }

    #[test]
    fn test_digest_is_hex_sha256() {
        let digest = GraphLoader::digest(b"{}");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
