//! In-memory knowledge graph and the pattern-query seam used by traversal

use std::collections::{HashMap, HashSet};

use super::errors::{GraphError, GraphResult};
use super::types::{Concept, ConceptType, Predicate, Relation, Triple};

/// Read-only pattern queries over the relationship graph
pub trait GraphStore {
    /// All triples leaving any concept labelled `label`.
    ///
    /// Type assertions are never returned. An unknown or empty label yields
    /// an empty list.
    fn find_related_concepts(&self, label: &str) -> Vec<Triple>;

    /// Distinct labels of every concept of the given type, in insertion order
    fn list_concepts_of_type(&self, concept_type: ConceptType) -> Vec<String>;

    /// Digest of the graph source, when the store knows it
    fn source_digest(&self) -> Option<&str> {
        None
    }
}

/// Relationship graph held in memory.
///
/// Built once at startup and shared read-only by every diagnostic run.
#[derive(Debug, Default)]
pub struct KnowledgeGraph {
    concepts: Vec<Concept>,
    by_id: HashMap<String, usize>,
    by_label: HashMap<String, Vec<usize>>,
    /// Outgoing edges per concept index, in insertion order
    outgoing: Vec<Vec<(Predicate, usize)>>,
    relation_count: usize,
    digest: Option<String>,
}

impl KnowledgeGraph {
    /// Creates an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a concept. Ids must be unique and labels non-empty.
    pub fn add_concept(&mut self, concept: Concept) -> GraphResult<()> {
        if concept.id.trim().is_empty() {
            return Err(GraphError::malformed("concept with empty id"));
        }
        if concept.label.trim().is_empty() {
            return Err(GraphError::malformed(format!(
                "concept '{}' has an empty label",
                concept.id
            )));
        }
        if self.by_id.contains_key(&concept.id) {
            return Err(GraphError::malformed(format!(
                "duplicate concept id '{}'",
                concept.id
            )));
        }

        let idx = self.concepts.len();
        self.by_id.insert(concept.id.clone(), idx);
        self.by_label
            .entry(concept.label.clone())
            .or_default()
            .push(idx);
        self.concepts.push(concept);
        self.outgoing.push(Vec::new());
        Ok(())
    }

    /// Adds a relation between two known concept ids.
    ///
    /// The endpoint types must match the predicate signature. Re-adding an
    /// existing relation is a no-op.
    pub fn add_relation(&mut self, relation: Relation) -> GraphResult<()> {
        let subject = self.index_of(&relation.subject)?;
        let object = self.index_of(&relation.object)?;

        let (expected_subject, expected_object) = relation.predicate.signature();
        let actual_subject = self.concepts[subject].concept_type;
        let actual_object = self.concepts[object].concept_type;
        if actual_subject != expected_subject || actual_object != expected_object {
            return Err(GraphError::malformed(format!(
                "'{}' expects {} -> {}, got '{}' ({}) -> '{}' ({})",
                relation.predicate,
                expected_subject,
                expected_object,
                relation.subject,
                actual_subject,
                relation.object,
                actual_object
            )));
        }

        let edges = &mut self.outgoing[subject];
        if !edges.contains(&(relation.predicate, object)) {
            edges.push((relation.predicate, object));
            self.relation_count += 1;
        }
        Ok(())
    }

    fn index_of(&self, id: &str) -> GraphResult<usize> {
        self.by_id
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::malformed(format!("relation references unknown concept '{}'", id)))
    }

    /// Records the digest of the document this graph was loaded from
    pub fn set_digest(&mut self, digest: impl Into<String>) {
        self.digest = Some(digest.into());
    }

    /// SHA-256 of the source document, when loaded from one
    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    pub fn concept_count(&self) -> usize {
        self.concepts.len()
    }

    pub fn relation_count(&self) -> usize {
        self.relation_count
    }

    /// Concept types carried under a label, in insertion order
    pub fn types_of(&self, label: &str) -> Vec<ConceptType> {
        let mut types = Vec::new();
        for &idx in self.by_label.get(label).map(Vec::as_slice).unwrap_or(&[]) {
            let t = self.concepts[idx].concept_type;
            if !types.contains(&t) {
                types.push(t);
            }
        }
        types
    }

    /// Labels shared by concepts of different types, sorted by label.
    ///
    /// Traversal and evaluation treat such concepts as one node.
    pub fn label_collisions(&self) -> Vec<(String, Vec<ConceptType>)> {
        let mut collisions: Vec<(String, Vec<ConceptType>)> = self
            .by_label
            .keys()
            .filter_map(|label| {
                let types = self.types_of(label);
                (types.len() > 1).then(|| (label.clone(), types))
            })
            .collect();
        collisions.sort();
        collisions
    }
}

impl GraphStore for KnowledgeGraph {
    fn find_related_concepts(&self, label: &str) -> Vec<Triple> {
        let subjects = match self.by_label.get(label) {
            Some(s) => s,
            None => return Vec::new(),
        };

        let mut seen = HashSet::new();
        let mut triples = Vec::new();
        for &subject in subjects {
            for &(predicate, object) in &self.outgoing[subject] {
                let triple = Triple::new(
                    &self.concepts[subject].label,
                    predicate,
                    &self.concepts[object].label,
                );
                if seen.insert(triple.clone()) {
                    triples.push(triple);
                }
            }
        }
        triples
    }

    fn source_digest(&self) -> Option<&str> {
        self.digest()
    }

    fn list_concepts_of_type(&self, concept_type: ConceptType) -> Vec<String> {
        let mut seen = HashSet::new();
        self.concepts
            .iter()
            .filter(|c| c.concept_type == concept_type)
            .filter(|c| seen.insert(c.label.as_str()))
            .map(|c| c.label.clone())
            .collect()
    }
}
