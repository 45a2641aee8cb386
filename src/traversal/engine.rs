//! Depth-first traversal over the knowledge graph
//!
//! Expansion order (strict):
//! 1. Pop the next (concept, depth) from the work-list
//! 2. Skip it if the depth cutoff forbids expansion
//! 3. Skip it if the concept was already expanded at any depth
//! 4. Fetch its related triples and record the new ones in the depth bucket
//!    and the flattened list
//! 5. Push every object at depth + 1, first triple on top
//!
//! This visits concepts in exactly the order of the recursive formulation,
//! without its recursion-depth limit.

use std::collections::{HashMap, HashSet};

use crate::graph::{GraphStore, Triple};
use crate::observability::{Logger, ObservationScope};

use super::errors::{TraversalError, TraversalResult};
use super::result::{MaxDepth, Traversal, Visit};

pub struct TraversalEngine<'a, G: GraphStore> {
    graph: &'a G,
}

impl<'a, G: GraphStore> TraversalEngine<'a, G> {
    pub fn new(graph: &'a G) -> Self {
        Self { graph }
    }

    /// Collects every triple reachable from `start` within `max_depth`.
    ///
    /// Deterministic: the same graph and inputs give identical output order.
    pub fn traverse(&self, start: &str, max_depth: MaxDepth) -> TraversalResult<Traversal> {
        if start.trim().is_empty() {
            return Err(TraversalError::EmptyStartLabel);
        }

        let depth_field = max_depth.to_string();
        let scope = ObservationScope::with_fields(
            "TRAVERSAL",
            &[("start", start), ("max_depth", depth_field.as_str())],
        );

        let mut result = Traversal::default();
        let mut visited: HashSet<String> = HashSet::new();
        let mut seen: HashSet<Triple> = HashSet::new();
        let mut seen_at_depth: HashMap<usize, HashSet<Triple>> = HashMap::new();
        let mut stack: Vec<(String, usize)> = vec![(start.to_string(), 0)];

        while let Some((label, depth)) = stack.pop() {
            if !max_depth.allows(depth) {
                continue;
            }
            if !visited.insert(label.clone()) {
                continue;
            }

            let related = self.graph.find_related_concepts(&label);
            let depth_str = depth.to_string();
            let count = related.len().to_string();
            Logger::trace(
                "CONCEPT_EXPANDED",
                &[
                    ("concept", label.as_str()),
                    ("depth", depth_str.as_str()),
                    ("related", count.as_str()),
                ],
            );

            let bucket = result.by_depth.entry(depth).or_default();
            let bucket_seen = seen_at_depth.entry(depth).or_default();
            for triple in &related {
                if bucket_seen.insert(triple.clone()) {
                    bucket.push(triple.clone());
                }
                if seen.insert(triple.clone()) {
                    result.triples.push(triple.clone());
                }
            }

            for triple in related.into_iter().rev() {
                stack.push((triple.object, depth + 1));
            }

            result.visits.push(Visit { label, depth });
        }

        let triples = result.triples.len().to_string();
        let concepts = result.visits.len().to_string();
        scope.complete_with_fields(&[
            ("concepts", concepts.as_str()),
            ("triples", triples.as_str()),
        ]);

        Ok(result)
    }

    /// [`traverse`](Self::traverse) taking the signed depth convention (-1 = unbounded)
    pub fn traverse_signed(&self, start: &str, max_depth: i64) -> TraversalResult<Traversal> {
        self.traverse(start, MaxDepth::from_signed(max_depth)?)
    }
}
