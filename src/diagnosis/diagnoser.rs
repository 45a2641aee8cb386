//! Diagnostic pipeline
//!
//! traversal -> candidate evaluation -> annotation -> root-cause chains.
//! One request, one run id, sequential evidence queries. Any evidence
//! failure ends the run without a partial report.

use chrono::Utc;
use uuid::Uuid;

use crate::evidence::{EvidenceStore, RunId};
use crate::graph::GraphStore;
use crate::observability::{log_event_with_fields, Event, ObservationScope};
use crate::rules::{Evaluator, RuleRegistry, Status};
use crate::traversal::{MaxDepth, TraversalEngine};

use super::annotate::{annotate, evaluated_view};
use super::chains::{assemble_root_causes, has_root_causes};
use super::errors::DiagnosisResult;
use super::report::{DiagnosticReport, NO_ROOT_CAUSES};
use super::visual::VisualGraph;

/// What to diagnose
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRequest {
    pub failure: String,
    pub run_id: RunId,
    pub max_depth: MaxDepth,
}

impl DiagnosticRequest {
    pub fn new(failure: impl Into<String>, run_id: RunId) -> Self {
        Self {
            failure: failure.into(),
            run_id,
            max_depth: MaxDepth::Unbounded,
        }
    }

    pub fn with_max_depth(mut self, max_depth: MaxDepth) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Runs the diagnostic pipeline over injected collaborators
pub struct Diagnoser<'a, G: GraphStore, E: EvidenceStore> {
    graph: &'a G,
    evidence: &'a mut E,
    registry: &'a RuleRegistry,
}

impl<'a, G: GraphStore, E: EvidenceStore> Diagnoser<'a, G, E> {
    pub fn new(graph: &'a G, evidence: &'a mut E, registry: &'a RuleRegistry) -> Self {
        Self {
            graph,
            evidence,
            registry,
        }
    }

    pub fn diagnose(&mut self, request: &DiagnosticRequest) -> DiagnosisResult<DiagnosticReport> {
        let run_text = request.run_id.to_string();
        let scope = ObservationScope::with_fields(
            "DIAGNOSIS",
            &[
                ("failure", request.failure.as_str()),
                ("run_id", run_text.as_str()),
            ],
        );

        let traversal = match TraversalEngine::new(self.graph).traverse(&request.failure, request.max_depth)
        {
            Ok(t) => t,
            Err(e) => {
                scope.fail(&e.to_string());
                return Err(e.into());
            }
        };

        let outcomes = {
            let mut evaluator = Evaluator::new(self.registry, &mut *self.evidence);
            match evaluator.evaluate_all(&traversal.triples, request.run_id) {
                Ok(o) => o,
                Err(e) => {
                    scope.fail(&e.to_string());
                    return Err(e.into());
                }
            }
        };

        let annotated = annotate(&traversal.triples, &outcomes);
        let evaluated = evaluated_view(&annotated);
        let chains = assemble_root_causes(&annotated, &request.failure);

        let mut notices = Vec::new();
        if traversal.is_empty() {
            notices.push(format!(
                "Failure '{}' has no relations in the knowledge graph.",
                request.failure
            ));
        }
        if !has_root_causes(&annotated, &request.failure) {
            log_event_with_fields(
                Event::NoRootCauses,
                &[("failure", request.failure.as_str())],
            );
            notices.push(NO_ROOT_CAUSES.to_string());
        }
        let unmodeled = outcomes
            .iter()
            .filter(|o| o.status == Status::Unknown && o.rule.is_none())
            .count();
        if unmodeled > 0 {
            notices.push(format!(
                "{} trigger check(s) have no verification rule and were left Unknown.",
                unmodeled
            ));
        }

        let report = DiagnosticReport {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            failure: request.failure.clone(),
            run_id: request.run_id,
            max_depth: request.max_depth,
            graph_digest: self.graph.source_digest().map(str::to_string),
            by_depth: traversal.by_depth,
            visual: VisualGraph::from_annotated(&evaluated),
            outcomes,
            evaluated,
            chains,
            notices,
        };

        let chains_text = report.chains.len().to_string();
        let outcomes_text = report.outcomes.len().to_string();
        scope.complete_with_fields(&[
            ("chains", chains_text.as_str()),
            ("outcomes", outcomes_text.as_str()),
        ]);
        Ok(report)
    }
}
