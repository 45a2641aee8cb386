//! Status annotation of a traversal
//!
//! `consume` triples take the status of their evaluation. A trigger's
//! status is lifted onto the `isTriggeredBy` edges pointing at it, and a
//! root cause's onto the `hasRootCause` edges pointing at it. `cause` and
//! `next` edges are never annotated.

use std::collections::HashMap;

use serde::Serialize;

use crate::graph::{Predicate, Triple};
use crate::rules::{EvaluationOutcome, Status};

/// A traversal triple and its status, if it has one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedTriple {
    #[serde(flatten)]
    pub triple: Triple,
    pub status: Option<Status>,
}

/// Annotates `triples` (traversal order) with `outcomes`.
///
/// The result has one entry per input triple, in input order.
pub fn annotate(triples: &[Triple], outcomes: &[EvaluationOutcome]) -> Vec<AnnotatedTriple> {
    let consumed: HashMap<&Triple, Status> =
        outcomes.iter().map(|o| (&o.triple, o.status)).collect();

    let mut by_trigger: HashMap<&str, Vec<Status>> = HashMap::new();
    for outcome in outcomes {
        by_trigger
            .entry(outcome.triple.subject.as_str())
            .or_default()
            .push(outcome.status);
    }
    let trigger_status: HashMap<&str, Status> = by_trigger
        .into_iter()
        .filter_map(|(trigger, statuses)| Status::combine(statuses).map(|s| (trigger, s)))
        .collect();

    let mut by_root_cause: HashMap<&str, Vec<Status>> = HashMap::new();
    for triple in triples.iter().filter(|t| t.predicate == Predicate::IsTriggeredBy) {
        if let Some(status) = trigger_status.get(triple.object.as_str()) {
            by_root_cause
                .entry(triple.subject.as_str())
                .or_default()
                .push(*status);
        }
    }
    let root_cause_status: HashMap<&str, Status> = by_root_cause
        .into_iter()
        .filter_map(|(root, statuses)| Status::combine(statuses).map(|s| (root, s)))
        .collect();

    triples
        .iter()
        .map(|triple| {
            let status = match triple.predicate {
                Predicate::Consume => consumed.get(triple).copied(),
                Predicate::IsTriggeredBy => trigger_status.get(triple.object.as_str()).copied(),
                Predicate::HasRootCause => root_cause_status.get(triple.object.as_str()).copied(),
                Predicate::Cause | Predicate::Next => None,
            };
            AnnotatedTriple {
                triple: triple.clone(),
                status,
            }
        })
        .collect()
}

/// The annotated triples that carry a status, in order
pub fn evaluated_view(annotated: &[AnnotatedTriple]) -> Vec<AnnotatedTriple> {
    annotated
        .iter()
        .filter(|a| a.status.is_some())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(trigger: &str, channel: &str, status: Status) -> EvaluationOutcome {
        EvaluationOutcome {
            triple: Triple::new(trigger, Predicate::Consume, channel),
            status,
            rule: None,
            evidence: None,
        }
    }

    fn traversal() -> Vec<Triple> {
        vec![
            Triple::new("PumpStall", Predicate::Cause, "Overheat"),
            Triple::new("PumpStall", Predicate::HasRootCause, "LowVoltage"),
            Triple::new("LowVoltage", Predicate::Next, "BadSupply"),
            Triple::new("LowVoltage", Predicate::IsTriggeredBy, "VoltageDrop"),
            Triple::new("LowVoltage", Predicate::IsTriggeredBy, "Uplink"),
            Triple::new("VoltageDrop", Predicate::Consume, "MCDIGVLTFM"),
            Triple::new("Uplink", Predicate::Consume, "UPLINK"),
        ]
    }

    #[test]
    fn test_consume_and_lifted_statuses() {
        let outcomes = vec![
            outcome("VoltageDrop", "MCDIGVLTFM", Status::True),
            outcome("Uplink", "UPLINK", Status::False),
        ];
        let annotated = annotate(&traversal(), &outcomes);
        let statuses: Vec<_> = annotated.iter().map(|a| a.status).collect();
        assert_eq!(
            statuses,
            vec![
                None,
                Some(Status::True),
                None,
                Some(Status::True),
                Some(Status::False),
                Some(Status::True),
                Some(Status::False),
            ]
        );
    }

    #[test]
    fn test_unknown_lifts_when_nothing_true() {
        let outcomes = vec![
            outcome("VoltageDrop", "MCDIGVLTFM", Status::Unknown),
            outcome("Uplink", "UPLINK", Status::False),
        ];
        let annotated = annotate(&traversal(), &outcomes);
        assert_eq!(annotated[1].status, Some(Status::Unknown));
    }

    #[test]
    fn test_evaluated_view_keeps_order() {
        let outcomes = vec![outcome("VoltageDrop", "MCDIGVLTFM", Status::False)];
        let view = evaluated_view(&annotate(&traversal(), &outcomes));
        let predicates: Vec<_> = view.iter().map(|a| a.triple.predicate).collect();
        assert_eq!(
            predicates,
            vec![
                Predicate::HasRootCause,
                Predicate::IsTriggeredBy,
                Predicate::Consume
            ]
        );
        assert!(view.iter().all(|a| a.status == Some(Status::False)));
    }

    #[test]
    fn test_no_outcomes_no_statuses() {
        let annotated = annotate(&traversal(), &[]);
        assert_eq!(annotated.len(), 7);
        assert!(evaluated_view(&annotated).is_empty());
    }
}
