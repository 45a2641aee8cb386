//! Root-cause chain assembly

use std::collections::HashSet;

use serde::Serialize;

use crate::graph::Predicate;
use crate::rules::Status;

use super::annotate::AnnotatedTriple;

/// A root cause of the failure, the trigger that fired and the data
/// channel that showed it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RootCauseChain {
    pub root_cause: String,
    pub trigger: String,
    pub data_channel: String,
}

/// Chains for `failure` over annotated triples.
///
/// A chain needs a `hasRootCause` edge from the failure, a True
/// `isTriggeredBy` edge from that root cause and a True `consume` edge
/// from that trigger. Chains are distinct and follow the order of the
/// edges in `annotated`.
pub fn assemble_root_causes(annotated: &[AnnotatedTriple], failure: &str) -> Vec<RootCauseChain> {
    let edges = |predicate: Predicate, subject: &str, require_true: bool| {
        annotated
            .iter()
            .filter(move |a| a.triple.predicate == predicate && a.triple.subject == subject)
            .filter(move |a| !require_true || a.status == Some(Status::True))
            .map(|a| a.triple.object.clone())
            .collect::<Vec<_>>()
    };

    let mut seen = HashSet::new();
    let mut chains = Vec::new();
    for root_cause in edges(Predicate::HasRootCause, failure, false) {
        for trigger in edges(Predicate::IsTriggeredBy, &root_cause, true) {
            for data_channel in edges(Predicate::Consume, &trigger, true) {
                let chain = RootCauseChain {
                    root_cause: root_cause.clone(),
                    trigger: trigger.clone(),
                    data_channel,
                };
                if seen.insert(chain.clone()) {
                    chains.push(chain);
                }
            }
        }
    }
    chains
}

/// Whether any `hasRootCause` edge leaves `failure`
pub fn has_root_causes(annotated: &[AnnotatedTriple], failure: &str) -> bool {
    annotated
        .iter()
        .any(|a| a.triple.predicate == Predicate::HasRootCause && a.triple.subject == failure)
}
