//! Trigger evaluation against one run's telemetry
//!
//! The evaluator looks the trigger up in the registry, issues the rule's
//! query through the injected evidence store and applies the rule's
//! condition. A trigger without a rule is Unknown. Store failures are
//! errors, never a False verdict.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::evidence::{Evidence, EvidenceStore, RunId};
use crate::graph::{Predicate, Triple};
use crate::observability::{log_event_with_fields, Event, Logger, ObservationScope, Severity};

use super::catalogue::RuleId;
use super::errors::{EvaluationError, EvaluationResult};
use super::registry::RuleRegistry;

/// Verdict on one trigger / data channel pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    True,
    False,
    Unknown,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::True => "True",
            Status::False => "False",
            Status::Unknown => "Unknown",
        }
    }

    /// Combines child verdicts: any True wins, then any Unknown, else
    /// False. No children, no verdict.
    pub fn combine<I: IntoIterator<Item = Status>>(statuses: I) -> Option<Status> {
        statuses.into_iter().fold(None, |acc, s| {
            Some(match (acc, s) {
                (Some(Status::True), _) | (_, Status::True) => Status::True,
                (Some(Status::Unknown), _) | (_, Status::Unknown) => Status::Unknown,
                _ => Status::False,
            })
        })
    }
}

impl From<bool> for Status {
    fn from(value: bool) -> Self {
        if value {
            Status::True
        } else {
            Status::False
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of one evaluated `consume` triple
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationOutcome {
    pub triple: Triple,
    pub status: Status,
    /// Rule that produced the status; absent for unmodeled triggers
    pub rule: Option<RuleId>,
    /// Raw evidence the rule was applied to
    pub evidence: Option<Evidence>,
}

/// `consume` triples whose trigger some root cause is triggered by.
///
/// Distinct, in first-seen order of the `consume` triples.
pub fn trigger_candidates(triples: &[Triple]) -> Vec<Triple> {
    let triggers: HashSet<&str> = triples
        .iter()
        .filter(|t| t.predicate == Predicate::IsTriggeredBy)
        .map(|t| t.object.as_str())
        .collect();

    let mut seen = HashSet::new();
    triples
        .iter()
        .filter(|t| t.predicate == Predicate::Consume && triggers.contains(t.subject.as_str()))
        .filter(|t| seen.insert(*t))
        .cloned()
        .collect()
}

/// Rule evaluator bound to a registry and an evidence store
pub struct Evaluator<'a, E: EvidenceStore> {
    registry: &'a RuleRegistry,
    evidence: &'a mut E,
}

impl<'a, E: EvidenceStore> Evaluator<'a, E> {
    pub fn new(registry: &'a RuleRegistry, evidence: &'a mut E) -> Self {
        Self { registry, evidence }
    }

    /// Verdict for `trigger` on `run`, reading `channel`
    pub fn evaluate(&mut self, trigger: &str, run: RunId, channel: &str) -> EvaluationResult<Status> {
        let (status, _, _) = self.evaluate_detailed(trigger, run, channel)?;
        Ok(status)
    }

    /// Evaluates every trigger candidate of a traversal, one query each,
    /// in candidate order
    pub fn evaluate_all(
        &mut self,
        triples: &[Triple],
        run: RunId,
    ) -> EvaluationResult<Vec<EvaluationOutcome>> {
        let run_text = run.to_string();
        let scope = ObservationScope::with_fields("EVALUATION", &[("run_id", run_text.as_str())]);

        let mut outcomes = Vec::new();
        for candidate in trigger_candidates(triples) {
            let (status, rule, evidence) =
                match self.evaluate_detailed(&candidate.subject, run, &candidate.object) {
                    Ok(verdict) => verdict,
                    Err(e) => {
                        scope.fail(&e.to_string());
                        return Err(e);
                    }
                };
            outcomes.push(EvaluationOutcome {
                triple: candidate,
                status,
                rule,
                evidence,
            });
        }

        let count = outcomes.len().to_string();
        scope.complete_with_fields(&[("outcomes", count.as_str())]);
        Ok(outcomes)
    }

    fn evaluate_detailed(
        &mut self,
        trigger: &str,
        run: RunId,
        channel: &str,
    ) -> EvaluationResult<(Status, Option<RuleId>, Option<Evidence>)> {
        let run_text = run.to_string();
        let rule = match self.registry.lookup(trigger) {
            Some(rule) => rule,
            None => {
                Logger::warn(
                    Event::UnmodeledTrigger.as_str(),
                    &[
                        ("channel", channel),
                        ("run_id", run_text.as_str()),
                        ("trigger", trigger),
                    ],
                );
                return Ok((Status::Unknown, None, None));
            }
        };

        let check = rule.check(channel);
        if Logger::enabled(Severity::Trace) {
            let sql = check.query.sql(run).to_string();
            Logger::trace(
                Event::EvidenceQueried.as_str(),
                &[
                    ("query", check.query.name()),
                    ("rule", rule.name()),
                    ("run_id", run_text.as_str()),
                    ("sql", sql.as_str()),
                ],
            );
        }

        let evidence = match self.evidence.fetch(run, &check.query) {
            Ok(evidence) => evidence,
            Err(source) => {
                let message = source.to_string();
                log_event_with_fields(
                    Event::EvidenceUnavailable,
                    &[
                        ("error", message.as_str()),
                        ("rule", rule.name()),
                        ("run_id", run_text.as_str()),
                        ("trigger", trigger),
                    ],
                );
                return Err(EvaluationError::Evidence {
                    rule,
                    trigger: trigger.to_string(),
                    run_id: run,
                    source: source.for_run(run),
                });
            }
        };

        let holds = check
            .condition
            .holds(evidence)
            .ok_or(EvaluationError::ShapeMismatch {
                rule,
                run_id: run,
                expected: check.condition.shape(),
                actual: evidence.shape(),
            })?;
        let status = Status::from(holds);

        let evidence_text = evidence.to_string();
        log_event_with_fields(
            Event::TriggerEvaluated,
            &[
                ("channel", channel),
                ("evidence", evidence_text.as_str()),
                ("rule", rule.name()),
                ("run_id", run_text.as_str()),
                ("status", status.as_str()),
                ("trigger", trigger),
            ],
        );
        Ok((status, Some(rule), Some(evidence)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::{EvidenceError, EvidenceQuery, EvidenceResult};

    /// Answers every query with the same evidence and records the calls
    struct FixedStore {
        answer: Evidence,
        calls: Vec<(RunId, EvidenceQuery)>,
    }

    impl FixedStore {
        fn new(answer: Evidence) -> Self {
            Self {
                answer,
                calls: Vec::new(),
            }
        }
    }

    impl EvidenceStore for FixedStore {
        fn fetch(&mut self, run: RunId, query: &EvidenceQuery) -> EvidenceResult<Evidence> {
            self.calls.push((run, query.clone()));
            Ok(self.answer)
        }
    }

    struct DownStore;

    impl EvidenceStore for DownStore {
        fn fetch(&mut self, _run: RunId, _query: &EvidenceQuery) -> EvidenceResult<Evidence> {
            Err(EvidenceError::unreachable("connection refused"))
        }
    }

    fn registry() -> RuleRegistry {
        let mut registry = RuleRegistry::empty();
        registry.register("VoltageDrop", RuleId::ThresholdOver10450);
        registry.register("Uplink", RuleId::StatusCheck);
        registry
    }

    #[test]
    fn test_unmodeled_trigger_is_unknown_without_query() {
        let registry = registry();
        let mut store = FixedStore::new(Evidence::Sum(Some(99999)));
        let mut evaluator = Evaluator::new(&registry, &mut store);
        let status = evaluator.evaluate("Mystery", RunId(1), "CH").unwrap();
        assert_eq!(status, Status::Unknown);
        assert!(store.calls.is_empty());
    }

    #[test]
    fn test_threshold_boundary() {
        let registry = registry();
        let mut at = FixedStore::new(Evidence::Sum(Some(10450)));
        assert_eq!(
            Evaluator::new(&registry, &mut at)
                .evaluate("VoltageDrop", RunId(42), "MCDIGVLTFM")
                .unwrap(),
            Status::False
        );
        let mut above = FixedStore::new(Evidence::Sum(Some(10451)));
        assert_eq!(
            Evaluator::new(&registry, &mut above)
                .evaluate("VoltageDrop", RunId(42), "MCDIGVLTFM")
                .unwrap(),
            Status::True
        );
    }

    #[test]
    fn test_query_is_scoped_to_run() {
        let registry = registry();
        let mut store = FixedStore::new(Evidence::Presence(true));
        Evaluator::new(&registry, &mut store)
            .evaluate("Uplink", RunId(7), "FNFM Uplink telemetry")
            .unwrap();
        assert_eq!(store.calls.len(), 1);
        assert_eq!(store.calls[0].0, RunId(7));
        assert_eq!(
            store.calls[0].1,
            EvidenceQuery::StatusEventPresent {
                event_name: "FNFM Uplink telemetry".into()
            }
        );
    }

    #[test]
    fn test_store_failure_is_an_error_not_false() {
        let registry = registry();
        let mut store = DownStore;
        let err = Evaluator::new(&registry, &mut store)
            .evaluate("VoltageDrop", RunId(42), "MCDIGVLTFM")
            .unwrap_err();
        assert_eq!(err.rule(), RuleId::ThresholdOver10450);
        assert_eq!(err.run_id(), RunId(42));
        assert_eq!(err.evidence_error().and_then(|e| e.run_id()), Some(RunId(42)));
    }

    #[test]
    fn test_shape_mismatch_is_an_error() {
        let registry = registry();
        let mut store = FixedStore::new(Evidence::Sum(Some(3)));
        let err = Evaluator::new(&registry, &mut store)
            .evaluate("Uplink", RunId(1), "CH")
            .unwrap_err();
        assert!(matches!(err, EvaluationError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_candidates_join_triggers_with_consumers() {
        let triples = vec![
            Triple::new("PumpStall", Predicate::HasRootCause, "LowVoltage"),
            Triple::new("LowVoltage", Predicate::IsTriggeredBy, "VoltageDrop"),
            Triple::new("VoltageDrop", Predicate::Consume, "MCDIGVLTFM"),
            Triple::new("Orphan", Predicate::Consume, "X"),
            Triple::new("VoltageDrop", Predicate::Consume, "MCDIGVLTFM"),
            Triple::new("VoltageDrop", Predicate::Consume, "MCREFVLTFM"),
        ];
        let candidates = trigger_candidates(&triples);
        assert_eq!(
            candidates,
            vec![
                Triple::new("VoltageDrop", Predicate::Consume, "MCDIGVLTFM"),
                Triple::new("VoltageDrop", Predicate::Consume, "MCREFVLTFM"),
            ]
        );
    }

    #[test]
    fn test_evaluate_all_one_query_per_candidate() {
        let triples = vec![
            Triple::new("LowVoltage", Predicate::IsTriggeredBy, "VoltageDrop"),
            Triple::new("LowVoltage", Predicate::IsTriggeredBy, "Mystery"),
            Triple::new("VoltageDrop", Predicate::Consume, "MCDIGVLTFM"),
            Triple::new("Mystery", Predicate::Consume, "ZZZ"),
        ];
        let registry = registry();
        let mut store = FixedStore::new(Evidence::Sum(Some(12000)));
        let outcomes = Evaluator::new(&registry, &mut store)
            .evaluate_all(&triples, RunId(42))
            .unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].status, Status::True);
        assert_eq!(outcomes[0].rule, Some(RuleId::ThresholdOver10450));
        assert_eq!(outcomes[0].evidence, Some(Evidence::Sum(Some(12000))));
        assert_eq!(outcomes[1].status, Status::Unknown);
        assert_eq!(outcomes[1].rule, None);
        assert_eq!(store.calls.len(), 1);
    }

    #[test]
    fn test_evaluate_all_stops_at_first_store_failure() {
        let triples = vec![
            Triple::new("LowVoltage", Predicate::IsTriggeredBy, "Mystery"),
            Triple::new("LowVoltage", Predicate::IsTriggeredBy, "VoltageDrop"),
            Triple::new("Mystery", Predicate::Consume, "ZZZ"),
            Triple::new("VoltageDrop", Predicate::Consume, "MCDIGVLTFM"),
        ];
        let registry = registry();
        let mut store = DownStore;
        let err = Evaluator::new(&registry, &mut store)
            .evaluate_all(&triples, RunId(9))
            .unwrap_err();
        assert_eq!(err.rule(), RuleId::ThresholdOver10450);
        assert_eq!(err.run_id(), RunId(9));
    }

    #[test]
    fn test_combine() {
        assert_eq!(Status::combine(Vec::new()), None);
        assert_eq!(
            Status::combine([Status::False, Status::Unknown]),
            Some(Status::Unknown)
        );
        assert_eq!(
            Status::combine([Status::Unknown, Status::True, Status::False]),
            Some(Status::True)
        );
        assert_eq!(Status::combine([Status::False]), Some(Status::False));
    }
}
