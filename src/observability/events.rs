//! Observable events
//!
//! Every log line names one of these events. Scoped operations
//! (`DIAGNOSIS`, `TRAVERSAL`, `EVALUATION`) additionally emit
//! `_BEGIN`/`_COMPLETE`/`_FAILED` through `ObservationScope`.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Startup
    /// Configuration file accepted
    ConfigLoaded,
    /// Knowledge graph built from its document
    GraphLoaded,
    /// Two concepts of different types share a label
    LabelCollision,
    /// Telemetry snapshot opened
    TelemetryOpened,
    /// Rule registry assembled
    RulesLoaded,

    // Run selection
    /// Selection resolved to a single run id
    RunResolved,
    /// Selection matched zero or several runs
    RunSelectionRejected,

    // Diagnosis
    /// One evidence query issued
    EvidenceQueried,
    /// Telemetry backend unreachable or query failed
    EvidenceUnavailable,
    /// A trigger was checked against telemetry
    TriggerEvaluated,
    /// A trigger has no registered rule
    UnmodeledTrigger,
    /// The selected failure has no hasRootCause edge
    NoRootCauses,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::GraphLoaded => "GRAPH_LOADED",
            Event::LabelCollision => "LABEL_COLLISION",
            Event::TelemetryOpened => "TELEMETRY_OPENED",
            Event::RulesLoaded => "RULES_LOADED",

            Event::RunResolved => "RUN_RESOLVED",
            Event::RunSelectionRejected => "RUN_SELECTION_REJECTED",

            Event::EvidenceQueried => "EVIDENCE_QUERIED",
            Event::EvidenceUnavailable => "EVIDENCE_UNAVAILABLE",
            Event::TriggerEvaluated => "TRIGGER_EVALUATED",
            Event::UnmodeledTrigger => "UNMODELED_TRIGGER",
            Event::NoRootCauses => "NO_ROOT_CAUSES",
        }
    }

    /// Events that end the current diagnostic run
    pub fn is_failure(&self) -> bool {
        matches!(self, Event::EvidenceUnavailable | Event::RunSelectionRejected)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
