//! Collaborator seams for telemetry access

use super::errors::EvidenceResult;
use super::query::{Evidence, EvidenceQuery};
use super::runs::{RunId, RunRecord};

/// Read-only access to per-run telemetry.
///
/// Implementations must not mutate backend state. "No rows" is a valid
/// result (`Sum(None)` / `Presence(false)`); an unreachable backend or a
/// failed query is an error.
pub trait EvidenceStore {
    fn fetch(&mut self, run: RunId, query: &EvidenceQuery) -> EvidenceResult<Evidence>;
}

/// Source of the fleet metadata rows used for run selection
pub trait RunMetadataSource {
    fn runs(&mut self) -> EvidenceResult<Vec<RunRecord>>;
}

impl<E: EvidenceStore + ?Sized> EvidenceStore for &mut E {
    fn fetch(&mut self, run: RunId, query: &EvidenceQuery) -> EvidenceResult<Evidence> {
        (**self).fetch(run, query)
    }
}
