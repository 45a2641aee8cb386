//! Evidence store adapter
//!
//! Parameterized, read-only telemetry queries scoped to one run, plus the
//! run selection that produces that run id.
//!
//! # Failure model
//!
//! - No rows: a valid result (`Sum(None)`, `Presence(false)`)
//! - Backend unreachable or query failed: `EvidenceError`, ends the run
//! - Selection matching zero or several runs: `EvidenceError`, ends the run

mod errors;
mod query;
mod runs;
mod snapshot;
mod store;

pub use errors::{EvidenceError, EvidenceErrorCode, EvidenceResult};
pub use query::{
    Evidence, EvidenceQuery, EvidenceShape, PumpSize, SqlStatement, CALIBRATION_FAIL,
    SIGMA_BAND_METRICS,
};
pub use runs::{
    format_job_start, parse_job_start, RunCatalog, RunId, RunRecord, RunSelection, MISSING_VALUE,
};
pub use snapshot::{
    CalibrationRow, GenericLimitRow, LimitCheckRow, StatusEventRow, StatusWordRow,
    TelemetrySnapshot,
};
pub use store::{EvidenceStore, RunMetadataSource};
