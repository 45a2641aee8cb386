//! Run Selection Tests
//!
//! Tests for run selection over a telemetry snapshot file:
//! - Cascading choices are sorted and distinct
//! - A selection resolves to exactly one run or fails
//! - Missing metadata values are listed but never selectable

use faultgraph::evidence::{
    EvidenceErrorCode, RunCatalog, RunId, RunSelection, TelemetrySnapshot, MISSING_VALUE,
};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn open_catalog(dir: &TempDir) -> RunCatalog {
    let path = dir.path().join("telemetry.json");
    let telemetry = json!({
        "runs": [
            {"serial_number": "SN-200", "job_number": "J7", "job_start": "2024-05-02T08:00:00", "partition_id": 70},
            {"serial_number": "SN-100", "job_number": "J2", "job_start": "2024-05-01T12:00:00.123456", "partition_id": 21},
            {"serial_number": "SN-100", "job_number": "J1", "job_start": "2024-05-01T09:30:00", "partition_id": 11},
            {"serial_number": "SN-100", "job_number": "J1", "job_start": "2024-05-01T09:30:00", "partition_id": 11},
            {"serial_number": "SN-300", "job_number": "J9", "job_start": "2024-05-03T00:00:00", "partition_id": 90},
            {"serial_number": "SN-300", "job_number": "J9", "job_start": "2024-05-03T00:00:00", "partition_id": 91},
            {"job_number": "J0", "partition_id": 1}
        ]
    });
    fs::write(&path, telemetry.to_string()).unwrap();

    let mut snapshot = TelemetrySnapshot::open(&path).unwrap();
    RunCatalog::load(&mut snapshot).unwrap()
}

fn select(serial: &str, job: &str, start: &str) -> RunSelection {
    RunSelection {
        serial_number: serial.into(),
        job_number: job.into(),
        job_start: start.into(),
    }
}

// =============================================================================
// Cascading Choice Tests
// =============================================================================

#[test]
fn test_choices_cascade() {
    let dir = TempDir::new().unwrap();
    let catalog = open_catalog(&dir);

    assert_eq!(catalog.len(), 7);
    assert_eq!(
        catalog.serial_numbers(),
        vec![MISSING_VALUE, "SN-100", "SN-200", "SN-300"]
    );
    assert_eq!(catalog.job_numbers("SN-100"), vec!["J1", "J2"]);
    assert_eq!(
        catalog.job_starts("SN-100", "J2"),
        vec!["2024-05-01 12:00:00.123456"]
    );
    assert!(catalog.job_numbers(MISSING_VALUE).is_empty());
    assert!(catalog.job_starts("SN-100", MISSING_VALUE).is_empty());
}

/// Every listed start resolves back to a run when it is unique.
#[test]
fn test_listed_starts_resolve() {
    let dir = TempDir::new().unwrap();
    let catalog = open_catalog(&dir);

    for start in catalog.job_starts("SN-100", "J1") {
        assert_eq!(
            catalog.resolve(&select("SN-100", "J1", &start)).unwrap(),
            RunId(11)
        );
    }
}

// =============================================================================
// Resolution Tests
// =============================================================================

#[test]
fn test_no_match_is_rejected() {
    let dir = TempDir::new().unwrap();
    let catalog = open_catalog(&dir);

    let err = catalog
        .resolve(&select("SN-100", "J1", "2024-05-01 09:31:00"))
        .unwrap_err();
    assert_eq!(err.code(), EvidenceErrorCode::RunSelectionAmbiguous);
    assert!(err.message().starts_with("No run found"));
}

#[test]
fn test_several_runs_are_rejected() {
    let dir = TempDir::new().unwrap();
    let catalog = open_catalog(&dir);

    let err = catalog
        .resolve(&select("SN-300", "J9", "2024-05-03 00:00:00"))
        .unwrap_err();
    assert_eq!(err.code(), EvidenceErrorCode::RunSelectionAmbiguous);
    assert!(err.message().contains("2 runs"));
}

#[test]
fn test_missing_serial_is_not_selectable() {
    let dir = TempDir::new().unwrap();
    let catalog = open_catalog(&dir);

    let err = catalog
        .resolve(&select(MISSING_VALUE, "J0", "2024-05-01 00:00:00"))
        .unwrap_err();
    assert_eq!(err.code(), EvidenceErrorCode::RunSelectionAmbiguous);
}

#[test]
fn test_unparseable_start_is_invalid() {
    let dir = TempDir::new().unwrap();
    let catalog = open_catalog(&dir);

    let err = catalog.resolve(&select("SN-100", "J1", "01/05/2024")).unwrap_err();
    assert_eq!(err.code(), EvidenceErrorCode::RunSelectionInvalid);
}

#[test]
fn test_unreadable_snapshot_is_unreachable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("telemetry.json");
    fs::write(&path, "{not json").unwrap();

    let err = TelemetrySnapshot::open(&path).unwrap_err();
    assert_eq!(err.code(), EvidenceErrorCode::EvidenceUnreachable);
}
