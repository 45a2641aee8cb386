//! File-backed telemetry snapshot
//!
//! An in-memory copy of the telemetry tables the named queries read, loaded
//! from one JSON document. It answers queries with the same semantics as the
//! SQL each query renders: `SUM` over no rows (or only nulls) is absent.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::observability::{log_event_with_fields, Event};

use super::errors::{EvidenceError, EvidenceResult};
use super::query::{Evidence, EvidenceQuery, PumpSize, CALIBRATION_FAIL, SIGMA_BAND_METRICS};
use super::runs::{RunId, RunRecord};
use super::store::{EvidenceStore, RunMetadataSource};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitCheckRow {
    pub partition_id: RunId,
    pub xcol: String,
    pub metric_name: String,
    #[serde(default)]
    pub error_count: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusWordRow {
    pub partition_id: RunId,
    pub xcol: String,
    pub xcol_decoded: String,
    #[serde(default)]
    pub count_error: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericLimitRow {
    pub partition_id: RunId,
    pub xcol: String,
    #[serde(default)]
    pub error_count: Option<i64>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEventRow {
    pub partition_id: RunId,
    pub event_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationRow {
    pub partition_id: RunId,
    pub health_indicator: String,
}

/// All telemetry tables, as stored on disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    #[serde(default)]
    pub runs: Vec<RunRecord>,
    #[serde(default)]
    pub limit_checks: Vec<LimitCheckRow>,
    #[serde(default)]
    pub status_words: Vec<StatusWordRow>,
    #[serde(default)]
    pub generic_limit_checks: Vec<GenericLimitRow>,
    #[serde(default)]
    pub generic_status_checks: Vec<StatusEventRow>,
    #[serde(default)]
    pub large_pump_calibration: Vec<CalibrationRow>,
    #[serde(default)]
    pub small_pump_calibration: Vec<CalibrationRow>,
}

/// SQL `SUM`: absent when nothing non-null was summed. Overflow is an
/// error, never a wrapped total.
fn sum<I: Iterator<Item = Option<i64>>>(values: I) -> Result<Option<i64>, SumOverflow> {
    values.flatten().try_fold(None, |acc: Option<i64>, v| {
        acc.unwrap_or(0).checked_add(v).map(Some).ok_or(SumOverflow)
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SumOverflow;

impl TelemetrySnapshot {
    /// Opens a snapshot file. A missing or unparseable file means the
    /// telemetry backend is unreachable.
    pub fn open(path: &Path) -> EvidenceResult<Self> {
        let display = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|e| {
            EvidenceError::unreachable(format!("Cannot open telemetry '{}': {}", display, e))
        })?;
        let snapshot: TelemetrySnapshot = serde_json::from_str(&content).map_err(|e| {
            EvidenceError::unreachable(format!("Invalid telemetry '{}': {}", display, e))
        })?;

        let runs = snapshot.runs.len().to_string();
        log_event_with_fields(
            Event::TelemetryOpened,
            &[("path", display.as_str()), ("runs", runs.as_str())],
        );
        Ok(snapshot)
    }

    fn calibration_rows(&self, pump: PumpSize) -> &[CalibrationRow] {
        match pump {
            PumpSize::Large => &self.large_pump_calibration,
            PumpSize::Small => &self.small_pump_calibration,
        }
    }
}

impl EvidenceStore for TelemetrySnapshot {
    fn fetch(&mut self, run: RunId, query: &EvidenceQuery) -> EvidenceResult<Evidence> {
        let overflow =
            |_: SumOverflow| EvidenceError::query_failed(run, query.name(), "sum overflow");
        let evidence = match query {
            EvidenceQuery::LimitCheckErrors {
                channel,
                sigma_band_only,
            } => Evidence::Sum(sum(self
                .limit_checks
                .iter()
                .filter(|r| r.partition_id == run && &r.xcol == channel)
                .filter(|r| !sigma_band_only || SIGMA_BAND_METRICS.contains(&r.metric_name.as_str()))
                .map(|r| r.error_count))
            .map_err(overflow)?),
            EvidenceQuery::StatusWordErrors { channel, words } => Evidence::Sum(sum(self
                .status_words
                .iter()
                .filter(|r| r.partition_id == run && &r.xcol == channel)
                .filter(|r| words.contains(&r.xcol_decoded.as_str()))
                .map(|r| r.count_error))
            .map_err(overflow)?),
            EvidenceQuery::GenericLimitErrors { channel } => Evidence::Sum(sum(self
                .generic_limit_checks
                .iter()
                .filter(|r| r.partition_id == run && &r.xcol == channel)
                .map(|r| r.error_count))
            .map_err(overflow)?),
            EvidenceQuery::StatusEventPresent { event_name } => Evidence::Presence(
                self.generic_status_checks
                    .iter()
                    .any(|r| r.partition_id == run && &r.event_name == event_name),
            ),
            EvidenceQuery::PumpCalibrationFailed { pump } => Evidence::Presence(
                self.calibration_rows(*pump)
                    .iter()
                    .any(|r| r.partition_id == run && r.health_indicator == CALIBRATION_FAIL),
            ),
        };
        Ok(evidence)
    }
}

impl RunMetadataSource for TelemetrySnapshot {
    fn runs(&mut self) -> EvidenceResult<Vec<RunRecord>> {
        Ok(self.runs.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::EvidenceErrorCode;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MOTOR_WORDS: &[&str] = &["FNFM_TripPhaseAFM", "FNFM_FaultIaFM"];

    fn snapshot() -> TelemetrySnapshot {
        serde_json::from_value(json!({
            "limit_checks": [
                {"partition_id": 42, "xcol": "MCDIGVLTFM", "metric_name": "above_sigma_one", "error_count": 7000},
                {"partition_id": 42, "xcol": "MCDIGVLTFM", "metric_name": "below_sigma_one", "error_count": 5000},
                {"partition_id": 42, "xcol": "MCDIGVLTFM", "metric_name": "above_sigma_two", "error_count": 900},
                {"partition_id": 43, "xcol": "MCDIGVLTFM", "metric_name": "above_sigma_one", "error_count": 1}
            ],
            "status_words": [
                {"partition_id": 42, "xcol": "MTERRSTAFM", "xcol_decoded": "FNFM_TripPhaseAFM", "count_error": 3},
                {"partition_id": 42, "xcol": "MTERRSTAFM", "xcol_decoded": "FNFM_Other", "count_error": 100},
                {"partition_id": 42, "xcol": "MTERRSTAFM", "xcol_decoded": "FNFM_FaultIaFM", "count_error": null}
            ],
            "generic_status_checks": [
                {"partition_id": 42, "event_name": "FNFM Uplink telemetry"}
            ],
            "small_pump_calibration": [
                {"partition_id": 42, "health_indicator": "Pass"}
            ],
            "large_pump_calibration": [
                {"partition_id": 42, "health_indicator": "Fail"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_sigma_band_sum_excludes_other_metrics_and_runs() {
        let mut s = snapshot();
        let query = EvidenceQuery::LimitCheckErrors {
            channel: "MCDIGVLTFM".into(),
            sigma_band_only: true,
        };
        assert_eq!(s.fetch(RunId(42), &query).unwrap(), Evidence::Sum(Some(12000)));

        let all = EvidenceQuery::LimitCheckErrors {
            channel: "MCDIGVLTFM".into(),
            sigma_band_only: false,
        };
        assert_eq!(s.fetch(RunId(42), &all).unwrap(), Evidence::Sum(Some(12900)));
    }

    #[test]
    fn test_sum_over_no_rows_is_absent() {
        let mut s = snapshot();
        let query = EvidenceQuery::GenericLimitErrors {
            channel: "MCDIGVLTFM".into(),
        };
        assert_eq!(s.fetch(RunId(42), &query).unwrap(), Evidence::Sum(None));
    }

    #[test]
    fn test_status_words_filter_and_skip_nulls() {
        let mut s = snapshot();
        let query = EvidenceQuery::StatusWordErrors {
            channel: "MTERRSTAFM".into(),
            words: MOTOR_WORDS,
        };
        assert_eq!(s.fetch(RunId(42), &query).unwrap(), Evidence::Sum(Some(3)));
    }

    #[test]
    fn test_presence_queries() {
        let mut s = snapshot();
        let event = EvidenceQuery::StatusEventPresent {
            event_name: "FNFM Uplink telemetry".into(),
        };
        assert_eq!(s.fetch(RunId(42), &event).unwrap(), Evidence::Presence(true));
        assert_eq!(s.fetch(RunId(43), &event).unwrap(), Evidence::Presence(false));

        let large = EvidenceQuery::PumpCalibrationFailed { pump: PumpSize::Large };
        let small = EvidenceQuery::PumpCalibrationFailed { pump: PumpSize::Small };
        assert_eq!(s.fetch(RunId(42), &large).unwrap(), Evidence::Presence(true));
        assert_eq!(s.fetch(RunId(42), &small).unwrap(), Evidence::Presence(false));
    }

    #[test]
    fn test_open_missing_file_is_unreachable() {
        let err = TelemetrySnapshot::open(Path::new("/nonexistent/telemetry.json")).unwrap_err();
        assert_eq!(err.code(), EvidenceErrorCode::EvidenceUnreachable);
    }

    #[test]
    fn test_open_reads_runs() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "{}",
            json!({"runs": [{"serial_number": "SN-1", "job_number": "J1",
                             "job_start": "2024-03-01T10:00:00", "partition_id": 5}]})
        )
        .unwrap();

        let mut s = TelemetrySnapshot::open(file.path()).unwrap();
        let runs = s.runs().unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].partition_id, RunId(5));
    }

    #[test]
    fn test_sum_overflow_is_query_failure() {
        let mut s: TelemetrySnapshot = serde_json::from_value(json!({
            "generic_limit_checks": [
                {"partition_id": 1, "xcol": "CH", "error_count": i64::MAX},
                {"partition_id": 1, "xcol": "CH", "error_count": 1}
            ]
        }))
        .unwrap();

        let err = s
            .fetch(RunId(1), &EvidenceQuery::GenericLimitErrors { channel: "CH".into() })
            .unwrap_err();
        assert_eq!(err.code(), EvidenceErrorCode::EvidenceQueryFailed);
        assert!(err.message().contains("sum overflow"));
    }

    #[test]
    fn test_sum_of_large_counts_below_max() {
        let total = sum([Some(i64::MAX - 1), None, Some(1)].into_iter()).unwrap();
        assert_eq!(total, Some(i64::MAX));
        assert_eq!(sum(std::iter::empty()).unwrap(), None);
    }
}
