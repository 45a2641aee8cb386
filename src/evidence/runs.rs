//! Run identifiers and run selection
//!
//! A run is one equipment execution window. Users pick it by serial number,
//! job number and job start; the fleet metadata resolves that tuple to the
//! partition id every telemetry query is keyed by.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::observability::{log_event_with_fields, Event};

use super::errors::{EvidenceError, EvidenceResult};
use super::store::RunMetadataSource;

/// Placeholder shown for a missing metadata value
pub const MISSING_VALUE: &str = "NaN";

/// Accepted job start formats, most specific first
const JOB_START_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Partition id scoping all telemetry of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub u64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of the fleet metadata table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub job_number: Option<String>,
    #[serde(default)]
    pub job_start: Option<NaiveDateTime>,
    pub partition_id: RunId,
}

/// Formats a job start the way the selection lists it: 26 characters,
/// microsecond precision
pub fn format_job_start(ts: &NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

pub fn parse_job_start(text: &str) -> Option<NaiveDateTime> {
    JOB_START_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text.trim(), fmt).ok())
}

/// The user's choice of run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSelection {
    pub serial_number: String,
    pub job_number: String,
    pub job_start: String,
}

impl fmt::Display for RunSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "serial '{}', job '{}', start '{}'",
            self.serial_number, self.job_number, self.job_start
        )
    }
}

/// Cascading run choices and selection resolution over the fleet metadata
#[derive(Debug, Clone, Default)]
pub struct RunCatalog {
    records: Vec<RunRecord>,
}

fn display_or_missing(value: Option<&str>) -> String {
    value.unwrap_or(MISSING_VALUE).to_string()
}

impl RunCatalog {
    pub fn new(records: Vec<RunRecord>) -> Self {
        Self { records }
    }

    /// Reads the fleet metadata once
    pub fn load<M: RunMetadataSource + ?Sized>(source: &mut M) -> EvidenceResult<Self> {
        Ok(Self::new(source.runs()?))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct serial numbers, sorted; missing ones listed as `NaN`
    pub fn serial_numbers(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| display_or_missing(r.serial_number.as_deref()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct job numbers of a serial, sorted. `NaN` has no jobs.
    pub fn job_numbers(&self, serial_number: &str) -> Vec<String> {
        if serial_number == MISSING_VALUE {
            return Vec::new();
        }
        self.records
            .iter()
            .filter(|r| r.serial_number.as_deref() == Some(serial_number))
            .map(|r| display_or_missing(r.job_number.as_deref()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct job starts of a (serial, job) pair, sorted
    pub fn job_starts(&self, serial_number: &str, job_number: &str) -> Vec<String> {
        if serial_number == MISSING_VALUE || job_number == MISSING_VALUE {
            return Vec::new();
        }
        self.records
            .iter()
            .filter(|r| r.serial_number.as_deref() == Some(serial_number))
            .filter(|r| r.job_number.as_deref() == Some(job_number))
            .map(|r| {
                r.job_start
                    .as_ref()
                    .map(format_job_start)
                    .unwrap_or_else(|| MISSING_VALUE.to_string())
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Resolves a selection to exactly one run.
    ///
    /// Zero or several distinct matching run ids are an error; no run is
    /// guessed.
    pub fn resolve(&self, selection: &RunSelection) -> EvidenceResult<RunId> {
        let job_start = parse_job_start(&selection.job_start).ok_or_else(|| {
            EvidenceError::invalid_selection(format!(
                "Unrecognised job start '{}', expected YYYY-MM-DD HH:MM:SS[.ffffff]",
                selection.job_start
            ))
        })?;

        let matches: BTreeSet<RunId> = self
            .records
            .iter()
            .filter(|r| r.serial_number.as_deref() == Some(selection.serial_number.as_str()))
            .filter(|r| r.job_number.as_deref() == Some(selection.job_number.as_str()))
            .filter(|r| r.job_start == Some(job_start))
            .map(|r| r.partition_id)
            .collect();

        let selection_text = selection.to_string();
        if matches.len() != 1 {
            let count = matches.len().to_string();
            log_event_with_fields(
                Event::RunSelectionRejected,
                &[
                    ("matches", count.as_str()),
                    ("selection", selection_text.as_str()),
                ],
            );
            return Err(EvidenceError::ambiguous_selection(selection, matches.len()));
        }

        let run = matches
            .into_iter()
            .next()
            .ok_or_else(|| EvidenceError::ambiguous_selection(selection, 0))?;
        let run_text = run.to_string();
        log_event_with_fields(
            Event::RunResolved,
            &[
                ("run_id", run_text.as_str()),
                ("selection", selection_text.as_str()),
            ],
        );
        Ok(run)
    }
}
