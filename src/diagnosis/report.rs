//! Diagnostic report
//!
//! Everything one diagnostic run produced, serializable as JSON and
//! printable as a root-cause table.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::evidence::RunId;
use crate::graph::Triple;
use crate::rules::{EvaluationOutcome, Status};
use crate::traversal::MaxDepth;

use super::annotate::AnnotatedTriple;
use super::chains::RootCauseChain;
use super::visual::VisualGraph;

pub const NO_ROOT_CAUSES: &str = "No root causes found for the selected failure.";

/// Marker printed after a confirmed data channel
pub const CONFIRMED_MARKER: &str = "\u{1F534}";

const HEADERS: [&str; 3] = ["Root Cause", "Trigger", "Data Channel"];

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticReport {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub failure: String,
    pub run_id: RunId,
    pub max_depth: MaxDepth,
    pub graph_digest: Option<String>,
    pub by_depth: BTreeMap<usize, Vec<Triple>>,
    pub outcomes: Vec<EvaluationOutcome>,
    pub evaluated: Vec<AnnotatedTriple>,
    pub chains: Vec<RootCauseChain>,
    pub visual: VisualGraph,
    pub notices: Vec<String>,
}

impl DiagnosticReport {
    pub fn triple_count(&self) -> usize {
        self.by_depth.values().map(Vec::len).sum()
    }

    /// Outcomes with the given status
    pub fn count_status(&self, status: Status) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    pub fn is_confirmed(&self) -> bool {
        !self.chains.is_empty()
    }
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== ROOT CAUSE REPORT ===")?;
        writeln!(f, "Report: {}", self.id)?;
        writeln!(f, "Failure: {}", self.failure)?;
        writeln!(f, "Run: {}", self.run_id)?;
        writeln!(f, "Max Depth: {}", self.max_depth)?;
        if let Some(digest) = &self.graph_digest {
            writeln!(f, "Graph: {}", digest)?;
        }
        writeln!(
            f,
            "Checks: {} true, {} false, {} unknown",
            self.count_status(Status::True),
            self.count_status(Status::False),
            self.count_status(Status::Unknown)
        )?;

        if !self.chains.is_empty() {
            let rows: Vec<[String; 3]> = self
                .chains
                .iter()
                .map(|c| {
                    [
                        c.root_cause.clone(),
                        c.trigger.clone(),
                        format!("{} {}", c.data_channel, CONFIRMED_MARKER),
                    ]
                })
                .collect();

            let mut widths = HEADERS.map(|h| h.chars().count());
            for row in &rows {
                for (width, cell) in widths.iter_mut().zip(row.iter()) {
                    *width = (*width).max(cell.chars().count());
                }
            }

            writeln!(f, "Root Causes:")?;
            writeln!(
                f,
                "  {:<w0$} | {:<w1$} | {}",
                HEADERS[0],
                HEADERS[1],
                HEADERS[2],
                w0 = widths[0],
                w1 = widths[1]
            )?;
            writeln!(
                f,
                "  {}-+-{}-+-{}",
                "-".repeat(widths[0]),
                "-".repeat(widths[1]),
                "-".repeat(widths[2])
            )?;
            for row in &rows {
                writeln!(
                    f,
                    "  {:<w0$} | {:<w1$} | {}",
                    row[0],
                    row[1],
                    row[2],
                    w0 = widths[0],
                    w1 = widths[1]
                )?;
            }
        }

        if !self.notices.is_empty() {
            writeln!(f, "Notices:")?;
            for notice in &self.notices {
                writeln!(f, "  - {}", notice)?;
            }
        }
        Ok(())
    }
}
