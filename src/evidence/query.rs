//! Named telemetry queries
//!
//! Every query is read-only and scoped to exactly one run. Aggregates yield
//! `Evidence::Sum` (absent when no row matched, like SQL `SUM` over nothing);
//! presence queries yield `Evidence::Presence`.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::runs::RunId;

pub const LIMIT_CHECK_TABLE: &str = "PRD_RP_PRODUCT_VIEW.FNFM_LIMIT_CHECK_PER_JOB";
pub const STATUS_WORDS_TABLE: &str = "PRD_RP_PRODUCT_VIEW.FNFM_STATUS_WORDS_AGGREGATED_PER_JOB";
pub const GENERIC_LIMIT_TABLE: &str =
    "PRD_GLBL_DATA_PRODUCTS.FNFM_fleet_timeseries_generic_limit_checks_agg_mavg";
pub const GENERIC_STATUS_TABLE: &str =
    "PRD_GLBL_DATA_PRODUCTS.FNFM_fleet_timeseries_generic_status_checks";
pub const LARGE_PUMP_TABLE: &str = "PRD_GLBL_DATA_PRODUCTS.FNFM_fleet_timeseries_large_pump_cal_check";
pub const SMALL_PUMP_TABLE: &str = "PRD_GLBL_DATA_PRODUCTS.FNFM_fleet_timeseries_small_pump_cal_check";

/// Limit-check metrics counted as sigma-band excursions
pub const SIGMA_BAND_METRICS: [&str; 2] = ["above_sigma_one", "below_sigma_one"];

/// Health indicator value marking a failed calibration
pub const CALIBRATION_FAIL: &str = "Fail";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PumpSize {
    Large,
    Small,
}

impl PumpSize {
    pub fn table(&self) -> &'static str {
        match self {
            PumpSize::Large => LARGE_PUMP_TABLE,
            PumpSize::Small => SMALL_PUMP_TABLE,
        }
    }
}

/// A parameterized read-only telemetry query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvidenceQuery {
    /// `SUM(error_count)` of limit checks on a channel, optionally only
    /// the sigma-band metrics
    LimitCheckErrors {
        channel: String,
        sigma_band_only: bool,
    },
    /// `SUM(count_error)` of status words on a channel whose decoded word is
    /// one of `words`
    StatusWordErrors {
        channel: String,
        words: &'static [&'static str],
    },
    /// `SUM(error_count)` of moving-average limit checks on a channel
    GenericLimitErrors { channel: String },
    /// Whether a generic status-check row names the event
    StatusEventPresent { event_name: String },
    /// Whether a failed pump calibration row exists
    PumpCalibrationFailed { pump: PumpSize },
}

/// What a query yields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceShape {
    Sum,
    Presence,
}

/// Result of one evidence query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Evidence {
    /// Aggregate; `None` when no row (or only null values) matched
    Sum(Option<i64>),
    Presence(bool),
}

impl Evidence {
    pub fn shape(&self) -> EvidenceShape {
        match self {
            Evidence::Sum(_) => EvidenceShape::Sum,
            Evidence::Presence(_) => EvidenceShape::Presence,
        }
    }
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evidence::Sum(Some(v)) => write!(f, "{}", v),
            Evidence::Sum(None) => write!(f, "null"),
            Evidence::Presence(p) => write!(f, "{}", p),
        }
    }
}

/// SQL text with positional `?` placeholders and their values
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SqlStatement {
    pub text: String,
    pub params: Vec<String>,
}

impl fmt::Display for SqlStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -- [{}]", self.text, self.params.join(", "))
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

impl EvidenceQuery {
    /// Stable query name used in logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            EvidenceQuery::LimitCheckErrors { .. } => "limit_check_errors",
            EvidenceQuery::StatusWordErrors { .. } => "status_word_errors",
            EvidenceQuery::GenericLimitErrors { .. } => "generic_limit_errors",
            EvidenceQuery::StatusEventPresent { .. } => "status_event_present",
            EvidenceQuery::PumpCalibrationFailed { .. } => "pump_calibration_failed",
        }
    }

    pub fn shape(&self) -> EvidenceShape {
        match self {
            EvidenceQuery::StatusEventPresent { .. } | EvidenceQuery::PumpCalibrationFailed { .. } => {
                EvidenceShape::Presence
            }
            _ => EvidenceShape::Sum,
        }
    }

    /// Renders the statement a database-backed store executes for `run`
    pub fn sql(&self, run: RunId) -> SqlStatement {
        let run = run.to_string();
        match self {
            EvidenceQuery::LimitCheckErrors {
                channel,
                sigma_band_only: true,
            } => SqlStatement {
                text: format!(
                    "SELECT SUM(error_count) FROM {} WHERE xcol = ? AND metric_name IN (?, ?) AND partition_id = ?",
                    LIMIT_CHECK_TABLE
                ),
                params: vec![
                    channel.clone(),
                    SIGMA_BAND_METRICS[0].to_string(),
                    SIGMA_BAND_METRICS[1].to_string(),
                    run,
                ],
            },
            EvidenceQuery::LimitCheckErrors {
                channel,
                sigma_band_only: false,
            } => SqlStatement {
                text: format!(
                    "SELECT SUM(error_count) FROM {} WHERE xcol = ? AND partition_id = ?",
                    LIMIT_CHECK_TABLE
                ),
                params: vec![channel.clone(), run],
            },
            EvidenceQuery::StatusWordErrors { channel, words } => {
                let mut params = vec![channel.clone()];
                params.extend(words.iter().map(|w| w.to_string()));
                params.push(run);
                SqlStatement {
                    text: format!(
                        "SELECT SUM(count_error) FROM {} WHERE xcol = ? AND xcol_decoded IN ({}) AND partition_id = ?",
                        STATUS_WORDS_TABLE,
                        placeholders(words.len())
                    ),
                    params,
                }
            }
            EvidenceQuery::GenericLimitErrors { channel } => SqlStatement {
                text: format!(
                    "SELECT SUM(error_count) FROM {} WHERE xcol = ? AND partition_id = ?",
                    GENERIC_LIMIT_TABLE
                ),
                params: vec![channel.clone(), run],
            },
            EvidenceQuery::StatusEventPresent { event_name } => SqlStatement {
                text: format!(
                    "SELECT 1 FROM {} WHERE event_name = ? AND partition_id = ? FETCH FIRST 1 ROW ONLY",
                    GENERIC_STATUS_TABLE
                ),
                params: vec![event_name.clone(), run],
            },
            EvidenceQuery::PumpCalibrationFailed { pump } => SqlStatement {
                text: format!(
                    "SELECT 1 FROM {} WHERE health_indicator = ? AND partition_id = ? FETCH FIRST 1 ROW ONLY",
                    pump.table()
                ),
                params: vec![CALIBRATION_FAIL.to_string(), run],
            },
        }
    }
}
