//! Closed catalogue of verification rules
//!
//! Each rule is a fixed evidence query plus a fixed condition. Thresholds
//! use strict greater-than; presence rules are existence tests; an absent
//! aggregate never satisfies a rule.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::evidence::{Evidence, EvidenceQuery, EvidenceShape, PumpSize};

pub const CHANNEL_MC_DIGITAL_VOLTAGE: &str = "MCDIGVLTFM";
pub const CHANNEL_MC_REFERENCE_VOLTAGE: &str = "MCREFVLTFM";
pub const CHANNEL_MC_INPUT_VOLTAGE: &str = "MCINVLTFM";
pub const CHANNEL_MC_REALTIME_ERROR: &str = "MCRTERRFM";
pub const CHANNEL_MOTOR_ERROR_STATUS: &str = "MTERRSTAFM";

pub const TRIP_PHASE_A_WORDS: &[&str] = &["FNFM_TripPhaseAFM"];
pub const UPLINK_SEND_WORDS: &[&str] = &["FNFM_EIPUplinkMessageSend"];
pub const EIP_MESSAGE_WORDS: &[&str] = &[
    "FNFM_EIPUplinkMessageSend",
    "FNFM_EIPITCMessageSend",
    "FNFM_EIPLoopbackMessageSend",
    "FNFM_EIPDownlinkMessageReceive",
];
pub const MOTOR_FAULT_WORDS: &[&str] = &[
    "FNFM_FaultIbusFM",
    "FNFM_TripPhaseBFM",
    "FNFM_TripPhaseCFM",
    "FNFM_FaultIbFM",
    "FNFM_FaultIaFM",
    "FNFM_TripPhaseAFM",
];

/// Verification rule identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    ThresholdOver10450,
    ThresholdOver12000,
    ThresholdOver5000,
    TripPhaseAOver10,
    UplinkSendOver20,
    RealtimeErrorCheck,
    MotorErrorCheck,
    LimitCheck,
    StatusCheck,
    LargePumpCalibration,
    SmallPumpCalibration,
}

/// What the evidence must show for a rule to hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Aggregate strictly above the bound
    GreaterThan(i64),
    /// At least one matching row
    Exists,
}

impl Condition {
    pub fn shape(&self) -> EvidenceShape {
        match self {
            Condition::GreaterThan(_) => EvidenceShape::Sum,
            Condition::Exists => EvidenceShape::Presence,
        }
    }

    /// Applies the condition. `None` when the evidence has the wrong shape.
    pub fn holds(&self, evidence: Evidence) -> Option<bool> {
        match (self, evidence) {
            (Condition::GreaterThan(bound), Evidence::Sum(value)) => {
                Some(value.map_or(false, |v| v > *bound))
            }
            (Condition::Exists, Evidence::Presence(present)) => Some(present),
            _ => None,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::GreaterThan(bound) => write!(f, "sum > {}", bound),
            Condition::Exists => write!(f, "row exists"),
        }
    }
}

/// A rule instantiated for one data channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleCheck {
    pub query: EvidenceQuery,
    pub condition: Condition,
}

impl RuleId {
    pub const ALL: [RuleId; 11] = [
        RuleId::ThresholdOver10450,
        RuleId::ThresholdOver12000,
        RuleId::ThresholdOver5000,
        RuleId::TripPhaseAOver10,
        RuleId::UplinkSendOver20,
        RuleId::RealtimeErrorCheck,
        RuleId::MotorErrorCheck,
        RuleId::LimitCheck,
        RuleId::StatusCheck,
        RuleId::LargePumpCalibration,
        RuleId::SmallPumpCalibration,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RuleId::ThresholdOver10450 => "threshold_over_10450",
            RuleId::ThresholdOver12000 => "threshold_over_12000",
            RuleId::ThresholdOver5000 => "threshold_over_5000",
            RuleId::TripPhaseAOver10 => "trip_phase_a_over_10",
            RuleId::UplinkSendOver20 => "uplink_send_over_20",
            RuleId::RealtimeErrorCheck => "realtime_error_check",
            RuleId::MotorErrorCheck => "motor_error_check",
            RuleId::LimitCheck => "limit_check",
            RuleId::StatusCheck => "status_check",
            RuleId::LargePumpCalibration => "large_pump_calibration",
            RuleId::SmallPumpCalibration => "small_pump_calibration",
        }
    }

    pub fn condition(&self) -> Condition {
        match self {
            RuleId::ThresholdOver10450 => Condition::GreaterThan(10450),
            RuleId::ThresholdOver12000 => Condition::GreaterThan(12000),
            RuleId::ThresholdOver5000 => Condition::GreaterThan(5000),
            RuleId::TripPhaseAOver10 => Condition::GreaterThan(10),
            RuleId::UplinkSendOver20 => Condition::GreaterThan(20),
            RuleId::RealtimeErrorCheck | RuleId::MotorErrorCheck => Condition::GreaterThan(1),
            RuleId::LimitCheck => Condition::GreaterThan(0),
            RuleId::StatusCheck | RuleId::LargePumpCalibration | RuleId::SmallPumpCalibration => {
                Condition::Exists
            }
        }
    }

    /// Builds the query this rule issues for `channel`.
    ///
    /// Fixed-channel rules ignore `channel`.
    pub fn query(&self, channel: &str) -> EvidenceQuery {
        match self {
            RuleId::ThresholdOver10450 => EvidenceQuery::LimitCheckErrors {
                channel: CHANNEL_MC_DIGITAL_VOLTAGE.to_string(),
                sigma_band_only: true,
            },
            RuleId::ThresholdOver12000 => EvidenceQuery::LimitCheckErrors {
                channel: CHANNEL_MC_REFERENCE_VOLTAGE.to_string(),
                sigma_band_only: false,
            },
            RuleId::ThresholdOver5000 => EvidenceQuery::LimitCheckErrors {
                channel: CHANNEL_MC_INPUT_VOLTAGE.to_string(),
                sigma_band_only: true,
            },
            RuleId::TripPhaseAOver10 => EvidenceQuery::StatusWordErrors {
                channel: channel.to_string(),
                words: TRIP_PHASE_A_WORDS,
            },
            RuleId::UplinkSendOver20 => EvidenceQuery::StatusWordErrors {
                channel: channel.to_string(),
                words: UPLINK_SEND_WORDS,
            },
            RuleId::RealtimeErrorCheck => EvidenceQuery::StatusWordErrors {
                channel: CHANNEL_MC_REALTIME_ERROR.to_string(),
                words: EIP_MESSAGE_WORDS,
            },
            RuleId::MotorErrorCheck => EvidenceQuery::StatusWordErrors {
                channel: CHANNEL_MOTOR_ERROR_STATUS.to_string(),
                words: MOTOR_FAULT_WORDS,
            },
            RuleId::LimitCheck => EvidenceQuery::GenericLimitErrors {
                channel: channel.to_string(),
            },
            RuleId::StatusCheck => EvidenceQuery::StatusEventPresent {
                event_name: channel.to_string(),
            },
            RuleId::LargePumpCalibration => EvidenceQuery::PumpCalibrationFailed {
                pump: PumpSize::Large,
            },
            RuleId::SmallPumpCalibration => EvidenceQuery::PumpCalibrationFailed {
                pump: PumpSize::Small,
            },
        }
    }

    pub fn check(&self, channel: &str) -> RuleCheck {
        RuleCheck {
            query: self.query(channel),
            condition: self.condition(),
        }
    }

    /// Whether the rule queries the consumed data channel rather than a
    /// fixed one
    pub fn uses_channel(&self) -> bool {
        matches!(
            self,
            RuleId::TripPhaseAOver10
                | RuleId::UplinkSendOver20
                | RuleId::LimitCheck
                | RuleId::StatusCheck
        )
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_strictly_greater() {
        let c = RuleId::ThresholdOver10450.condition();
        assert_eq!(c.holds(Evidence::Sum(Some(10450))), Some(false));
        assert_eq!(c.holds(Evidence::Sum(Some(10451))), Some(true));
    }

    #[test]
    fn test_absent_sum_never_holds() {
        for rule in RuleId::ALL {
            if let Condition::GreaterThan(_) = rule.condition() {
                assert_eq!(rule.condition().holds(Evidence::Sum(None)), Some(false));
            }
        }
    }

    #[test]
    fn test_limit_check_zero_is_false() {
        let c = RuleId::LimitCheck.condition();
        assert_eq!(c.holds(Evidence::Sum(Some(0))), Some(false));
        assert_eq!(c.holds(Evidence::Sum(Some(1))), Some(true));
    }

    #[test]
    fn test_shape_mismatch_is_none() {
        assert_eq!(Condition::Exists.holds(Evidence::Sum(Some(5))), None);
        assert_eq!(Condition::GreaterThan(1).holds(Evidence::Presence(true)), None);
    }

    #[test]
    fn test_every_rule_query_matches_its_condition_shape() {
        for rule in RuleId::ALL {
            let check = rule.check("CHANNEL");
            assert_eq!(check.query.shape(), check.condition.shape(), "{}", rule);
        }
    }

    #[test]
    fn test_fixed_channel_rules_ignore_argument() {
        assert_eq!(
            RuleId::ThresholdOver10450.query("anything"),
            RuleId::ThresholdOver10450.query("else")
        );
        assert_ne!(
            RuleId::LimitCheck.query("LVPSDIG"),
            RuleId::LimitCheck.query("MCCOREVLT")
        );
        assert!(RuleId::StatusCheck.uses_channel());
        assert!(!RuleId::MotorErrorCheck.uses_channel());
    }

    #[test]
    fn test_rule_names_roundtrip_through_serde() {
        for rule in RuleId::ALL {
            let json = serde_json::to_string(&rule).unwrap();
            assert_eq!(json, format!("\"{}\"", rule.name()));
            let back: RuleId = serde_json::from_str(&json).unwrap();
            assert_eq!(back, rule);
        }
    }
}
