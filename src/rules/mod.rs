//! Rule registry and evaluator
//!
//! Trigger labels map to a closed set of rules; each rule is a fixed
//! evidence query and a fixed condition. Evaluation is sequential, one
//! query per (trigger, data channel) candidate.

mod catalogue;
mod errors;
mod evaluator;
mod registry;

pub use catalogue::{
    Condition, RuleCheck, RuleId, CHANNEL_MC_DIGITAL_VOLTAGE, CHANNEL_MC_INPUT_VOLTAGE,
    CHANNEL_MC_REALTIME_ERROR, CHANNEL_MC_REFERENCE_VOLTAGE, CHANNEL_MOTOR_ERROR_STATUS,
    EIP_MESSAGE_WORDS, MOTOR_FAULT_WORDS, TRIP_PHASE_A_WORDS, UPLINK_SEND_WORDS,
};
pub use errors::{EvaluationError, EvaluationResult};
pub use evaluator::{trigger_candidates, EvaluationOutcome, Evaluator, Status};
pub use registry::RuleRegistry;
