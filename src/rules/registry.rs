//! Trigger label to rule mapping

use std::collections::BTreeMap;

use super::catalogue::RuleId;

/// Trigger labels of the production ontology and the rule verifying each
const STANDARD_ENTRIES: [(&str, RuleId); 18] = [
    ("FNFM Uplink telemetry check", RuleId::StatusCheck),
    ("FNFM LIN device check", RuleId::StatusCheck),
    ("FNFM CAN device check", RuleId::StatusCheck),
    ("FNFM Motor Error Status", RuleId::MotorErrorCheck),
    ("FNFM Solenoid PHM HALL Voltage", RuleId::LimitCheck),
    ("FNFM Solenoid PHM Digital Voltage", RuleId::LimitCheck),
    ("FNFM Solenoid PHM LIN Voltage ADC", RuleId::LimitCheck),
    ("FNFM Master Controller Reference Voltage", RuleId::LimitCheck),
    ("FNFM Master Controller Digital Voltage", RuleId::LimitCheck),
    ("FNFM Master Controller Input Voltage", RuleId::LimitCheck),
    ("FNFM Master Controller Core Voltage", RuleId::LimitCheck),
    ("FNFM Master Controller EIP Core Voltage", RuleId::LimitCheck),
    ("FNFM Master Controller EIP Digital Voltage", RuleId::LimitCheck),
    ("FNFM LVPS Digital Voltage", RuleId::LimitCheck),
    ("FNFM LVPS Positive Analog Voltage", RuleId::LimitCheck),
    ("FNFM LVPS Negative Analog Voltage", RuleId::LimitCheck),
    ("FNFM Small pump calibration check", RuleId::SmallPumpCalibration),
    ("FNFM Large pump calibration check", RuleId::LargePumpCalibration),
];

/// Explicit, enumerable mapping from trigger label to rule.
///
/// Labels are exact-match keys. Entries enumerate in label order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleRegistry {
    entries: BTreeMap<String, RuleId>,
}

impl RuleRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with the production trigger labels
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        for (label, rule) in STANDARD_ENTRIES {
            registry.register(label, rule);
        }
        registry
    }

    /// Maps `label` to `rule`, returning the rule it replaced
    pub fn register(&mut self, label: impl Into<String>, rule: RuleId) -> Option<RuleId> {
        self.entries.insert(label.into(), rule)
    }

    pub fn lookup(&self, label: &str) -> Option<RuleId> {
        self.entries.get(label).copied()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, RuleId)> {
        self.entries.iter().map(|(label, rule)| (label.as_str(), *rule))
    }

    /// Labels verified by `rule`
    pub fn labels_for(&self, rule: RuleId) -> Vec<&str> {
        self.entries()
            .filter(|(_, r)| *r == rule)
            .map(|(label, _)| label)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
