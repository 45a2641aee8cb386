//! Configuration file
//!
//! ```json
//! {
//!   "graph_path": "graph.json",
//!   "telemetry_path": "telemetry.json",
//!   "max_depth": -1,
//!   "log_level": "info",
//!   "standard_rules": true,
//!   "rules": {"FNFM Custom Voltage": "limit_check"}
//! }
//! ```
//!
//! Relative paths are resolved against the directory holding the file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::observability::Severity;
use crate::rules::{RuleId, RuleRegistry};
use crate::traversal::MaxDepth;

use super::errors::{CliError, CliResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Knowledge graph document (required)
    pub graph_path: PathBuf,

    /// Telemetry snapshot (required)
    pub telemetry_path: PathBuf,

    /// Default traversal depth, -1 for unbounded
    #[serde(default = "default_max_depth")]
    pub max_depth: i64,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Start from the production trigger mapping
    #[serde(default = "default_standard_rules")]
    pub standard_rules: bool,

    /// Additional or overriding trigger label -> rule entries
    #[serde(default)]
    pub rules: BTreeMap<String, RuleId>,
}

fn default_max_depth() -> i64 {
    -1
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_standard_rules() -> bool {
    true
}

impl Config {
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        if let Some(base) = path.parent() {
            config.graph_path = resolve(base, &config.graph_path);
            config.telemetry_path = resolve(base, &config.telemetry_path);
        }
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.graph_path.as_os_str().is_empty() {
            return Err(CliError::config_error("graph_path must not be empty"));
        }
        if self.telemetry_path.as_os_str().is_empty() {
            return Err(CliError::config_error("telemetry_path must not be empty"));
        }
        MaxDepth::from_signed(self.max_depth)
            .map_err(|e| CliError::config_error(format!("Invalid max_depth: {}", e)))?;
        if Severity::parse(&self.log_level).is_none() {
            return Err(CliError::config_error(format!(
                "Invalid log_level: '{}'. Use trace, info, warn, error or fatal.",
                self.log_level
            )));
        }
        if self.rules.keys().any(|label| label.trim().is_empty()) {
            return Err(CliError::config_error("Rule labels must not be empty"));
        }
        Ok(())
    }

    pub fn severity(&self) -> Severity {
        Severity::parse(&self.log_level).unwrap_or(Severity::Info)
    }

    /// Configured depth, or `override_depth` when given
    pub fn max_depth(&self, override_depth: Option<i64>) -> CliResult<MaxDepth> {
        let depth = override_depth.unwrap_or(self.max_depth);
        MaxDepth::from_signed(depth).map_err(CliError::from)
    }

    pub fn registry(&self) -> RuleRegistry {
        let mut registry = if self.standard_rules {
            RuleRegistry::standard()
        } else {
            RuleRegistry::empty()
        };
        for (label, rule) in &self.rules {
            registry.register(label.clone(), *rule);
        }
        registry
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::errors::CliErrorCode;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &TempDir, value: serde_json::Value) -> PathBuf {
        let path = dir.path().join("faultgraph.json");
        fs::write(&path, value.to_string()).unwrap();
        path
    }

    #[test]
    fn test_defaults_and_relative_paths() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            json!({"graph_path": "graph.json", "telemetry_path": "/data/telemetry.json"}),
        );
        let config = Config::load(&path).unwrap();
        assert_eq!(config.graph_path, dir.path().join("graph.json"));
        assert_eq!(config.telemetry_path, PathBuf::from("/data/telemetry.json"));
        assert_eq!(config.max_depth(None).unwrap(), MaxDepth::Unbounded);
        assert_eq!(config.severity(), Severity::Info);
        assert_eq!(config.registry().len(), 18);
    }

    #[test]
    fn test_rule_overrides() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            json!({
                "graph_path": "g.json",
                "telemetry_path": "t.json",
                "standard_rules": false,
                "rules": {"VoltageDrop": "threshold_over_10450"}
            }),
        );
        let registry = Config::load(&path).unwrap().registry();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("VoltageDrop"), Some(RuleId::ThresholdOver10450));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = TempDir::new().unwrap();
        for bad in [
            json!({"graph_path": "g", "telemetry_path": "t", "max_depth": -2}),
            json!({"graph_path": "g", "telemetry_path": "t", "log_level": "loud"}),
            json!({"graph_path": "g", "telemetry_path": "t", "rules": {"X": "no_such_rule"}}),
            json!({"graph_path": "", "telemetry_path": "t"}),
            json!({"telemetry_path": "t"}),
        ] {
            let path = write(&dir, bad);
            let err = Config::load(&path).unwrap_err();
            assert_eq!(err.code(), &CliErrorCode::ConfigError);
        }
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Path::new("/nonexistent/faultgraph.json")).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_depth_override() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, json!({"graph_path": "g", "telemetry_path": "t", "max_depth": 3}));
        let config = Config::load(&path).unwrap();
        assert_eq!(config.max_depth(None).unwrap(), MaxDepth::Limited(3));
        assert_eq!(config.max_depth(Some(-1)).unwrap(), MaxDepth::Unbounded);
        assert!(config.max_depth(Some(-7)).is_err());
    }
}
