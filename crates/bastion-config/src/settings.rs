//! Engine settings.
//!
//! The workflow scanner turns summed finding impacts into an optimization
//! estimate using a handful of assumptions. Their defaults are the named
//! constants below; deployments can override them through a settings file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Executions per month assumed when annualizing per-execution cost savings.
pub const DEFAULT_ASSUMED_MONTHLY_EXECUTIONS: u64 = 10_000;

/// Average wall time of a single node, used as the denominator for time reduction.
pub const DEFAULT_BASELINE_NODE_TIME_MS: u64 = 500;

/// Node count above which a workflow is flagged as oversized.
pub const DEFAULT_MAX_RECOMMENDED_NODES: usize = 25;

/// Poll intervals shorter than this are flagged as aggressive.
pub const DEFAULT_MIN_POLL_INTERVAL_SECONDS: u64 = 60;

/// Model name prefixes billed at premium rates.
pub const DEFAULT_PREMIUM_MODELS: &[&str] = &[
  "gpt-4",
  "o1",
  "claude-3-opus",
  "claude-opus",
  "gemini-ultra",
];

/// Top-level engine settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSettings {
  #[serde(default)]
  pub scan: ScanSettings,
}

impl EngineSettings {
  pub fn from_json(input: &str) -> Result<Self, ConfigError> {
    Ok(serde_json::from_str(input)?)
  }

  /// Load settings from a JSON file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.display().to_string(),
      source,
    })?;
    Self::from_json(&content)
  }
}

/// Assumptions used by the workflow scanner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanSettings {
  pub assumed_monthly_executions: u64,
  pub baseline_node_time_ms: u64,
  pub max_recommended_nodes: usize,
  pub min_poll_interval_seconds: u64,
  pub premium_models: Vec<String>,
}

impl Default for ScanSettings {
  fn default() -> Self {
    Self {
      assumed_monthly_executions: DEFAULT_ASSUMED_MONTHLY_EXECUTIONS,
      baseline_node_time_ms: DEFAULT_BASELINE_NODE_TIME_MS,
      max_recommended_nodes: DEFAULT_MAX_RECOMMENDED_NODES,
      min_poll_interval_seconds: DEFAULT_MIN_POLL_INTERVAL_SECONDS,
      premium_models: DEFAULT_PREMIUM_MODELS
        .iter()
        .map(|m| m.to_string())
        .collect(),
    }
  }
}

impl ScanSettings {
  /// True if `model` starts with one of the configured premium prefixes.
  pub fn is_premium_model(&self, model: &str) -> bool {
    let model = model.to_lowercase();
    self
      .premium_models
      .iter()
      .any(|prefix| model.starts_with(&prefix.to_lowercase()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_partial_settings_keep_defaults() {
    let settings =
      EngineSettings::from_json(r#"{ "scan": { "assumedMonthlyExecutions": 500 } }"#).unwrap();

    assert_eq!(settings.scan.assumed_monthly_executions, 500);
    assert_eq!(
      settings.scan.baseline_node_time_ms,
      DEFAULT_BASELINE_NODE_TIME_MS
    );
    assert_eq!(settings.scan.premium_models.len(), DEFAULT_PREMIUM_MODELS.len());
  }

  #[test]
  fn test_empty_settings() {
    let settings = EngineSettings::from_json("{}").unwrap();
    assert_eq!(settings, EngineSettings::default());
  }

  #[test]
  fn test_premium_model_prefix() {
    let scan = ScanSettings::default();
    assert!(scan.is_premium_model("gpt-4o"));
    assert!(scan.is_premium_model("Claude-3-Opus-20240229"));
    assert!(!scan.is_premium_model("gpt-3.5-turbo"));
  }
}
