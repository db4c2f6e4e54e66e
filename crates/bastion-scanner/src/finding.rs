use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanCategory {
  Performance,
  Cost,
  Reliability,
  Security,
  Scalability,
}

impl ScanCategory {
  pub const ALL: [ScanCategory; 5] = [
    ScanCategory::Performance,
    ScanCategory::Cost,
    ScanCategory::Reliability,
    ScanCategory::Security,
    ScanCategory::Scalability,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      ScanCategory::Performance => "performance",
      ScanCategory::Cost => "cost",
      ScanCategory::Reliability => "reliability",
      ScanCategory::Security => "security",
      ScanCategory::Scalability => "scalability",
    }
  }
}

impl fmt::Display for ScanCategory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingSeverity {
  Info,
  Low,
  Medium,
  High,
  Critical,
}

impl FindingSeverity {
  /// Points deducted from the category score per finding.
  pub fn penalty(&self) -> u32 {
    match self {
      FindingSeverity::Critical => 30,
      FindingSeverity::High => 20,
      FindingSeverity::Medium => 10,
      FindingSeverity::Low => 5,
      FindingSeverity::Info => 2,
    }
  }
}

/// Decimal places kept on per-finding impact figures.
pub const IMPACT_DECIMALS: i32 = 4;

/// Estimated effect of fixing a finding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindingImpact {
  pub cost_cents_per_execution: f64,
  pub time_ms: u64,
  /// Percentage points of success rate gained.
  pub reliability_delta_pct: f64,
}

impl FindingImpact {
  /// Impact of `count` occurrences of a per-node impact, rounded to
  /// [`IMPACT_DECIMALS`] so that `0.05 * 3` reads `0.15`.
  pub fn per_node(count: usize, cost_cents: f64, time_ms: u64, reliability_pct: f64) -> Self {
    Self {
      cost_cents_per_execution: round_to(cost_cents * count as f64, IMPACT_DECIMALS),
      time_ms: time_ms * count as u64,
      reliability_delta_pct: round_to(reliability_pct * count as f64, IMPACT_DECIMALS),
    }
  }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
  let factor = 10f64.powi(decimals);
  (value * factor).round() / factor
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanFinding {
  /// Id of the rule that produced the finding.
  pub id: String,
  pub category: ScanCategory,
  pub severity: FindingSeverity,
  pub title: String,
  pub description: String,
  pub impact: FindingImpact,
  pub recommendation: String,
  pub affected_nodes: Vec<String>,
  pub auto_fixable: bool,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_per_node_impact_is_rounded() {
    let impact = FindingImpact::per_node(3, 0.05, 150, 0.1);
    assert_eq!(impact.cost_cents_per_execution, 0.15);
    assert_eq!(impact.time_ms, 450);
    assert_eq!(impact.reliability_delta_pct, 0.3);

    for count in 1..60 {
      let impact = FindingImpact::per_node(count, 0.05, 0, 0.0);
      let json = serde_json::to_string(&impact).unwrap();
      let back: FindingImpact = serde_json::from_str(&json).unwrap();
      assert_eq!(back, impact, "{json}");
    }
  }
}
