use std::collections::BTreeMap;

use bastion_config::ScanSettings;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::finding::{ScanCategory, ScanFinding, round_to};

const PERFECT_SCORE: u32 = 100;

/// Per-category scores, each in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScores {
  pub performance: u8,
  pub cost: u8,
  pub reliability: u8,
  pub security: u8,
  pub scalability: u8,
}

impl CategoryScores {
  /// 100 minus the severity penalties of each category's findings, floored at 0.
  pub fn from_findings(findings: &[ScanFinding]) -> Self {
    let score = |category: ScanCategory| -> u8 {
      let penalty: u32 = findings
        .iter()
        .filter(|f| f.category == category)
        .map(|f| f.severity.penalty())
        .sum();
      PERFECT_SCORE.saturating_sub(penalty) as u8
    };

    Self {
      performance: score(ScanCategory::Performance),
      cost: score(ScanCategory::Cost),
      reliability: score(ScanCategory::Reliability),
      security: score(ScanCategory::Security),
      scalability: score(ScanCategory::Scalability),
    }
  }

  pub fn get(&self, category: ScanCategory) -> u8 {
    match category {
      ScanCategory::Performance => self.performance,
      ScanCategory::Cost => self.cost,
      ScanCategory::Reliability => self.reliability,
      ScanCategory::Security => self.security,
      ScanCategory::Scalability => self.scalability,
    }
  }

  /// Rounded mean of the five category scores.
  pub fn overall(&self) -> u8 {
    let sum: u32 = ScanCategory::ALL
      .iter()
      .map(|c| u32::from(self.get(*c)))
      .sum();
    (f64::from(sum) / ScanCategory::ALL.len() as f64).round() as u8
  }
}

/// Estimated gains from fixing every finding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationPotential {
  pub annual_cost_savings_usd: f64,
  pub time_reduction_pct: f64,
  pub reliability_improvement_pct: f64,
}

impl OptimizationPotential {
  /// Annualize summed finding impacts under the settings' volume assumptions.
  pub fn estimate(findings: &[ScanFinding], node_count: usize, settings: &ScanSettings) -> Self {
    let cost_cents: f64 = findings
      .iter()
      .map(|f| f.impact.cost_cents_per_execution)
      .sum();
    let time_ms: u64 = findings.iter().map(|f| f.impact.time_ms).sum();
    let reliability: f64 = findings
      .iter()
      .map(|f| f.impact.reliability_delta_pct)
      .sum();

    let annual_executions = settings.assumed_monthly_executions as f64 * 12.0;
    let baseline_ms = node_count as f64 * settings.baseline_node_time_ms as f64;
    let time_reduction = if baseline_ms > 0.0 {
      (time_ms as f64 / baseline_ms * 100.0).min(100.0)
    } else {
      0.0
    };

    Self {
      annual_cost_savings_usd: round_to(cost_cents * annual_executions / 100.0, 2),
      time_reduction_pct: round_to(time_reduction, 1),
      reliability_improvement_pct: round_to(reliability.min(100.0), 1),
    }
  }
}

/// Immutable record of one scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
  pub scan_id: String,
  pub timestamp: DateTime<Utc>,
  pub workflow_name: String,
  pub overall_score: u8,
  pub category_scores: CategoryScores,
  pub findings: Vec<ScanFinding>,
  pub optimization_potential: OptimizationPotential,
  pub scan_duration_ms: u64,
}

/// Change between two scans of the same workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanTrend {
  pub previous_scan_id: String,
  pub overall_delta: i16,
  pub category_deltas: BTreeMap<ScanCategory, i16>,
  /// Rule ids reported now but not previously.
  pub new_findings: Vec<String>,
  /// Rule ids reported previously but not now.
  pub resolved_findings: Vec<String>,
}

impl ScanResult {
  /// Compare this scan against an earlier one.
  pub fn compare(&self, previous: &ScanResult) -> ScanTrend {
    let delta = |now: u8, before: u8| i16::from(now) - i16::from(before);

    let category_deltas = ScanCategory::ALL
      .into_iter()
      .map(|c| {
        (
          c,
          delta(self.category_scores.get(c), previous.category_scores.get(c)),
        )
      })
      .collect();

    let new_findings = self
      .findings
      .iter()
      .filter(|f| !previous.findings.iter().any(|p| p.id == f.id))
      .map(|f| f.id.clone())
      .collect();
    let resolved_findings = previous
      .findings
      .iter()
      .filter(|p| !self.findings.iter().any(|f| f.id == p.id))
      .map(|p| p.id.clone())
      .collect();

    ScanTrend {
      previous_scan_id: previous.scan_id.clone(),
      overall_delta: delta(self.overall_score, previous.overall_score),
      category_deltas,
      new_findings,
      resolved_findings,
    }
  }
}
