use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::registry::{GuardrailRule, Severity};
use crate::standards::ComplianceStandard;

/// Risk contributed by a required standard with no mitigating guardrail.
pub const STANDARD_RISK_WEIGHT: u32 = 25;

/// Risk removed from a standard by each applied critical guardrail covering it.
pub const CRITICAL_MITIGATION: u32 = 15;

/// Risk removed from a standard by each applied high guardrail covering it.
pub const HIGH_MITIGATION: u32 = 10;

const MAX_SCORE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
  Low,
  Medium,
  High,
  Critical,
}

impl RiskLevel {
  fn from_score(score: u8) -> Self {
    match score {
      0..25 => RiskLevel::Low,
      25..50 => RiskLevel::Medium,
      50..75 => RiskLevel::High,
      _ => RiskLevel::Critical,
    }
  }
}

/// Residual risk for one required standard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardRisk {
  pub standard: ComplianceStandard,
  pub residual: u32,
  /// Ids of applied high/critical guardrails covering the standard.
  pub mitigated_by: Vec<String>,
}

/// Composite 0-100 risk score; higher is riskier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
  pub score: u8,
  pub level: RiskLevel,
  pub standards: Vec<StandardRisk>,
}

/// Reduce applied guardrails and required standards to a bounded risk score.
pub fn score_risk<'a>(
  applied: impl IntoIterator<Item = &'a GuardrailRule>,
  required: &BTreeSet<ComplianceStandard>,
) -> RiskAssessment {
  let applied: Vec<&GuardrailRule> = applied.into_iter().collect();

  let standards: Vec<StandardRisk> = required
    .iter()
    .map(|&standard| {
      let mut mitigation = 0u32;
      let mut mitigated_by = Vec::new();
      for rule in applied.iter().filter(|r| r.covers(standard)) {
        let amount = match rule.severity {
          Severity::Critical => CRITICAL_MITIGATION,
          Severity::High => HIGH_MITIGATION,
          Severity::Medium | Severity::Low => continue,
        };
        mitigation += amount;
        mitigated_by.push(rule.id.clone());
      }

      StandardRisk {
        standard,
        residual: STANDARD_RISK_WEIGHT.saturating_sub(mitigation),
        mitigated_by,
      }
    })
    .collect();

  let total: u32 = standards.iter().map(|s| s.residual).sum();
  let score = total.min(MAX_SCORE) as u8;

  RiskAssessment {
    score,
    level: RiskLevel::from_score(score),
    standards,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::registry::GuardrailRegistry;

  fn rule(id: &str) -> &'static GuardrailRule {
    GuardrailRegistry::builtin().get(id).unwrap()
  }

  #[test]
  fn test_no_standards_no_risk() {
    let assessment = score_risk(GuardrailRegistry::builtin().rules(), &BTreeSet::new());
    assert_eq!(assessment.score, 0);
    assert_eq!(assessment.level, RiskLevel::Low);
  }

  #[test]
  fn test_unaddressed_standards_add_risk() {
    let none: [&GuardrailRule; 0] = [];
    let one = score_risk(none, &BTreeSet::from([ComplianceStandard::Hipaa]));
    let all = score_risk(none, &BTreeSet::from(ComplianceStandard::ALL));

    assert_eq!(one.score, 25);
    assert_eq!(all.score, 100);
    assert_eq!(all.level, RiskLevel::Critical);
  }

  #[test]
  fn test_high_and_critical_guardrails_mitigate() {
    let required = BTreeSet::from([ComplianceStandard::Hipaa]);

    let critical = score_risk([rule("phi-access-control")], &required);
    assert_eq!(critical.score, 10);

    let both = score_risk(
      [rule("phi-access-control"), rule("phi-audit-trail")],
      &required,
    );
    assert_eq!(both.score, 0);
    assert_eq!(
      both.standards[0].mitigated_by,
      vec!["phi-access-control", "phi-audit-trail"]
    );
  }

  #[test]
  fn test_medium_guardrails_do_not_mitigate() {
    let required = BTreeSet::from([ComplianceStandard::Soc2]);
    let assessment = score_risk([rule("rate-limiter")], &required);
    assert_eq!(assessment.score, 25);
    assert!(assessment.standards[0].mitigated_by.is_empty());
  }

  #[test]
  fn test_score_is_bounded() {
    let required = BTreeSet::from(ComplianceStandard::ALL);
    for count in 0..=GuardrailRegistry::builtin().rules().len() {
      let applied = &GuardrailRegistry::builtin().rules()[..count];
      let assessment = score_risk(applied, &required);
      assert!(assessment.score <= 100);
    }
  }
}
