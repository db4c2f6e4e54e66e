use std::collections::BTreeSet;

use bastion_guardrails::{ComplianceStandard, GuardrailExplanation, InjectedGuardrail, RiskAssessment};
use bastion_roles::{RoleAssignment, RoleContractBlock, RoleViolation};
use bastion_workflow::Workflow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role assignments and the violations found against them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleReport {
  pub assignments: Vec<RoleAssignment>,
  pub violations: Vec<RoleViolation>,
}

impl RoleReport {
  /// Block for embedding in exported artifacts.
  pub fn contract_block(&self) -> RoleContractBlock<'_> {
    RoleContractBlock::new(&self.assignments, &self.violations)
  }

  pub fn has_blocking_violations(&self) -> bool {
    self.violations.iter().any(|v| v.blocked)
  }
}

/// Output of a full policy analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
  pub analysis_id: String,
  pub timestamp: DateTime<Utc>,
  pub required_standards: BTreeSet<ComplianceStandard>,
  pub explanations: Vec<GuardrailExplanation>,
  /// Input graph with guardrail nodes appended.
  pub workflow: Workflow,
  pub injected: Vec<InjectedGuardrail>,
  pub skipped: Vec<String>,
  pub roles: RoleReport,
  pub risk: RiskAssessment,
}

impl AnalysisReport {
  pub fn workflow_name(&self) -> &str {
    &self.workflow.name
  }
}
