use std::time::Instant;

use bastion_config::ScanSettings;
use bastion_workflow::{Node, Workflow};
use chrono::Utc;
use uuid::Uuid;

use crate::finding::ScanFinding;
use crate::result::{CategoryScores, OptimizationPotential, ScanResult};
use crate::rule::ScanRule;
use crate::rules::builtin_rules;

/// Runs a rule set over workflows and scores the result.
pub struct WorkflowScanner {
  settings: ScanSettings,
  rules: Vec<Box<dyn ScanRule>>,
}

impl Default for WorkflowScanner {
  fn default() -> Self {
    Self::new(ScanSettings::default())
  }
}

impl WorkflowScanner {
  /// Scanner with the built-in rules.
  pub fn new(settings: ScanSettings) -> Self {
    let rules = builtin_rules(&settings);
    Self { settings, rules }
  }

  /// Scanner with a caller-supplied rule set.
  pub fn with_rules(settings: ScanSettings, rules: Vec<Box<dyn ScanRule>>) -> Self {
    Self { settings, rules }
  }

  pub fn settings(&self) -> &ScanSettings {
    &self.settings
  }

  pub fn rules(&self) -> &[Box<dyn ScanRule>] {
    &self.rules
  }

  /// Findings in rule order. Pure.
  pub fn findings(&self, nodes: &[Node]) -> Vec<ScanFinding> {
    self.rules.iter().filter_map(|r| r.evaluate(nodes)).collect()
  }

  pub fn scan(&self, workflow: &Workflow) -> ScanResult {
    self.scan_nodes(&workflow.name, workflow.nodes())
  }

  pub fn scan_nodes(&self, workflow_name: &str, nodes: &[Node]) -> ScanResult {
    let started = Instant::now();

    let findings = self.findings(nodes);
    let category_scores = CategoryScores::from_findings(&findings);
    let optimization_potential =
      OptimizationPotential::estimate(&findings, nodes.len(), &self.settings);

    ScanResult {
      scan_id: format!("scan-{}", Uuid::new_v4().simple()),
      timestamp: Utc::now(),
      workflow_name: workflow_name.to_string(),
      overall_score: category_scores.overall(),
      category_scores,
      findings,
      optimization_potential,
      scan_duration_ms: started.elapsed().as_millis() as u64,
    }
  }
}
