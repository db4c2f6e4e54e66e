//! Policy analysis pipeline.
//!
//! The `PolicyEngine` wires the analysis stages together. Every stage is pure;
//! the engine adds ids, timestamps, logging and event notification.

use std::collections::BTreeSet;

use bastion_config::{EngineSettings, WorkflowDef};
use bastion_guardrails::{
  GuardrailRegistry, GuardrailRule, detect_standards, inject_guardrails, score_risk,
};
use bastion_roles::{resolve_roles, validate_roles};
use bastion_scanner::{ScanResult, WorkflowScanner};
use bastion_workflow::{Node, Workflow};
use chrono::{DateTime, Utc};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::events::{AnalysisEvent, AnalysisNotifier, NoopNotifier};
use crate::report::{AnalysisReport, RoleReport};

/// Parse and validate a JSON workflow definition.
pub fn load_workflow(input: &str) -> Result<Workflow, EngineError> {
  let def = WorkflowDef::from_json(input)?;
  Ok(Workflow::from_def(def)?)
}

/// The policy engine.
///
/// Generic over `N: AnalysisNotifier` to allow different notification strategies.
/// Use `PolicyEngine::new()` for an engine that discards events, or
/// `PolicyEngine::with_notifier()` to observe them.
pub struct PolicyEngine<N: AnalysisNotifier = NoopNotifier> {
  registry: GuardrailRegistry,
  scanner: WorkflowScanner,
  notifier: N,
}

impl Default for PolicyEngine<NoopNotifier> {
  fn default() -> Self {
    Self::new(EngineSettings::default())
  }
}

impl PolicyEngine<NoopNotifier> {
  pub fn new(settings: EngineSettings) -> Self {
    Self::with_notifier(settings, NoopNotifier)
  }
}

impl<N: AnalysisNotifier> PolicyEngine<N> {
  pub fn with_notifier(settings: EngineSettings, notifier: N) -> Self {
    Self {
      registry: GuardrailRegistry::builtin().clone(),
      scanner: WorkflowScanner::new(settings.scan),
      notifier,
    }
  }

  /// Replace the built-in guardrail registry.
  pub fn with_registry(mut self, registry: GuardrailRegistry) -> Self {
    self.registry = registry;
    self
  }

  pub fn registry(&self) -> &GuardrailRegistry {
    &self.registry
  }

  pub fn scanner(&self) -> &WorkflowScanner {
    &self.scanner
  }

  /// Run the full pipeline on `workflow` as of now.
  pub fn analyze(&self, workflow: &Workflow) -> Result<AnalysisReport, EngineError> {
    self.analyze_at(workflow, Utc::now())
  }

  /// Run the full pipeline with an explicit timestamp.
  ///
  /// Everything except the analysis id and injected node ids is a function of
  /// `workflow` and `at`.
  #[instrument(skip_all, fields(workflow = %workflow.name, nodes = workflow.len()))]
  pub fn analyze_at(
    &self,
    workflow: &Workflow,
    at: DateTime<Utc>,
  ) -> Result<AnalysisReport, EngineError> {
    let analysis_id = Uuid::new_v4().to_string();
    self.notifier.notify(AnalysisEvent::AnalysisStarted {
      analysis_id: analysis_id.clone(),
      workflow_name: workflow.name.clone(),
      node_count: workflow.len(),
    });

    match self.run_pipeline(&analysis_id, workflow, at) {
      Ok(report) => {
        info!(
          analysis_id = %analysis_id,
          risk_score = report.risk.score,
          injected = report.injected.len(),
          violations = report.roles.violations.len(),
          "analysis completed"
        );
        self.notifier.notify(AnalysisEvent::AnalysisCompleted {
          analysis_id,
          risk_score: report.risk.score,
          risk_level: report.risk.level,
        });
        Ok(report)
      }
      Err(e) => {
        let message = e.full_message();
        error!(analysis_id = %analysis_id, error = %message, "analysis failed");
        self.notifier.notify(AnalysisEvent::AnalysisFailed {
          analysis_id,
          error: message,
        });
        Err(e)
      }
    }
  }

  fn run_pipeline(
    &self,
    analysis_id: &str,
    workflow: &Workflow,
    at: DateTime<Utc>,
  ) -> Result<AnalysisReport, EngineError> {
    let required = detect_standards(workflow.nodes());
    info!(standards = ?required, "detected compliance standards");
    self.notifier.notify(AnalysisEvent::StandardsDetected {
      analysis_id: analysis_id.to_string(),
      standards: required.iter().copied().collect(),
    });

    let selected = self.registry.select(&required, workflow.nodes(), at);
    for selection in &selected {
      debug!(
        rule = %selection.rule.id,
        node_id = ?selection.explanation.node_id,
        triggered_by = ?selection.explanation.triggered_by,
        "guardrail rule fired"
      );
    }

    let injection = inject_guardrails(&selected, workflow, at)?;
    info!(
      injected = injection.injected.len(),
      skipped = injection.skipped.len(),
      "injected guardrails"
    );
    for guardrail in &injection.injected {
      self.notifier.notify(AnalysisEvent::GuardrailInjected {
        analysis_id: analysis_id.to_string(),
        rule_id: guardrail.rule_id.clone(),
        node_id: guardrail.node_id.clone(),
      });
    }

    let roles = self.check_roles(analysis_id, injection.workflow.nodes(), at)?;

    let applied = applied_guardrails(&self.registry, injection.workflow.nodes());
    let risk = score_risk(applied, &required);
    info!(score = risk.score, level = ?risk.level, "assessed residual risk");

    Ok(AnalysisReport {
      analysis_id: analysis_id.to_string(),
      timestamp: at,
      required_standards: required,
      explanations: selected.into_iter().map(|s| s.explanation).collect(),
      workflow: injection.workflow,
      injected: injection.injected,
      skipped: injection.skipped,
      roles,
      risk,
    })
  }

  /// Resolve and validate roles without guardrail injection.
  #[instrument(skip_all, fields(workflow = %workflow.name))]
  pub fn roles(&self, workflow: &Workflow) -> Result<RoleReport, EngineError> {
    let check_id = Uuid::new_v4().to_string();
    self.check_roles(&check_id, workflow.nodes(), Utc::now())
  }

  fn check_roles(
    &self,
    analysis_id: &str,
    nodes: &[Node],
    at: DateTime<Utc>,
  ) -> Result<RoleReport, EngineError> {
    let assignments = resolve_roles(nodes);
    let violations = validate_roles(nodes, &assignments, at)?;

    for violation in violations.iter().filter(|v| v.blocked) {
      warn!(
        node_id = %violation.node_id,
        role = %violation.role,
        permission = %violation.violated_permission,
        "blocking role violation"
      );
      self.notifier.notify(AnalysisEvent::ViolationDetected {
        analysis_id: analysis_id.to_string(),
        node_id: violation.node_id.clone(),
        role: violation.role,
        permission: violation.violated_permission,
      });
    }
    info!(
      assignments = assignments.len(),
      violations = violations.len(),
      "validated role contracts"
    );

    Ok(RoleReport {
      assignments,
      violations,
    })
  }

  /// Scan `workflow` for performance, cost, reliability, security and
  /// scalability issues.
  #[instrument(skip_all, fields(workflow = %workflow.name, nodes = workflow.len()))]
  pub fn scan(&self, workflow: &Workflow) -> ScanResult {
    let result = self.scanner.scan(workflow);
    info!(
      scan_id = %result.scan_id,
      overall_score = result.overall_score,
      findings = result.findings.len(),
      "scan completed"
    );
    result
  }
}

/// Registry rules referenced by guardrail nodes in `nodes`, once each.
fn applied_guardrails<'r>(registry: &'r GuardrailRegistry, nodes: &[Node]) -> Vec<&'r GuardrailRule> {
  let mut seen = BTreeSet::new();
  nodes
    .iter()
    .filter(|n| n.is_guardrail())
    .filter_map(|n| n.config.guardrail_rule.as_deref())
    .filter(|id| seen.insert(*id))
    .filter_map(|id| registry.get(id))
    .collect()
}
