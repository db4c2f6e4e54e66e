use std::collections::BTreeSet;

use bastion_workflow::Node;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::registry::{GuardrailRegistry, GuardrailRule, Severity, tags_in};
use crate::standards::ComplianceStandard;

/// Why a guardrail rule fired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardrailExplanation {
  pub guardrail_id: String,
  pub rule_name: String,
  pub reason: String,
  pub triggered_by: Vec<String>,
  pub standards: Vec<ComplianceStandard>,
  pub severity: Severity,
  /// First node whose text matched one of the triggering tags.
  pub node_id: Option<String>,
  pub timestamp: DateTime<Utc>,
}

/// A rule chosen for injection together with its explanation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedGuardrail<'r> {
  pub rule: &'r GuardrailRule,
  pub explanation: GuardrailExplanation,
}

impl GuardrailRegistry {
  /// Choose the rules that apply to `nodes` under the `required` standards.
  ///
  /// A rule applies when its standards intersect `required` and fires when any
  /// of its context tags appears in the combined text of the non-guardrail
  /// nodes. Each rule fires at most once; output follows registry order.
  pub fn select(
    &self,
    required: &BTreeSet<ComplianceStandard>,
    nodes: &[Node],
    at: DateTime<Utc>,
  ) -> Vec<SelectedGuardrail<'_>> {
    if required.is_empty() {
      return Vec::new();
    }

    let texts: Vec<(&str, String)> = nodes
      .iter()
      .filter(|n| !n.is_guardrail())
      .map(|n| (n.id.as_str(), n.text()))
      .collect();
    let corpus = texts
      .iter()
      .map(|(_, text)| text.as_str())
      .collect::<Vec<_>>()
      .join("\n");

    let mut selected = Vec::new();
    for (rule, matcher) in self.entries() {
      let satisfied: Vec<ComplianceStandard> = rule
        .standards
        .iter()
        .copied()
        .filter(|s| required.contains(s))
        .collect();
      if satisfied.is_empty() {
        continue;
      }

      let tags = tags_in(rule, matcher, &corpus);
      if tags.is_empty() {
        continue;
      }

      let node_id = texts
        .iter()
        .find(|(_, text)| matcher.is_match(text))
        .map(|(id, _)| id.to_string());

      selected.push(SelectedGuardrail {
        rule,
        explanation: GuardrailExplanation {
          guardrail_id: rule.id.clone(),
          rule_name: rule.name.clone(),
          reason: explain(rule, &tags, &satisfied),
          triggered_by: tags.iter().map(|t| t.to_string()).collect(),
          standards: satisfied,
          severity: rule.severity,
          node_id,
          timestamp: at,
        },
      });
    }

    selected
  }
}

fn explain(rule: &GuardrailRule, tags: &[&str], standards: &[ComplianceStandard]) -> String {
  let tags = tags
    .iter()
    .map(|t| format!("'{t}'"))
    .collect::<Vec<_>>()
    .join(", ");
  let standards = standards
    .iter()
    .map(ComplianceStandard::as_str)
    .collect::<Vec<_>>()
    .join(", ");

  format!(
    "{} added: workflow mentions {} and {} requires it. {}",
    rule.name, tags, standards, rule.action
  )
}
