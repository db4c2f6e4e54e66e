use std::collections::HashSet;

use bastion_workflow::{Node, NodeConfig, NodeKind, Position, Workflow, WorkflowError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::registry::GuardrailRule;
use crate::selector::SelectedGuardrail;

/// Horizontal distance between a trigger and the guardrails protecting it.
pub const ENTRY_POINT_OFFSET_X: f64 = 250.0;

/// Vertical step between guardrails placed next to the same trigger.
pub const ENTRY_POINT_STEP_Y: f64 = 120.0;

/// Vertical step between guardrails stacked below the graph.
pub const STACK_STEP_Y: f64 = 150.0;

/// A guardrail node appended by the injector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectedGuardrail {
  pub rule_id: String,
  pub node_id: String,
}

/// Result of an injection pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Injection {
  /// The original nodes followed by the injected guardrail nodes.
  pub workflow: Workflow,
  pub injected: Vec<InjectedGuardrail>,
  /// Rules already guarded by an existing node, in selection order.
  pub skipped: Vec<String>,
}

/// Append one guardrail node per selected rule.
///
/// Existing nodes are never touched. A rule already referenced by a node's
/// `guardrail_rule` is skipped, so injecting twice is a no-op the second time.
pub fn inject_guardrails(
  selected: &[SelectedGuardrail<'_>],
  workflow: &Workflow,
  at: DateTime<Utc>,
) -> Result<Injection, WorkflowError> {
  let mut guarded: HashSet<&str> = workflow
    .nodes()
    .iter()
    .filter_map(|n| n.config.guardrail_rule.as_deref())
    .collect();

  let trigger = workflow.first_of_kind(&NodeKind::Trigger).map(|n| n.position);
  let bottom = workflow
    .lowest_node()
    .map(|n| n.position)
    .unwrap_or_default();

  let mut augmented = workflow.clone();
  let mut injected = Vec::new();
  let mut skipped = Vec::new();
  let mut entry_count = 0usize;
  let mut stack_count = 0usize;

  for selection in selected {
    let rule = selection.rule;
    if !guarded.insert(rule.id.as_str()) {
      skipped.push(rule.id.clone());
      continue;
    }

    let position = match trigger {
      Some(trigger) if rule.targets_entry_point() => {
        let position = Position::new(
          trigger.x + ENTRY_POINT_OFFSET_X,
          trigger.y + ENTRY_POINT_STEP_Y * entry_count as f64,
        );
        entry_count += 1;
        position
      }
      _ => {
        stack_count += 1;
        Position::new(bottom.x, bottom.y + STACK_STEP_Y * stack_count as f64)
      }
    };

    let node = guardrail_node(rule, position, at);
    injected.push(InjectedGuardrail {
      rule_id: rule.id.clone(),
      node_id: node.id.clone(),
    });
    augmented.push(node)?;
  }

  Ok(Injection {
    workflow: augmented,
    injected,
    skipped,
  })
}

fn guardrail_node(rule: &GuardrailRule, position: Position, at: DateTime<Utc>) -> Node {
  let mut settings = match &rule.config_template {
    Value::Object(map) => map.clone(),
    _ => Default::default(),
  };
  settings.insert(
    "severity".to_string(),
    Value::String(rule.severity.as_str().to_string()),
  );

  Node {
    id: format!(
      "{}-{}-{}",
      rule.id,
      at.timestamp_millis(),
      Uuid::new_v4().simple()
    ),
    kind: NodeKind::Guardrail,
    title: rule.name.clone(),
    description: rule.description.clone(),
    position,
    config: NodeConfig {
      guardrail_rule: Some(rule.id.clone()),
      settings,
      ..Default::default()
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::registry::GuardrailRegistry;
  use crate::standards::{ComplianceStandard, detect_standards};
  use bastion_config::{Capabilities, Capability};
  use std::collections::BTreeSet;

  fn node(id: &str, kind: NodeKind, title: &str, x: f64, y: f64) -> Node {
    Node {
      id: id.to_string(),
      kind,
      title: title.to_string(),
      description: String::new(),
      position: Position::new(x, y),
      config: NodeConfig::default(),
    }
  }

  fn workflow(nodes: Vec<Node>) -> Workflow {
    Workflow::from_nodes("test", nodes).unwrap()
  }

  fn select_all(workflow: &Workflow) -> Vec<SelectedGuardrail<'static>> {
    let required = detect_standards(workflow.nodes());
    GuardrailRegistry::builtin().select(&required, workflow.nodes(), Utc::now())
  }

  #[test]
  fn test_injection_is_additive() {
    let mut action = node("a1", NodeKind::Action, "Charge credit card", 0.0, 200.0);
    action.config.capabilities = Some(Capabilities::of(&[Capability::ExternalExecution]));
    action
      .config
      .settings
      .insert("timeoutMs".to_string(), 5000.into());
    let original = workflow(vec![
      node("t1", NodeKind::Trigger, "Stripe webhook", 0.0, 0.0),
      action,
    ]);

    let selected = select_all(&original);
    assert!(!selected.is_empty());

    let injection = inject_guardrails(&selected, &original, Utc::now()).unwrap();
    assert_eq!(
      injection.workflow.len(),
      original.len() + selected.len()
    );
    assert_eq!(
      &injection.workflow.nodes()[..original.len()],
      original.nodes()
    );
    for added in &injection.workflow.nodes()[original.len()..] {
      assert_eq!(added.kind, NodeKind::Guardrail);
      assert!(added.config.guardrail_rule.is_some());
    }
  }

  #[test]
  fn test_entry_point_guardrails_sit_next_to_trigger() {
    let original = workflow(vec![
      node("t1", NodeKind::Trigger, "Incoming webhook", 40.0, 80.0),
      node("a1", NodeKind::Action, "Update record", 40.0, 400.0),
    ]);
    let registry = GuardrailRegistry::builtin();
    let required = BTreeSet::from([ComplianceStandard::Soc2]);
    let selected = registry.select(&required, original.nodes(), Utc::now());

    let injection = inject_guardrails(&selected, &original, Utc::now()).unwrap();
    let webhook = injection
      .injected
      .iter()
      .find(|i| i.rule_id == "webhook-signature-validation")
      .unwrap();
    let rate = injection
      .injected
      .iter()
      .find(|i| i.rule_id == "rate-limiter")
      .unwrap();

    let webhook = injection.workflow.get_node(&webhook.node_id).unwrap();
    let rate = injection.workflow.get_node(&rate.node_id).unwrap();
    assert_eq!(webhook.position, Position::new(290.0, 80.0));
    assert_eq!(rate.position, Position::new(290.0, 200.0));
  }

  #[test]
  fn test_non_entry_guardrails_stack_below_lowest_node() {
    let original = workflow(vec![
      node("d1", NodeKind::Data, "Load patient chart", 10.0, 100.0),
      node("d2", NodeKind::Data, "Summarize diagnosis", 30.0, 500.0),
    ]);
    let selected = select_all(&original);
    let injection = inject_guardrails(&selected, &original, Utc::now()).unwrap();

    for (i, added) in injection.workflow.nodes()[2..].iter().enumerate() {
      assert_eq!(added.position.x, 30.0);
      assert_eq!(added.position.y, 500.0 + STACK_STEP_Y * (i + 1) as f64);
    }
  }

  #[test]
  fn test_entry_rule_without_trigger_is_stacked() {
    let original = workflow(vec![node("a1", NodeKind::Action, "Call partner api", 0.0, 50.0)]);
    let required = BTreeSet::from([ComplianceStandard::Soc2]);
    let selected = GuardrailRegistry::builtin().select(&required, original.nodes(), Utc::now());
    assert!(selected.iter().any(|s| s.rule.id == "rate-limiter"));

    let injection = inject_guardrails(&selected, &original, Utc::now()).unwrap();
    let added = &injection.workflow.nodes()[1];
    assert_eq!(added.position, Position::new(0.0, 50.0 + STACK_STEP_Y));
  }

  #[test]
  fn test_second_run_skips_existing_guardrails() {
    let original = workflow(vec![node("d1", NodeKind::Data, "Patient diagnosis", 0.0, 0.0)]);
    let selected = select_all(&original);
    let first = inject_guardrails(&selected, &original, Utc::now()).unwrap();

    let reselected = select_all(&first.workflow);
    assert_eq!(reselected.len(), selected.len());

    let second = inject_guardrails(&reselected, &first.workflow, Utc::now()).unwrap();
    assert!(second.injected.is_empty());
    assert_eq!(second.skipped.len(), selected.len());
    assert_eq!(second.workflow, first.workflow);
  }

  #[test]
  fn test_guardrail_node_carries_template() {
    let original = workflow(vec![node("a1", NodeKind::Action, "Refund payment", 0.0, 0.0)]);
    let required = BTreeSet::from([ComplianceStandard::PciDss]);
    let selected = GuardrailRegistry::builtin().select(&required, original.nodes(), Utc::now());
    let injection = inject_guardrails(&selected, &original, Utc::now()).unwrap();

    let tokenization = injection
      .workflow
      .nodes()
      .iter()
      .find(|n| n.config.guardrail_rule.as_deref() == Some("card-data-tokenization"))
      .unwrap();
    assert_eq!(tokenization.title, "Card Data Tokenization");
    assert_eq!(tokenization.config.setting_str("tokenizer"), Some("processor"));
    assert_eq!(tokenization.config.setting_str("severity"), Some("critical"));
    assert!(tokenization.id.starts_with("card-data-tokenization-"));
  }

  #[test]
  fn test_generated_ids_do_not_collide() {
    let original = workflow(vec![node("a1", NodeKind::Action, "Process payment", 0.0, 0.0)]);
    let required = BTreeSet::from([ComplianceStandard::PciDss]);
    let selected = GuardrailRegistry::builtin().select(&required, original.nodes(), Utc::now());
    let at = Utc::now();

    let mut seen = HashSet::new();
    for _ in 0..10_000 {
      let injection = inject_guardrails(&selected, &original, at).unwrap();
      for added in injection.injected {
        assert!(seen.insert(added.node_id));
      }
    }
  }
}
