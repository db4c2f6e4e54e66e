use bastion_engine::PolicyEngine;
use bastion_guardrails::detect_standards;
use bastion_workflow::{Node, NodeConfig, NodeKind, Position, Workflow};
use chrono::{TimeZone, Utc};
use proptest::prelude::*;

const VOCABULARY: &[&str] = &[
  "patient diagnosis",
  "credit card payment",
  "customer email",
  "incoming webhook",
  "api key rotation",
  "nightly report",
  "resize image",
  "newsletter signup",
  "upload form",
  "summarize with gpt",
];

fn arb_kind() -> impl Strategy<Value = NodeKind> {
  prop_oneof![
    Just(NodeKind::Trigger),
    Just(NodeKind::Action),
    Just(NodeKind::Condition),
    Just(NodeKind::Data),
    Just(NodeKind::Ai),
    Just(NodeKind::Connector),
    Just(NodeKind::Notification),
    Just(NodeKind::Checkpoint),
  ]
}

fn arb_workflow() -> impl Strategy<Value = Workflow> {
  prop::collection::vec(
    (arb_kind(), prop::sample::select(VOCABULARY), 0.0..1000.0f64),
    0..12,
  )
  .prop_map(|specs| {
    let nodes = specs.into_iter().enumerate().map(|(i, (kind, title, y))| Node {
      id: format!("n{i}"),
      kind,
      title: title.to_string(),
      description: String::new(),
      position: Position::new(0.0, y),
      config: NodeConfig::default(),
    });
    Workflow::from_nodes("generated", nodes).unwrap()
  })
}

proptest! {
  #[test]
  fn analysis_only_appends_guardrails(workflow in arb_workflow()) {
    let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let report = PolicyEngine::default().analyze_at(&workflow, at).unwrap();

    prop_assert_eq!(&report.workflow.nodes()[..workflow.len()], workflow.nodes());
    prop_assert!(
      report.workflow.nodes()[workflow.len()..]
        .iter()
        .all(|n| n.kind == NodeKind::Guardrail)
    );
    prop_assert_eq!(detect_standards(report.workflow.nodes()), report.required_standards.clone());
    prop_assert!(report.risk.score <= 100);
  }

  #[test]
  fn reanalysis_is_stable(workflow in arb_workflow()) {
    let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let engine = PolicyEngine::default();
    let first = engine.analyze_at(&workflow, at).unwrap();
    let second = engine.analyze_at(&first.workflow, at).unwrap();

    prop_assert!(second.injected.is_empty());
    prop_assert_eq!(&second.workflow, &first.workflow);
    prop_assert_eq!(second.risk, first.risk);
  }
}
