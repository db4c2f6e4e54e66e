use std::collections::HashMap;

use bastion_workflow::{Capability, Node, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::contract::{Permission, contract_for};
use crate::error::RoleError;
use crate::resolver::RoleAssignment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
  Error,
  Critical,
}

impl ViolationSeverity {
  fn for_capability(capability: Capability) -> Self {
    match capability {
      Capability::WriteAccess => ViolationSeverity::Error,
      Capability::ExternalExecution | Capability::SecretAccess => ViolationSeverity::Critical,
    }
  }
}

/// A node requesting a capability its role does not grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleViolation {
  pub node_id: String,
  pub role: Role,
  pub attempted_action: Capability,
  pub violated_permission: Permission,
  pub severity: ViolationSeverity,
  pub message: String,
  pub timestamp: DateTime<Utc>,
  pub blocked: bool,
}

/// Check every node's requested capabilities against its assigned role.
///
/// The pass always covers all nodes. It fails only when a node has no
/// assignment, in which case no violations are returned at all.
pub fn validate_roles(
  nodes: &[Node],
  assignments: &[RoleAssignment],
  at: DateTime<Utc>,
) -> Result<Vec<RoleViolation>, RoleError> {
  let roles: HashMap<&str, Role> = assignments
    .iter()
    .map(|a| (a.node_id.as_str(), a.assigned_role))
    .collect();

  let mut violations = Vec::new();
  for node in nodes {
    let role = *roles
      .get(node.id.as_str())
      .ok_or_else(|| RoleError::MissingAssignment {
        node_id: node.id.clone(),
      })?;
    let permissions = &contract_for(role).permissions;

    for capability in node.config.requested_capabilities() {
      let permission = Permission::required_for(capability);
      if permissions.allows(permission) {
        continue;
      }

      violations.push(RoleViolation {
        node_id: node.id.clone(),
        role,
        attempted_action: capability,
        violated_permission: permission,
        severity: ViolationSeverity::for_capability(capability),
        message: format!(
          "node '{}' requests {} but the {} role does not grant '{}'",
          node.id, capability, role, permission
        ),
        timestamp: at,
        blocked: true,
      });
    }
  }

  Ok(violations)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::resolver::resolve_roles;
  use bastion_workflow::{Capabilities, NodeConfig, NodeKind, Position};

  fn node(id: &str, kind: NodeKind, capabilities: Capabilities) -> Node {
    Node {
      id: id.to_string(),
      kind,
      title: String::new(),
      description: String::new(),
      position: Position::default(),
      config: NodeConfig {
        capabilities: Some(capabilities),
        ..Default::default()
      },
    }
  }

  fn external() -> Capabilities {
    Capabilities::of(&[Capability::ExternalExecution])
  }

  #[test]
  fn test_analyzer_with_external_execution() {
    let nodes = vec![node("t1", NodeKind::Trigger, external())];
    let assignments = resolve_roles(&nodes);
    assert_eq!(assignments[0].assigned_role, Role::Analyzer);

    let violations = validate_roles(&nodes, &assignments, Utc::now()).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].violated_permission, Permission::ExecuteExternal);
    assert_eq!(violations[0].severity, ViolationSeverity::Critical);
    assert!(violations[0].blocked);
  }

  #[test]
  fn test_no_flags_no_violations() {
    let nodes = vec![node("t1", NodeKind::Trigger, Capabilities::default())];
    let assignments = resolve_roles(&nodes);
    assert!(validate_roles(&nodes, &assignments, Utc::now()).unwrap().is_empty());
  }

  #[test]
  fn test_one_violation_per_disallowed_capability() {
    let all = Capabilities::of(&[
      Capability::WriteAccess,
      Capability::ExternalExecution,
      Capability::SecretAccess,
    ]);
    let nodes = vec![
      node("v1", NodeKind::Condition, all),
      node("e1", NodeKind::Action, all),
      node("x1", NodeKind::Data, all),
    ];
    let assignments = resolve_roles(&nodes);
    let violations = validate_roles(&nodes, &assignments, Utc::now()).unwrap();

    // validator: all three; executor: none; transformer: external + secrets.
    let for_node = |id: &str| violations.iter().filter(|v| v.node_id == id).count();
    assert_eq!(for_node("v1"), 3);
    assert_eq!(for_node("e1"), 0);
    assert_eq!(for_node("x1"), 2);
    assert!(violations.iter().all(|v| v.blocked));

    let write = violations
      .iter()
      .find(|v| v.node_id == "v1" && v.attempted_action == Capability::WriteAccess)
      .unwrap();
    assert_eq!(write.severity, ViolationSeverity::Error);
  }

  #[test]
  fn test_severity_names() {
    assert_eq!(
      serde_json::to_value(ViolationSeverity::Error).unwrap(),
      "error"
    );
    assert_eq!(
      serde_json::to_value(ViolationSeverity::Critical).unwrap(),
      "critical"
    );
    assert!(serde_json::from_value::<ViolationSeverity>("warning".into()).is_err());
  }

  #[test]
  fn test_override_is_checked_against_overridden_role() {
    let mut n = node("a1", NodeKind::Action, external());
    n.config.role_override = Some(Role::Validator);
    let nodes = vec![n];

    let assignments = resolve_roles(&nodes);
    let violations = validate_roles(&nodes, &assignments, Utc::now()).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].role, Role::Validator);
  }

  #[test]
  fn test_missing_assignment_is_an_error() {
    let nodes = vec![
      node("t1", NodeKind::Trigger, external()),
      node("t2", NodeKind::Trigger, Capabilities::default()),
    ];
    let assignments = resolve_roles(&nodes[..1]);

    let err = validate_roles(&nodes, &assignments, Utc::now()).unwrap_err();
    assert!(matches!(err, RoleError::MissingAssignment { node_id } if node_id == "t2"));
  }

  #[test]
  fn test_violations_round_trip() {
    let nodes = vec![node("t1", NodeKind::Trigger, external())];
    let violations = validate_roles(&nodes, &resolve_roles(&nodes), Utc::now()).unwrap();

    let json = serde_json::to_string(&violations).unwrap();
    let back: Vec<RoleViolation> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, violations);
  }
}
