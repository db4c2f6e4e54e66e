use bastion_workflow::{Node, NodeKind, Role};
use serde::{Deserialize, Serialize};

use crate::contract::contract_for;

/// The role resolved for one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignment {
  pub node_id: String,
  pub node_kind: NodeKind,
  pub assigned_role: Role,
  pub justification: String,
  pub constraints: Vec<String>,
  pub requires_approval: bool,
  pub approval_chain: Vec<Role>,
}

/// Default role for a node kind. Unknown kinds get the least-privileged role.
pub fn role_for_kind(kind: &NodeKind) -> Role {
  match kind {
    NodeKind::Trigger => Role::Analyzer,
    NodeKind::Action | NodeKind::Connector => Role::Executor,
    NodeKind::Data | NodeKind::Ai => Role::Transformer,
    NodeKind::Condition => Role::Validator,
    NodeKind::Guardrail => Role::Guardian,
    NodeKind::Checkpoint => Role::Auditor,
    NodeKind::Orchestrator => Role::Orchestrator,
    NodeKind::Notification => Role::Notifier,
    NodeKind::Unknown(_) => Role::Analyzer,
  }
}

/// Assign a role to every node, in node order.
pub fn resolve_roles(nodes: &[Node]) -> Vec<RoleAssignment> {
  nodes.iter().map(resolve_node).collect()
}

fn resolve_node(node: &Node) -> RoleAssignment {
  let (role, justification) = match node.config.role_override {
    Some(role) => (role, format!("explicit role override to {role}")),
    None => {
      let role = role_for_kind(&node.kind);
      let justification = match &node.kind {
        NodeKind::Unknown(raw) => {
          format!("unrecognized node type '{raw}'; defaulting to least-privileged {role}")
        }
        kind => format!("{kind} nodes are assigned the {role} role"),
      };
      (role, justification)
    }
  };

  let contract = contract_for(role);
  let requires_approval = contract.requires_approval();

  RoleAssignment {
    node_id: node.id.clone(),
    node_kind: node.kind.clone(),
    assigned_role: role,
    justification,
    constraints: contract.constraints.iter().map(|c| c.to_string()).collect(),
    requires_approval,
    approval_chain: if requires_approval {
      contract.escalation_path.to_vec()
    } else {
      Vec::new()
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use bastion_workflow::{NodeConfig, Position};

  fn node(id: &str, kind: NodeKind) -> Node {
    Node {
      id: id.to_string(),
      kind,
      title: String::new(),
      description: String::new(),
      position: Position::default(),
      config: NodeConfig::default(),
    }
  }

  #[test]
  fn test_kind_table() {
    let cases = [
      (NodeKind::Trigger, Role::Analyzer),
      (NodeKind::Action, Role::Executor),
      (NodeKind::Connector, Role::Executor),
      (NodeKind::Data, Role::Transformer),
      (NodeKind::Ai, Role::Transformer),
      (NodeKind::Condition, Role::Validator),
      (NodeKind::Guardrail, Role::Guardian),
      (NodeKind::Checkpoint, Role::Auditor),
      (NodeKind::Orchestrator, Role::Orchestrator),
      (NodeKind::Notification, Role::Notifier),
      (NodeKind::Unknown("spreadsheet_magic".to_string()), Role::Analyzer),
    ];

    for (kind, role) in cases {
      assert_eq!(role_for_kind(&kind), role, "{kind}");
    }
  }

  #[test]
  fn test_one_assignment_per_node_in_order() {
    let nodes = vec![
      node("t1", NodeKind::Trigger),
      node("a1", NodeKind::Action),
      node("x1", NodeKind::Unknown("spreadsheet_magic".to_string())),
    ];

    let assignments = resolve_roles(&nodes);
    let ids: Vec<_> = assignments.iter().map(|a| a.node_id.as_str()).collect();
    assert_eq!(ids, vec!["t1", "a1", "x1"]);
    assert!(assignments[2].justification.contains("least-privileged"));
    assert!(assignments[2].justification.contains("spreadsheet_magic"));
  }

  #[test]
  fn test_override_wins() {
    let mut n = node("c1", NodeKind::Condition);
    n.config.role_override = Some(Role::Orchestrator);

    let assignment = &resolve_roles(&[n])[0];
    assert_eq!(assignment.assigned_role, Role::Orchestrator);
    assert!(assignment.justification.contains("override"));
  }

  #[test]
  fn test_approval_chain_for_high_tier_roles() {
    let assignments = resolve_roles(&[node("a1", NodeKind::Action), node("t1", NodeKind::Trigger)]);

    assert!(assignments[0].requires_approval);
    assert_eq!(
      assignments[0].approval_chain,
      vec![Role::Orchestrator, Role::Guardian]
    );
    assert!(!assignments[1].requires_approval);
    assert!(assignments[1].approval_chain.is_empty());
  }

  #[test]
  fn test_assignments_round_trip() {
    let assignments = resolve_roles(&[
      node("a1", NodeKind::Action),
      node("g1", NodeKind::Guardrail),
      node("x1", NodeKind::Unknown("spreadsheet_magic".to_string())),
    ]);

    let json = serde_json::to_string(&assignments).unwrap();
    let back: Vec<RoleAssignment> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, assignments);
  }
}
