use std::collections::BTreeSet;

use serde::Serialize;

use crate::contract::{RoleContract, contract_for};
use crate::resolver::RoleAssignment;
use crate::validator::RoleViolation;

/// Role-contract configuration embedded in exported artifacts.
///
/// Carries the contracts of every role in use so the consumer does not need
/// its own copy of the role table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleContractBlock<'a> {
  pub contracts: Vec<&'static RoleContract>,
  pub assignments: &'a [RoleAssignment],
  pub violations: &'a [RoleViolation],
  /// Ids of nodes with at least one blocking violation.
  pub blocked_nodes: Vec<&'a str>,
}

impl<'a> RoleContractBlock<'a> {
  pub fn new(assignments: &'a [RoleAssignment], violations: &'a [RoleViolation]) -> Self {
    let roles: BTreeSet<_> = assignments.iter().map(|a| a.assigned_role).collect();

    let mut blocked_nodes: Vec<&str> = Vec::new();
    for violation in violations.iter().filter(|v| v.blocked) {
      if !blocked_nodes.contains(&violation.node_id.as_str()) {
        blocked_nodes.push(&violation.node_id);
      }
    }

    Self {
      contracts: roles.into_iter().map(contract_for).collect(),
      assignments,
      violations,
      blocked_nodes,
    }
  }
}
