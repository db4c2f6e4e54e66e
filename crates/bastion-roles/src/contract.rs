use std::fmt;

use bastion_workflow::{Capability, Role};
use serde::{Deserialize, Serialize};

/// Highest risk tier of action a role may take without review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
  Low,
  Medium,
  High,
  Critical,
}

/// A single entry of the permission matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
  Read,
  Write,
  ExecuteExternal,
  ModifyGraph,
  AccessPii,
  Approve,
  Block,
  Notify,
  CallAi,
  AccessSecrets,
}

impl Permission {
  pub fn as_str(&self) -> &'static str {
    match self {
      Permission::Read => "read",
      Permission::Write => "write",
      Permission::ExecuteExternal => "execute_external",
      Permission::ModifyGraph => "modify_graph",
      Permission::AccessPii => "access_pii",
      Permission::Approve => "approve",
      Permission::Block => "block",
      Permission::Notify => "notify",
      Permission::CallAi => "call_ai",
      Permission::AccessSecrets => "access_secrets",
    }
  }

  /// Permission a node needs to exercise a requested capability.
  pub fn required_for(capability: Capability) -> Permission {
    match capability {
      Capability::WriteAccess => Permission::Write,
      Capability::ExternalExecution => Permission::ExecuteExternal,
      Capability::SecretAccess => Permission::AccessSecrets,
    }
  }
}

impl fmt::Display for Permission {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Permission matrix of a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
  pub read: bool,
  pub write: bool,
  pub execute_external: bool,
  pub modify_graph: bool,
  pub access_pii: bool,
  pub approve: bool,
  pub block: bool,
  pub notify: bool,
  pub call_ai: bool,
  pub access_secrets: bool,
  pub max_risk_tier: RiskTier,
}

const NONE: Permissions = Permissions {
  read: false,
  write: false,
  execute_external: false,
  modify_graph: false,
  access_pii: false,
  approve: false,
  block: false,
  notify: false,
  call_ai: false,
  access_secrets: false,
  max_risk_tier: RiskTier::Low,
};

impl Permissions {
  pub fn allows(&self, permission: Permission) -> bool {
    match permission {
      Permission::Read => self.read,
      Permission::Write => self.write,
      Permission::ExecuteExternal => self.execute_external,
      Permission::ModifyGraph => self.modify_graph,
      Permission::AccessPii => self.access_pii,
      Permission::Approve => self.approve,
      Permission::Block => self.block,
      Permission::Notify => self.notify,
      Permission::CallAi => self.call_ai,
      Permission::AccessSecrets => self.access_secrets,
    }
  }
}

/// Static declaration of what a role may do.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleContract {
  pub role: Role,
  pub permissions: Permissions,
  pub description: &'static str,
  pub constraints: &'static [&'static str],
  pub audit_requirements: &'static [&'static str],
  /// Roles to escalate to, nearest first.
  pub escalation_path: &'static [Role],
}

impl RoleContract {
  /// Roles at `High` tier or above need sign-off before their nodes run.
  pub fn requires_approval(&self) -> bool {
    self.permissions.max_risk_tier >= RiskTier::High
  }
}

static CONTRACTS: [RoleContract; 8] = [
  RoleContract {
    role: Role::Analyzer,
    permissions: Permissions {
      read: true,
      call_ai: true,
      ..NONE
    },
    description: "Inspects and classifies data without changing anything.",
    constraints: &[
      "Read-only access to workflow data",
      "No external calls",
      "No access to secrets",
    ],
    audit_requirements: &["Log inputs inspected"],
    escalation_path: &[Role::Validator, Role::Guardian],
  },
  RoleContract {
    role: Role::Executor,
    permissions: Permissions {
      read: true,
      write: true,
      execute_external: true,
      notify: true,
      access_secrets: true,
      max_risk_tier: RiskTier::High,
      ..NONE
    },
    description: "Performs side effects against external systems.",
    constraints: &[
      "Side effects limited to declared integrations",
      "Timeout and retry policy required",
      "Secrets resolved at runtime, never stored in config",
    ],
    audit_requirements: &[
      "Log every external call with target and status",
      "Retain request identifiers for replay",
    ],
    escalation_path: &[Role::Orchestrator, Role::Guardian],
  },
  RoleContract {
    role: Role::Auditor,
    permissions: Permissions {
      read: true,
      access_pii: true,
      notify: true,
      max_risk_tier: RiskTier::Medium,
      ..NONE
    },
    description: "Records checkpoints and access trails.",
    constraints: &["Append-only audit records", "No modification of business data"],
    audit_requirements: &["Audit records are immutable"],
    escalation_path: &[Role::Guardian],
  },
  RoleContract {
    role: Role::Notifier,
    permissions: Permissions {
      read: true,
      execute_external: true,
      notify: true,
      max_risk_tier: RiskTier::Medium,
      ..NONE
    },
    description: "Sends messages to people or channels.",
    constraints: &[
      "Outbound messaging only",
      "No writes to data stores",
      "Message content must pass redaction",
    ],
    audit_requirements: &["Log recipients and delivery status"],
    escalation_path: &[Role::Orchestrator],
  },
  RoleContract {
    role: Role::Orchestrator,
    permissions: Permissions {
      read: true,
      modify_graph: true,
      approve: true,
      notify: true,
      max_risk_tier: RiskTier::High,
      ..NONE
    },
    description: "Coordinates sub-workflows and routing between nodes.",
    constraints: &[
      "Graph changes limited to its own sub-workflows",
      "Bounded concurrency",
    ],
    audit_requirements: &["Log dispatch decisions"],
    escalation_path: &[Role::Guardian],
  },
  RoleContract {
    role: Role::Validator,
    permissions: Permissions {
      read: true,
      block: true,
      ..NONE
    },
    description: "Evaluates conditions and rejects invalid data.",
    constraints: &["Decisions must be deterministic", "No side effects"],
    audit_requirements: &["Log rejected items with reason"],
    escalation_path: &[Role::Guardian],
  },
  RoleContract {
    role: Role::Transformer,
    permissions: Permissions {
      read: true,
      write: true,
      call_ai: true,
      max_risk_tier: RiskTier::Medium,
      ..NONE
    },
    description: "Reshapes or enriches data in flight.",
    constraints: &[
      "Writes limited to workflow state",
      "No external side effects",
      "No access to secrets",
    ],
    audit_requirements: &["Log schema of produced output"],
    escalation_path: &[Role::Validator, Role::Guardian],
  },
  RoleContract {
    role: Role::Guardian,
    permissions: Permissions {
      read: true,
      access_pii: true,
      approve: true,
      block: true,
      notify: true,
      max_risk_tier: RiskTier::Medium,
      ..NONE
    },
    description: "Enforces protective policy; can halt execution.",
    constraints: &[
      "No business-logic side effects",
      "Configuration changes require review",
    ],
    audit_requirements: &["Log every block and approval decision"],
    escalation_path: &[Role::Auditor],
  },
];

/// Contract for a role.
pub fn contract_for(role: Role) -> &'static RoleContract {
  let index = match role {
    Role::Analyzer => 0,
    Role::Executor => 1,
    Role::Auditor => 2,
    Role::Notifier => 3,
    Role::Orchestrator => 4,
    Role::Validator => 5,
    Role::Transformer => 6,
    Role::Guardian => 7,
  };
  &CONTRACTS[index]
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_contract_table_matches_roles() {
    for role in Role::ALL {
      assert_eq!(contract_for(role).role, role);
    }
  }

  #[test]
  fn test_every_role_can_read() {
    for role in Role::ALL {
      assert!(contract_for(role).permissions.allows(Permission::Read));
    }
  }

  #[test]
  fn test_analyzer_is_least_privileged() {
    let analyzer = contract_for(Role::Analyzer);
    assert!(!analyzer.permissions.allows(Permission::Write));
    assert!(!analyzer.permissions.allows(Permission::ExecuteExternal));
    assert!(!analyzer.permissions.allows(Permission::AccessSecrets));
    assert_eq!(analyzer.permissions.max_risk_tier, RiskTier::Low);
    assert!(!analyzer.requires_approval());
  }

  #[test]
  fn test_only_executor_holds_secrets() {
    let holders: Vec<Role> = Role::ALL
      .into_iter()
      .filter(|r| contract_for(*r).permissions.access_secrets)
      .collect();
    assert_eq!(holders, vec![Role::Executor]);
  }

  #[test]
  fn test_escalation_never_points_to_self() {
    for role in Role::ALL {
      assert!(!contract_for(role).escalation_path.contains(&role));
    }
  }
}
