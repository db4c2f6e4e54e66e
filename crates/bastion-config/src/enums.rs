use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a workflow node as reported by the graph editor.
///
/// Kinds the engine does not know deserialize to `Unknown` instead of failing,
/// so newer editors can send graphs to an older engine. The original type name
/// is kept and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
  Trigger,
  Action,
  Condition,
  Data,
  Ai,
  Guardrail,
  Connector,
  Notification,
  Checkpoint,
  Orchestrator,
  Unknown(String),
}

impl NodeKind {
  pub fn as_str(&self) -> &str {
    match self {
      NodeKind::Trigger => "trigger",
      NodeKind::Action => "action",
      NodeKind::Condition => "condition",
      NodeKind::Data => "data",
      NodeKind::Ai => "ai",
      NodeKind::Guardrail => "guardrail",
      NodeKind::Connector => "connector",
      NodeKind::Notification => "notification",
      NodeKind::Checkpoint => "checkpoint",
      NodeKind::Orchestrator => "orchestrator",
      NodeKind::Unknown(raw) => raw,
    }
  }

  pub fn is_unknown(&self) -> bool {
    matches!(self, NodeKind::Unknown(_))
  }

  /// Nodes that reach outside the workflow (HTTP calls, SaaS connectors).
  pub fn is_side_effecting(&self) -> bool {
    matches!(self, NodeKind::Action | NodeKind::Connector)
  }
}

impl From<String> for NodeKind {
  fn from(raw: String) -> Self {
    match raw.as_str() {
      "trigger" => NodeKind::Trigger,
      "action" => NodeKind::Action,
      "condition" => NodeKind::Condition,
      "data" => NodeKind::Data,
      "ai" => NodeKind::Ai,
      "guardrail" => NodeKind::Guardrail,
      "connector" => NodeKind::Connector,
      "notification" => NodeKind::Notification,
      "checkpoint" => NodeKind::Checkpoint,
      "orchestrator" => NodeKind::Orchestrator,
      _ => NodeKind::Unknown(raw),
    }
  }
}

impl From<NodeKind> for String {
  fn from(kind: NodeKind) -> Self {
    match kind {
      NodeKind::Unknown(raw) => raw,
      known => known.as_str().to_string(),
    }
  }
}

impl fmt::Display for NodeKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// The eight fixed node roles, from least to most trusted in declaration order
/// of their contracts (see `bastion-roles`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
  Analyzer,
  Executor,
  Auditor,
  Notifier,
  Orchestrator,
  Validator,
  Transformer,
  Guardian,
}

impl Role {
  pub const ALL: [Role; 8] = [
    Role::Analyzer,
    Role::Executor,
    Role::Auditor,
    Role::Notifier,
    Role::Orchestrator,
    Role::Validator,
    Role::Transformer,
    Role::Guardian,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Role::Analyzer => "analyzer",
      Role::Executor => "executor",
      Role::Auditor => "auditor",
      Role::Notifier => "notifier",
      Role::Orchestrator => "orchestrator",
      Role::Validator => "validator",
      Role::Transformer => "transformer",
      Role::Guardian => "guardian",
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// An elevated capability a node may request through its config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
  WriteAccess,
  ExternalExecution,
  SecretAccess,
}

impl Capability {
  pub fn as_str(&self) -> &'static str {
    match self {
      Capability::WriteAccess => "write_access",
      Capability::ExternalExecution => "external_execution",
      Capability::SecretAccess => "secret_access",
    }
  }
}

impl fmt::Display for Capability {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}
