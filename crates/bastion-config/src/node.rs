use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::enums::{Capability, NodeKind, Role};

/// A node as supplied by the graph editor.
///
/// `id` is optional here so that a missing id surfaces as a validation error
/// with the offending index instead of an opaque parse failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDef {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  #[serde(rename = "type")]
  pub kind: NodeKind,
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub position: Position,
  #[serde(default)]
  pub config: NodeConfig,
}

/// Canvas position of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
  pub x: f64,
  pub y: f64,
}

impl Position {
  pub fn new(x: f64, y: f64) -> Self {
    Self { x, y }
  }
}

/// Per-node configuration.
///
/// The fields the engine enforces are typed; everything else the editor stores
/// on a node lands in `settings` untouched.
///
/// ```json
/// {
///   "capabilities": { "externalExecution": true },
///   "roleOverride": "executor",
///   "model": "gpt-4",
///   "timeoutMs": 30000
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeConfig {
  /// Kept exactly as supplied, including flags set to `false`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub capabilities: Option<Capabilities>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub role_override: Option<Role>,
  /// Id of the guardrail rule an injected node was synthesized from.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub guardrail_rule: Option<String>,
  #[serde(flatten)]
  pub settings: Map<String, Value>,
}

impl NodeConfig {
  /// Requested capabilities in a fixed order; none when the node declares none.
  pub fn requested_capabilities(&self) -> Vec<Capability> {
    self
      .capabilities
      .as_ref()
      .map(Capabilities::requested)
      .unwrap_or_default()
  }

  pub fn setting(&self, key: &str) -> Option<&Value> {
    self.settings.get(key)
  }

  /// True if any of `keys` is present with a value other than `null`/`false`.
  pub fn has_any(&self, keys: &[&str]) -> bool {
    keys.iter().any(|key| match self.settings.get(*key) {
      None | Some(Value::Null) | Some(Value::Bool(false)) => false,
      Some(_) => true,
    })
  }

  pub fn setting_bool(&self, key: &str) -> Option<bool> {
    self.settings.get(key).and_then(Value::as_bool)
  }

  pub fn setting_str(&self, key: &str) -> Option<&str> {
    self.settings.get(key).and_then(Value::as_str)
  }

  pub fn setting_u64(&self, key: &str) -> Option<u64> {
    self.settings.get(key).and_then(Value::as_u64)
  }
}

/// Elevated-capability flags a node may request.
///
/// A flag the editor did not write stays `None` so the object serializes back
/// the way it came in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub write_access: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub external_execution: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub secret_access: Option<bool>,
}

impl Capabilities {
  /// Flags set to `true` for each of `capabilities`, every other flag unset.
  pub fn of(capabilities: &[Capability]) -> Self {
    let mut caps = Capabilities::default();
    for capability in capabilities {
      match capability {
        Capability::WriteAccess => caps.write_access = Some(true),
        Capability::ExternalExecution => caps.external_execution = Some(true),
        Capability::SecretAccess => caps.secret_access = Some(true),
      }
    }
    caps
  }

  pub fn is_empty(&self) -> bool {
    self.requested().is_empty()
  }

  /// Requested capabilities in a fixed order.
  pub fn requested(&self) -> Vec<Capability> {
    [
      (self.write_access, Capability::WriteAccess),
      (self.external_execution, Capability::ExternalExecution),
      (self.secret_access, Capability::SecretAccess),
    ]
    .into_iter()
    .filter(|(flag, _)| *flag == Some(true))
    .map(|(_, capability)| capability)
    .collect()
  }
}
