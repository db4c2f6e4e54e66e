use bastion_config::{NodeConfig, NodeKind, Position};
use serde::{Deserialize, Serialize};

/// A validated workflow node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
  pub id: String,
  #[serde(rename = "type")]
  pub kind: NodeKind,
  pub title: String,
  pub description: String,
  pub position: Position,
  #[serde(default)]
  pub config: NodeConfig,
}

impl Node {
  /// Lower-cased title and description, the text keyword rules match against.
  pub fn text(&self) -> String {
    format!("{} {}", self.title, self.description).to_lowercase()
  }

  pub fn is_guardrail(&self) -> bool {
    self.kind == NodeKind::Guardrail
  }
}
