//! Engine errors.

use bastion_config::ConfigError;
use bastion_roles::RoleError;
use bastion_workflow::WorkflowError;

/// Errors that abort an engine invocation. No partial result accompanies them.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
  /// Input could not be parsed into a workflow definition.
  #[error("invalid workflow input")]
  Config(#[from] ConfigError),

  /// The definition parsed but is not a valid graph.
  #[error("invalid workflow graph")]
  Workflow(#[from] WorkflowError),

  /// Role validation could not complete.
  #[error("role validation failed")]
  Role(#[from] RoleError),
}

impl EngineError {
  /// This error's message followed by each of its sources, joined with ": ".
  pub fn full_message(&self) -> String {
    let mut message = self.to_string();
    let mut source = std::error::Error::source(self);
    while let Some(cause) = source {
      message.push_str(": ");
      message.push_str(&cause.to_string());
      source = cause.source();
    }
    message
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::engine::load_workflow;

  #[test]
  fn test_full_message_names_the_offending_node() {
    let err = load_workflow(r#"[{ "id": "a", "type": "action" }, { "id": "a", "type": "data" }]"#)
      .unwrap_err();
    assert_eq!(err.to_string(), "invalid workflow graph");
    assert_eq!(err.full_message(), "invalid workflow graph: duplicate node id: a");
  }

  #[test]
  fn test_full_message_includes_parse_details() {
    let err = load_workflow("[{ \"id\": ").unwrap_err();
    let message = err.full_message();
    assert!(
      message.starts_with("invalid workflow input: failed to parse input: "),
      "{message}"
    );
    assert!(message.contains("line 1"), "{message}");
  }

  #[test]
  fn test_full_message_for_missing_assignment() {
    let err = EngineError::from(RoleError::MissingAssignment {
      node_id: "t2".to_string(),
    });
    assert_eq!(
      err.full_message(),
      "role validation failed: no role assignment for node 't2'"
    );
  }
}
