use thiserror::Error;

/// Errors that can occur while validating role assignments.
#[derive(Debug, Error)]
pub enum RoleError {
  /// A node has no resolved role assignment.
  #[error("no role assignment for node '{node_id}'")]
  MissingAssignment { node_id: String },
}
