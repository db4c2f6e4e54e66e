use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
  #[error("node at index {index} is missing an id")]
  MissingNodeId { index: usize },

  #[error("duplicate node id: {node_id}")]
  DuplicateNodeId { node_id: String },
}
