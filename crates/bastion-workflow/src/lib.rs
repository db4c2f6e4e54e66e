//! Bastion Workflow
//!
//! This crate provides the validated workflow representation every analysis
//! stage operates on. A `Workflow` is built from a `bastion_config::WorkflowDef`.
//!
//! Key differences from `bastion-config`:
//! - Every node has a non-empty id
//! - Node ids are unique within the graph
//! - Nodes can only be appended, never replaced or removed

mod error;
mod node;
mod workflow;

pub use error::WorkflowError;
pub use node::Node;
pub use workflow::Workflow;

pub use bastion_config::{Capabilities, Capability, NodeConfig, NodeKind, Position, Role};
