//! Bastion Config
//!
//! This crate contains the serializable input types for the Bastion policy engine.
//! These types represent workflow graphs as the graph editor hands them over,
//! before they are validated into a `bastion_workflow::Workflow`.
//!
//! Definitions can be loaded from:
//! - JSON files (via CLI with `bastion analyze workflow.json`)
//! - Request handlers holding the graph as a JSON blob
//!
//! Engine settings (`EngineSettings`) live here as well so that the CLI and
//! embedding services share one configuration format.

mod enums;
mod error;
mod node;
mod settings;
mod workflow;

pub use enums::{Capability, NodeKind, Role};
pub use error::ConfigError;
pub use node::{Capabilities, NodeConfig, NodeDef, Position};
pub use settings::{
  DEFAULT_ASSUMED_MONTHLY_EXECUTIONS, DEFAULT_BASELINE_NODE_TIME_MS,
  DEFAULT_MAX_RECOMMENDED_NODES, DEFAULT_MIN_POLL_INTERVAL_SECONDS, DEFAULT_PREMIUM_MODELS,
  EngineSettings, ScanSettings,
};
pub use workflow::WorkflowDef;
