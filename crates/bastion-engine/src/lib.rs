//! Bastion Policy Engine
//!
//! This crate wires the analysis stages into a single invocation and adds
//! structured logging and event notification around them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       PolicyEngine                          │
//! │  - analyze(workflow) → AnalysisReport                       │
//! │  - roles(workflow) → RoleReport                             │
//! │  - scan(workflow) → ScanResult                              │
//! └─────────────────────────────────────────────────────────────┘
//!          │                      │                      │
//!          ▼                      ▼                      ▼
//! ┌────────────────────┐  ┌────────────────────┐  ┌────────────────────┐
//! │ bastion-guardrails │  │ bastion-roles      │  │ bastion-scanner    │
//! │ detect, select     │  │ resolve, validate  │  │ 15 scan rules      │
//! │ inject, risk       │  │                    │  │ scoring            │
//! └────────────────────┘  └────────────────────┘  └────────────────────┘
//! ```
//!
//! `analyze` is all-or-nothing: on malformed input it returns an error and no
//! report.
//!
//! # Usage
//!
//! ```ignore
//! use bastion_engine::{PolicyEngine, load_workflow};
//!
//! let workflow = load_workflow(&std::fs::read_to_string("workflow.json")?)?;
//! let engine = PolicyEngine::default();
//!
//! let report = engine.analyze(&workflow)?;
//! let block = report.roles.contract_block();
//! let scan = engine.scan(&report.workflow);
//! ```

mod engine;
mod error;
mod events;
mod report;

pub use engine::{PolicyEngine, load_workflow};
pub use error::EngineError;
pub use events::{AnalysisEvent, AnalysisNotifier, ChannelNotifier, NoopNotifier};
pub use report::{AnalysisReport, RoleReport};

pub use bastion_config::EngineSettings;
