//! Bastion Roles
//!
//! Every node in a workflow gets exactly one of eight fixed roles. A role's
//! contract caps what the node may do; the validator flags every node whose
//! configuration asks for more ("privilege creep").
//!
//! Violations are data. Nothing in this crate refuses to run a node; an
//! enforcement layer downstream decides what to do with blocking violations.

mod block;
mod contract;
mod error;
mod resolver;
mod validator;

pub use block::RoleContractBlock;
pub use contract::{Permission, Permissions, RiskTier, RoleContract, contract_for};
pub use error::RoleError;
pub use resolver::{RoleAssignment, resolve_roles, role_for_kind};
pub use validator::{RoleViolation, ViolationSeverity, validate_roles};

pub use bastion_workflow::Role;
