//! Bastion Guardrails
//!
//! Compliance detection and guardrail handling for workflow graphs:
//!
//! ```text
//! nodes ──► detect_standards ──► GuardrailRegistry::select ──► inject_guardrails
//!                 │                        │
//!                 └──────────► score_risk ◄┘
//! ```
//!
//! Every function here is pure over its inputs. Timestamps are passed in by
//! the caller; the only randomness is the suffix of injected node ids.

mod error;
mod injector;
mod matching;
mod registry;
mod risk;
mod selector;
mod standards;

pub use error::GuardrailError;
pub use injector::{
  ENTRY_POINT_OFFSET_X, ENTRY_POINT_STEP_Y, InjectedGuardrail, Injection, STACK_STEP_Y,
  inject_guardrails,
};
pub use registry::{ENTRY_POINT_TAGS, GuardrailRegistry, GuardrailRule, Severity};
pub use risk::{
  CRITICAL_MITIGATION, HIGH_MITIGATION, RiskAssessment, RiskLevel, STANDARD_RISK_WEIGHT,
  StandardRisk, score_risk,
};
pub use selector::{GuardrailExplanation, SelectedGuardrail};
pub use standards::{ComplianceStandard, detect_standards};
