//! Bastion Scanner
//!
//! Static heuristics over a workflow graph. Fifteen independent rules, three
//! per category, each either report nothing or report one finding covering
//! every node it matched.
//!
//! Scores and findings are a pure function of the node list and the
//! `ScanSettings`; only the envelope of a `ScanResult` (id, timestamp,
//! duration) differs between runs.

mod finding;
mod result;
mod rule;
mod rules;
mod scanner;

pub use finding::{FindingImpact, FindingSeverity, IMPACT_DECIMALS, ScanCategory, ScanFinding};
pub use result::{CategoryScores, OptimizationPotential, ScanResult, ScanTrend};
pub use rule::ScanRule;
pub use rules::builtin_rules;
pub use scanner::WorkflowScanner;

pub use bastion_config::ScanSettings;
