use bastion_workflow::{Node, NodeKind};

use super::{RATE_LIMIT_KEYS, has_guardrail};
use crate::finding::{FindingImpact, FindingSeverity, ScanCategory, ScanFinding};
use crate::rule::{FindingText, ScanRule, finding_for, node_list};

/// External calls with no throttle will hit provider limits under load.
pub struct MissingRateLimit;

impl ScanRule for MissingRateLimit {
  fn id(&self) -> &'static str {
    "missing-rate-limit"
  }

  fn category(&self) -> ScanCategory {
    ScanCategory::Scalability
  }

  fn severity(&self) -> FindingSeverity {
    FindingSeverity::Medium
  }

  fn evaluate(&self, nodes: &[Node]) -> Option<ScanFinding> {
    if has_guardrail(nodes, "rate-limiter") {
      return None;
    }

    let affected: Vec<&Node> = nodes
      .iter()
      .filter(|n| n.kind.is_side_effecting() && !n.config.has_any(RATE_LIMIT_KEYS))
      .collect();

    finding_for(
      self,
      FindingText {
        title: "No rate limiting on external calls",
        recommendation: "Throttle calls to stay under provider quotas.",
        auto_fixable: true,
      },
      &affected,
      format!(
        "{} call external services without a rate limit.",
        node_list(&affected)
      ),
      FindingImpact::per_node(affected.len(), 0.0, 0, 2.0),
    )
  }
}

/// Fan-out nodes with no concurrency bound.
pub struct UnboundedFanOut;

const FAN_OUT_KEYS: &[&str] = &["forEach", "loop"];
const CONCURRENCY_KEYS: &[&str] = &["maxConcurrency", "concurrency", "batchSize"];

impl ScanRule for UnboundedFanOut {
  fn id(&self) -> &'static str {
    "unbounded-fan-out"
  }

  fn category(&self) -> ScanCategory {
    ScanCategory::Scalability
  }

  fn severity(&self) -> FindingSeverity {
    FindingSeverity::Medium
  }

  fn evaluate(&self, nodes: &[Node]) -> Option<ScanFinding> {
    let affected: Vec<&Node> = nodes
      .iter()
      .filter(|n| n.kind == NodeKind::Orchestrator || n.config.has_any(FAN_OUT_KEYS))
      .filter(|n| !n.config.has_any(CONCURRENCY_KEYS))
      .collect();

    finding_for(
      self,
      FindingText {
        title: "Unbounded fan-out",
        recommendation: "Cap concurrency on loops and sub-workflow dispatch.",
        auto_fixable: true,
      },
      &affected,
      format!(
        "{} start work for every item at once.",
        node_list(&affected)
      ),
      FindingImpact::per_node(affected.len(), 0.0, 0, 1.0),
    )
  }
}

/// Workflows above the recommended size are hard to review and debug.
pub struct OversizedWorkflow {
  pub max_nodes: usize,
}

impl ScanRule for OversizedWorkflow {
  fn id(&self) -> &'static str {
    "oversized-workflow"
  }

  fn category(&self) -> ScanCategory {
    ScanCategory::Scalability
  }

  fn severity(&self) -> FindingSeverity {
    FindingSeverity::Low
  }

  fn evaluate(&self, nodes: &[Node]) -> Option<ScanFinding> {
    if nodes.len() <= self.max_nodes {
      return None;
    }

    let affected: Vec<&Node> = nodes.iter().collect();
    finding_for(
      self,
      FindingText {
        title: "Oversized workflow",
        recommendation: "Split the workflow into sub-workflows.",
        auto_fixable: false,
      },
      &affected,
      format!(
        "The workflow has {} nodes; more than {} is hard to maintain.",
        nodes.len(),
        self.max_nodes
      ),
      FindingImpact::default(),
    )
  }
}
