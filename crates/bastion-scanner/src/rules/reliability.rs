use bastion_workflow::{Node, NodeKind};

use super::{ERROR_HANDLER_KEYS, RETRY_KEYS, TIMEOUT_KEYS, is_remote_call};
use crate::finding::{FindingImpact, FindingSeverity, ScanCategory, ScanFinding};
use crate::rule::{FindingText, ScanRule, finding_for, node_list};

pub struct MissingRetry;

impl ScanRule for MissingRetry {
  fn id(&self) -> &'static str {
    "missing-retry"
  }

  fn category(&self) -> ScanCategory {
    ScanCategory::Reliability
  }

  fn severity(&self) -> FindingSeverity {
    FindingSeverity::High
  }

  fn evaluate(&self, nodes: &[Node]) -> Option<ScanFinding> {
    let affected: Vec<&Node> = nodes
      .iter()
      .filter(|n| is_remote_call(n) && !n.config.has_any(RETRY_KEYS))
      .collect();

    finding_for(
      self,
      FindingText {
        title: "Remote calls without retry",
        recommendation: "Retry transient failures with exponential backoff.",
        auto_fixable: true,
      },
      &affected,
      format!(
        "{} fail the run on the first transient error.",
        node_list(&affected)
      ),
      FindingImpact::per_node(affected.len(), 0.0, 0, 5.0),
    )
  }
}

pub struct MissingTimeout;

impl ScanRule for MissingTimeout {
  fn id(&self) -> &'static str {
    "missing-timeout"
  }

  fn category(&self) -> ScanCategory {
    ScanCategory::Reliability
  }

  fn severity(&self) -> FindingSeverity {
    FindingSeverity::Medium
  }

  fn evaluate(&self, nodes: &[Node]) -> Option<ScanFinding> {
    let affected: Vec<&Node> = nodes
      .iter()
      .filter(|n| is_remote_call(n) && !n.config.has_any(TIMEOUT_KEYS))
      .collect();

    finding_for(
      self,
      FindingText {
        title: "Remote calls without timeout",
        recommendation: "Set an explicit timeout on every remote call.",
        auto_fixable: true,
      },
      &affected,
      format!(
        "{} can hang indefinitely on an unresponsive service.",
        node_list(&affected)
      ),
      FindingImpact::per_node(affected.len(), 0.0, 0, 3.0),
    )
  }
}

/// Side effects with no branch or handler to catch their failure.
pub struct MissingErrorHandling;

impl ScanRule for MissingErrorHandling {
  fn id(&self) -> &'static str {
    "missing-error-handling"
  }

  fn category(&self) -> ScanCategory {
    ScanCategory::Reliability
  }

  fn severity(&self) -> FindingSeverity {
    FindingSeverity::Medium
  }

  fn evaluate(&self, nodes: &[Node]) -> Option<ScanFinding> {
    let handled = nodes
      .iter()
      .any(|n| n.kind == NodeKind::Condition || n.config.has_any(ERROR_HANDLER_KEYS));
    if handled {
      return None;
    }

    let affected: Vec<&Node> = nodes
      .iter()
      .filter(|n| n.kind.is_side_effecting())
      .collect();

    finding_for(
      self,
      FindingText {
        title: "No error handling path",
        recommendation: "Add a condition branch or error handler for failed side effects.",
        auto_fixable: false,
      },
      &affected,
      format!(
        "Failures in {} stop the workflow with no fallback.",
        node_list(&affected)
      ),
      FindingImpact {
        reliability_delta_pct: 8.0,
        ..Default::default()
      },
    )
  }
}
