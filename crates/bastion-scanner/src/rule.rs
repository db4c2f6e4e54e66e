use bastion_workflow::Node;

use crate::finding::{FindingImpact, FindingSeverity, ScanCategory, ScanFinding};

/// A single heuristic check.
///
/// Implementations must be pure: the same nodes always produce the same
/// finding (or none).
pub trait ScanRule: Send + Sync {
  fn id(&self) -> &'static str;

  fn category(&self) -> ScanCategory;

  fn severity(&self) -> FindingSeverity;

  fn evaluate(&self, nodes: &[Node]) -> Option<ScanFinding>;
}

/// Text and flags shared by every finding a rule emits.
pub(crate) struct FindingText {
  pub title: &'static str,
  pub recommendation: &'static str,
  pub auto_fixable: bool,
}

/// Build the finding for `rule`, or nothing when no node matched.
pub(crate) fn finding_for(
  rule: &dyn ScanRule,
  text: FindingText,
  affected: &[&Node],
  description: String,
  impact: FindingImpact,
) -> Option<ScanFinding> {
  if affected.is_empty() {
    return None;
  }

  Some(ScanFinding {
    id: rule.id().to_string(),
    category: rule.category(),
    severity: rule.severity(),
    title: text.title.to_string(),
    description,
    impact,
    recommendation: text.recommendation.to_string(),
    affected_nodes: affected.iter().map(|n| n.id.clone()).collect(),
    auto_fixable: text.auto_fixable,
  })
}

/// Comma-separated node titles (falling back to ids) for finding descriptions.
pub(crate) fn node_list(nodes: &[&Node]) -> String {
  nodes
    .iter()
    .map(|n| {
      if n.title.is_empty() {
        format!("'{}'", n.id)
      } else {
        format!("'{}'", n.title)
      }
    })
    .collect::<Vec<_>>()
    .join(", ")
}
