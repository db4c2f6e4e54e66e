use bastion_workflow::{Node, NodeKind};

use super::CACHE_KEYS;
use crate::finding::{FindingImpact, FindingSeverity, ScanCategory, ScanFinding};
use crate::rule::{FindingText, ScanRule, finding_for, node_list};

/// AI calls with no response cache pay full latency and cost on every run.
pub struct UncachedAiCall;

impl ScanRule for UncachedAiCall {
  fn id(&self) -> &'static str {
    "uncached-ai-call"
  }

  fn category(&self) -> ScanCategory {
    ScanCategory::Performance
  }

  fn severity(&self) -> FindingSeverity {
    FindingSeverity::Medium
  }

  fn evaluate(&self, nodes: &[Node]) -> Option<ScanFinding> {
    let affected: Vec<&Node> = nodes
      .iter()
      .filter(|n| n.kind == NodeKind::Ai && !n.config.has_any(CACHE_KEYS))
      .collect();

    finding_for(
      self,
      FindingText {
        title: "AI calls without caching",
        recommendation: "Enable response caching for prompts whose inputs repeat.",
        auto_fixable: true,
      },
      &affected,
      format!(
        "{} call a model on every execution without caching.",
        node_list(&affected)
      ),
      FindingImpact::per_node(affected.len(), 0.5, 800, 0.0),
    )
  }
}

/// Three or more external calls with none marked parallel run back to back.
pub struct SequentialExternalCalls;

const MIN_SEQUENTIAL_CALLS: usize = 3;
const SEQUENTIAL_CALL_MS: u64 = 300;

impl ScanRule for SequentialExternalCalls {
  fn id(&self) -> &'static str {
    "sequential-external-calls"
  }

  fn category(&self) -> ScanCategory {
    ScanCategory::Performance
  }

  fn severity(&self) -> FindingSeverity {
    FindingSeverity::Medium
  }

  fn evaluate(&self, nodes: &[Node]) -> Option<ScanFinding> {
    let external: Vec<&Node> = nodes
      .iter()
      .filter(|n| n.kind.is_side_effecting())
      .collect();
    if external.len() < MIN_SEQUENTIAL_CALLS
      || external
        .iter()
        .any(|n| n.config.setting_bool("parallel") == Some(true))
    {
      return None;
    }

    let saved_ms = SEQUENTIAL_CALL_MS * (external.len() as u64 - 1);
    finding_for(
      self,
      FindingText {
        title: "External calls run sequentially",
        recommendation: "Run independent external calls in parallel branches.",
        auto_fixable: false,
      },
      &external,
      format!(
        "{} external calls run one after another: {}.",
        external.len(),
        node_list(&external)
      ),
      FindingImpact {
        time_ms: saved_ms,
        ..Default::default()
      },
    )
  }
}

/// Data reads with no paging or batch size pull whole datasets at once.
pub struct UnbatchedDataAccess;

const BATCH_KEYS: &[&str] = &["batchSize", "pagination", "pageSize", "limit"];

impl ScanRule for UnbatchedDataAccess {
  fn id(&self) -> &'static str {
    "unbatched-data-access"
  }

  fn category(&self) -> ScanCategory {
    ScanCategory::Performance
  }

  fn severity(&self) -> FindingSeverity {
    FindingSeverity::Low
  }

  fn evaluate(&self, nodes: &[Node]) -> Option<ScanFinding> {
    let affected: Vec<&Node> = nodes
      .iter()
      .filter(|n| n.kind == NodeKind::Data && !n.config.has_any(BATCH_KEYS))
      .collect();

    finding_for(
      self,
      FindingText {
        title: "Unbatched data access",
        recommendation: "Set a page or batch size on data reads.",
        auto_fixable: true,
      },
      &affected,
      format!("{} read data without pagination.", node_list(&affected)),
      FindingImpact::per_node(affected.len(), 0.0, 200, 0.0),
    )
  }
}
