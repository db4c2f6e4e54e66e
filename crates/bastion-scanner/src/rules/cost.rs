use bastion_config::ScanSettings;
use bastion_workflow::{Node, NodeKind};

use crate::finding::{FindingImpact, FindingSeverity, ScanCategory, ScanFinding};
use crate::rule::{FindingText, ScanRule, finding_for, node_list};

/// AI nodes configured with a premium-priced model.
pub struct PremiumModelUsage {
  pub settings: ScanSettings,
}

impl ScanRule for PremiumModelUsage {
  fn id(&self) -> &'static str {
    "premium-model-usage"
  }

  fn category(&self) -> ScanCategory {
    ScanCategory::Cost
  }

  fn severity(&self) -> FindingSeverity {
    FindingSeverity::High
  }

  fn evaluate(&self, nodes: &[Node]) -> Option<ScanFinding> {
    let affected: Vec<&Node> = nodes
      .iter()
      .filter(|n| n.kind == NodeKind::Ai)
      .filter(|n| {
        n.config
          .setting_str("model")
          .is_some_and(|m| self.settings.is_premium_model(m))
      })
      .collect();

    finding_for(
      self,
      FindingText {
        title: "Premium model usage",
        recommendation: "Use a smaller model for classification, extraction and routing steps.",
        auto_fixable: false,
      },
      &affected,
      format!("{} use a premium-priced model.", node_list(&affected)),
      FindingImpact::per_node(affected.len(), 3.0, 0, 0.0),
    )
  }
}

/// Poll triggers checking more often than the configured minimum interval.
pub struct AggressivePolling {
  pub min_interval_seconds: u64,
}

impl ScanRule for AggressivePolling {
  fn id(&self) -> &'static str {
    "aggressive-polling"
  }

  fn category(&self) -> ScanCategory {
    ScanCategory::Cost
  }

  fn severity(&self) -> FindingSeverity {
    FindingSeverity::Medium
  }

  fn evaluate(&self, nodes: &[Node]) -> Option<ScanFinding> {
    let affected: Vec<&Node> = nodes
      .iter()
      .filter(|n| n.kind == NodeKind::Trigger)
      .filter(|n| {
        n.config
          .setting_u64("pollIntervalSeconds")
          .is_some_and(|s| s < self.min_interval_seconds)
      })
      .collect();

    finding_for(
      self,
      FindingText {
        title: "Aggressive polling interval",
        recommendation: "Poll less often or switch the trigger to a webhook.",
        auto_fixable: true,
      },
      &affected,
      format!(
        "{} poll more often than every {} seconds.",
        node_list(&affected),
        self.min_interval_seconds
      ),
      FindingImpact::per_node(affected.len(), 0.05, 0, 0.0),
    )
  }
}

/// AI nodes with no output token cap.
pub struct UnboundedAiTokens;

impl ScanRule for UnboundedAiTokens {
  fn id(&self) -> &'static str {
    "unbounded-ai-tokens"
  }

  fn category(&self) -> ScanCategory {
    ScanCategory::Cost
  }

  fn severity(&self) -> FindingSeverity {
    FindingSeverity::Low
  }

  fn evaluate(&self, nodes: &[Node]) -> Option<ScanFinding> {
    let affected: Vec<&Node> = nodes
      .iter()
      .filter(|n| n.kind == NodeKind::Ai && !n.config.has_any(&["maxTokens"]))
      .collect();

    finding_for(
      self,
      FindingText {
        title: "No token limit on AI output",
        recommendation: "Set maxTokens to the longest output the step needs.",
        auto_fixable: true,
      },
      &affected,
      format!("{} have no output token limit.", node_list(&affected)),
      FindingImpact::per_node(affected.len(), 0.3, 150, 0.0),
    )
  }
}
