//! Analysis events and notifiers.
//!
//! Events are emitted while the pipeline runs so consumers can build an audit
//! trail or stream progress without parsing log output.

use std::sync::mpsc;

use bastion_guardrails::{ComplianceStandard, RiskLevel};
use bastion_roles::{Permission, Role};
use serde::{Deserialize, Serialize};

/// Events emitted during an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnalysisEvent {
  /// Analysis of a workflow has started.
  AnalysisStarted {
    analysis_id: String,
    workflow_name: String,
    node_count: usize,
  },

  /// Compliance detection finished.
  StandardsDetected {
    analysis_id: String,
    standards: Vec<ComplianceStandard>,
  },

  /// A guardrail node was appended to the graph.
  GuardrailInjected {
    analysis_id: String,
    rule_id: String,
    node_id: String,
  },

  /// A node requested a capability its role does not grant.
  ViolationDetected {
    analysis_id: String,
    node_id: String,
    role: Role,
    permission: Permission,
  },

  /// Analysis completed and produced a report.
  AnalysisCompleted {
    analysis_id: String,
    risk_score: u8,
    risk_level: RiskLevel,
  },

  /// Analysis aborted on malformed input. `error` carries the full cause chain.
  AnalysisFailed { analysis_id: String, error: String },
}

/// Receives events from the engine.
pub trait AnalysisNotifier: Send + Sync {
  fn notify(&self, event: AnalysisEvent);
}

/// Discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl AnalysisNotifier for NoopNotifier {
  fn notify(&self, _event: AnalysisEvent) {}
}

/// Forwards events to a channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
  sender: mpsc::Sender<AnalysisEvent>,
}

impl ChannelNotifier {
  pub fn new(sender: mpsc::Sender<AnalysisEvent>) -> Self {
    Self { sender }
  }
}

impl AnalysisNotifier for ChannelNotifier {
  fn notify(&self, event: AnalysisEvent) {
    // Receiver may have been dropped
    let _ = self.sender.send(event);
  }
}
