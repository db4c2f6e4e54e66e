//! Built-in scan rules, three per category.

mod cost;
mod performance;
mod reliability;
mod scalability;
mod security;

use bastion_config::ScanSettings;
use bastion_workflow::{Node, NodeKind};

use crate::rule::ScanRule;

pub(crate) const CACHE_KEYS: &[&str] = &["cache", "cacheEnabled", "cacheTtl"];
pub(crate) const RETRY_KEYS: &[&str] = &["retry", "retries", "maxRetries", "retryPolicy"];
pub(crate) const TIMEOUT_KEYS: &[&str] = &["timeout", "timeoutMs", "timeoutSeconds"];
pub(crate) const RATE_LIMIT_KEYS: &[&str] = &["rateLimit", "throttle"];
pub(crate) const ERROR_HANDLER_KEYS: &[&str] = &["errorHandler", "onError", "fallback"];

/// The built-in rule set in category order.
pub fn builtin_rules(settings: &ScanSettings) -> Vec<Box<dyn ScanRule>> {
  vec![
    Box::new(performance::UncachedAiCall),
    Box::new(performance::SequentialExternalCalls),
    Box::new(performance::UnbatchedDataAccess),
    Box::new(cost::PremiumModelUsage {
      settings: settings.clone(),
    }),
    Box::new(cost::AggressivePolling {
      min_interval_seconds: settings.min_poll_interval_seconds,
    }),
    Box::new(cost::UnboundedAiTokens),
    Box::new(reliability::MissingRetry),
    Box::new(reliability::MissingTimeout),
    Box::new(reliability::MissingErrorHandling),
    Box::new(security::HardcodedSecret),
    Box::new(security::UnverifiedWebhook),
    Box::new(security::InsecureTransport),
    Box::new(scalability::MissingRateLimit),
    Box::new(scalability::UnboundedFanOut),
    Box::new(scalability::OversizedWorkflow {
      max_nodes: settings.max_recommended_nodes,
    }),
  ]
}

/// Nodes that call out of the workflow or into a model and so can hang or fail.
pub(crate) fn is_remote_call(node: &Node) -> bool {
  node.kind.is_side_effecting() || node.kind == NodeKind::Ai
}

/// True if a guardrail injected from `rule_id` is present.
pub(crate) fn has_guardrail(nodes: &[Node], rule_id: &str) -> bool {
  nodes
    .iter()
    .any(|n| n.is_guardrail() && n.config.guardrail_rule.as_deref() == Some(rule_id))
}

#[cfg(test)]
pub(crate) mod test_support {
  use bastion_workflow::{Node, NodeConfig, NodeKind, Position};
  use serde_json::Value;

  pub fn node(id: &str, kind: NodeKind, title: &str) -> Node {
    Node {
      id: id.to_string(),
      kind,
      title: title.to_string(),
      description: String::new(),
      position: Position::default(),
      config: NodeConfig::default(),
    }
  }

  pub fn with(mut node: Node, key: &str, value: impl Into<Value>) -> Node {
    node.config.settings.insert(key.to_string(), value.into());
    node
  }
}
