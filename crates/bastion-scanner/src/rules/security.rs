use bastion_workflow::{Node, NodeKind};
use serde_json::Value;

use super::has_guardrail;
use crate::finding::{FindingImpact, FindingSeverity, ScanCategory, ScanFinding};
use crate::rule::{FindingText, ScanRule, finding_for, node_list};

/// Setting names (lower-cased, `_`/`-` stripped) that hold credentials.
const SECRET_KEY_SUFFIXES: &[&str] = &[
  "password",
  "apikey",
  "secret",
  "token",
  "credential",
  "credentials",
  "privatekey",
];

/// Value prefixes that reference a secret instead of embedding it.
const SECRET_REFERENCE_PREFIXES: &[&str] = &["{{", "${", "$", "vault:", "env:"];

const URL_KEYS: &[&str] = &["url", "endpoint", "baseUrl", "webhookUrl"];

const WEBHOOK_AUTH_KEYS: &[&str] = &[
  "signatureVerification",
  "authentication",
  "auth",
  "secretHeader",
];

pub struct HardcodedSecret;

fn is_secret_key(key: &str) -> bool {
  let normalized: String = key
    .chars()
    .filter(|c| *c != '_' && *c != '-')
    .flat_map(char::to_lowercase)
    .collect();
  SECRET_KEY_SUFFIXES
    .iter()
    .any(|suffix| normalized.ends_with(suffix))
}

fn is_literal_secret(value: &Value) -> bool {
  match value {
    Value::String(s) => {
      let s = s.trim();
      !s.is_empty() && !SECRET_REFERENCE_PREFIXES.iter().any(|p| s.starts_with(p))
    }
    _ => false,
  }
}

impl ScanRule for HardcodedSecret {
  fn id(&self) -> &'static str {
    "hardcoded-secret"
  }

  fn category(&self) -> ScanCategory {
    ScanCategory::Security
  }

  fn severity(&self) -> FindingSeverity {
    FindingSeverity::Critical
  }

  fn evaluate(&self, nodes: &[Node]) -> Option<ScanFinding> {
    let affected: Vec<&Node> = nodes
      .iter()
      .filter(|n| {
        n.config
          .settings
          .iter()
          .any(|(key, value)| is_secret_key(key) && is_literal_secret(value))
      })
      .collect();

    finding_for(
      self,
      FindingText {
        title: "Hardcoded credentials",
        recommendation: "Move credentials to the secret store and reference them by name.",
        auto_fixable: false,
      },
      &affected,
      format!(
        "{} embed a credential directly in node configuration.",
        node_list(&affected)
      ),
      FindingImpact::default(),
    )
  }
}

/// Webhook triggers that accept unauthenticated requests.
pub struct UnverifiedWebhook;

fn is_webhook_trigger(node: &Node) -> bool {
  node.kind == NodeKind::Trigger
    && (node.config.setting_str("triggerType") == Some("webhook") || node.text().contains("webhook"))
}

impl ScanRule for UnverifiedWebhook {
  fn id(&self) -> &'static str {
    "unverified-webhook"
  }

  fn category(&self) -> ScanCategory {
    ScanCategory::Security
  }

  fn severity(&self) -> FindingSeverity {
    FindingSeverity::High
  }

  fn evaluate(&self, nodes: &[Node]) -> Option<ScanFinding> {
    if has_guardrail(nodes, "webhook-signature-validation") {
      return None;
    }

    let affected: Vec<&Node> = nodes
      .iter()
      .filter(|n| is_webhook_trigger(n) && !n.config.has_any(WEBHOOK_AUTH_KEYS))
      .collect();

    finding_for(
      self,
      FindingText {
        title: "Unverified webhook",
        recommendation: "Verify request signatures or require authentication on the webhook.",
        auto_fixable: true,
      },
      &affected,
      format!(
        "{} accept requests from anyone who knows the URL.",
        node_list(&affected)
      ),
      FindingImpact::default(),
    )
  }
}

/// Plain-HTTP endpoints outside the local machine.
pub struct InsecureTransport;

fn is_insecure_url(value: &str) -> bool {
  let value = value.trim().to_lowercase();
  let Some(rest) = value.strip_prefix("http://") else {
    return false;
  };
  !(rest.starts_with("localhost") || rest.starts_with("127.0.0.1"))
}

impl ScanRule for InsecureTransport {
  fn id(&self) -> &'static str {
    "insecure-transport"
  }

  fn category(&self) -> ScanCategory {
    ScanCategory::Security
  }

  fn severity(&self) -> FindingSeverity {
    FindingSeverity::High
  }

  fn evaluate(&self, nodes: &[Node]) -> Option<ScanFinding> {
    let affected: Vec<&Node> = nodes
      .iter()
      .filter(|n| {
        URL_KEYS
          .iter()
          .filter_map(|key| n.config.setting_str(key))
          .any(is_insecure_url)
      })
      .collect();

    finding_for(
      self,
      FindingText {
        title: "Unencrypted transport",
        recommendation: "Switch the endpoint to HTTPS.",
        auto_fixable: true,
      },
      &affected,
      format!("{} send data over plain HTTP.", node_list(&affected)),
      FindingImpact::default(),
    )
  }
}
