use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::GuardrailError;
use crate::matching::TermMatcher;
use crate::standards::ComplianceStandard;

/// Context tags that mark a rule as protecting the workflow's entry point.
pub const ENTRY_POINT_TAGS: &[&str] = &["webhook", "trigger", "incoming request", "endpoint"];

/// Guardrail severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
  Low,
  Medium,
  High,
  Critical,
}

impl Severity {
  pub fn as_str(&self) -> &'static str {
    match self {
      Severity::Low => "low",
      Severity::Medium => "medium",
      Severity::High => "high",
      Severity::Critical => "critical",
    }
  }
}

impl fmt::Display for Severity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A protective rule that can be injected into a workflow as a guardrail node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardrailRule {
  pub id: String,
  pub name: String,
  /// What situation the rule guards against.
  pub trigger: String,
  /// What the injected node does.
  pub action: String,
  /// Terms matched against node text.
  pub context: Vec<String>,
  pub severity: Severity,
  pub standards: Vec<ComplianceStandard>,
  pub description: String,
  pub config_template: Value,
}

impl GuardrailRule {
  /// True if the rule guards the workflow's entry point.
  pub fn targets_entry_point(&self) -> bool {
    self
      .context
      .iter()
      .any(|tag| ENTRY_POINT_TAGS.contains(&tag.as_str()))
  }

  pub fn covers(&self, standard: ComplianceStandard) -> bool {
    self.standards.contains(&standard)
  }

  fn matcher(&self) -> Result<TermMatcher, GuardrailError> {
    TermMatcher::new(self.context.as_slice()).map_err(|source| GuardrailError::InvalidContext {
      rule_id: self.id.clone(),
      source,
    })
  }
}

/// Ordered catalog of guardrail rules.
///
/// Selection preserves registry order, so the order rules are declared in is
/// the order guardrails are injected in.
///
/// Each rule's context tags are compiled once, when the registry is built.
#[derive(Debug, Clone)]
pub struct GuardrailRegistry {
  rules: Vec<GuardrailRule>,
  matchers: Vec<TermMatcher>,
}

static BUILTIN: LazyLock<GuardrailRegistry> = LazyLock::new(|| {
  GuardrailRegistry::new(builtin_rules()).expect("built-in context tags are literal terms")
});

impl GuardrailRegistry {
  pub fn new(rules: Vec<GuardrailRule>) -> Result<Self, GuardrailError> {
    let matchers = rules
      .iter()
      .map(GuardrailRule::matcher)
      .collect::<Result<Vec<_>, _>>()?;
    Ok(Self { rules, matchers })
  }

  /// The built-in catalog, constructed once per process.
  pub fn builtin() -> &'static GuardrailRegistry {
    &BUILTIN
  }

  pub fn rules(&self) -> &[GuardrailRule] {
    &self.rules
  }

  pub fn get(&self, rule_id: &str) -> Option<&GuardrailRule> {
    self.rules.iter().find(|r| r.id == rule_id)
  }

  /// Rules paired with their compiled context matchers, in registry order.
  pub(crate) fn entries(&self) -> impl Iterator<Item = (&GuardrailRule, &TermMatcher)> {
    self.rules.iter().zip(&self.matchers)
  }

  /// Context tags of `rule_id` present in `text`, in declaration order.
  pub fn matching_tags(&self, rule_id: &str, text: &str) -> Vec<&str> {
    self
      .entries()
      .find(|(rule, _)| rule.id == rule_id)
      .map(|(rule, matcher)| tags_in(rule, matcher, text))
      .unwrap_or_default()
  }
}

pub(crate) fn tags_in<'r>(
  rule: &'r GuardrailRule,
  matcher: &TermMatcher,
  text: &str,
) -> Vec<&'r str> {
  matcher
    .matches(text)
    .into_iter()
    .map(|i| rule.context[i].as_str())
    .collect()
}

struct RuleSpec {
  id: &'static str,
  name: &'static str,
  trigger: &'static str,
  action: &'static str,
  context: &'static [&'static str],
  severity: Severity,
  standards: &'static [ComplianceStandard],
  description: &'static str,
}

impl RuleSpec {
  fn build(self, config_template: Value) -> GuardrailRule {
    GuardrailRule {
      id: self.id.to_string(),
      name: self.name.to_string(),
      trigger: self.trigger.to_string(),
      action: self.action.to_string(),
      context: self.context.iter().map(|t| t.to_string()).collect(),
      severity: self.severity,
      standards: self.standards.to_vec(),
      description: self.description.to_string(),
      config_template,
    }
  }
}

fn builtin_rules() -> Vec<GuardrailRule> {
  use ComplianceStandard::*;

  vec![
    RuleSpec {
      id: "pii-redaction",
      name: "PII Redaction",
      trigger: "Personal identifiers flow between nodes",
      action: "Mask personal identifiers before downstream processing",
      context: &[
        "email",
        "personal data",
        "personal information",
        "pii",
        "phone number",
        "home address",
        "user profile",
        "customer",
      ],
      severity: Severity::High,
      standards: &[Gdpr, Hipaa],
      description: "Redacts personal data fields so only the minimum necessary leaves the workflow.",
    }
    .build(json!({
      "mode": "mask",
      "fields": ["email", "phone", "address", "name"],
      "maskCharacter": "*"
    })),
    RuleSpec {
      id: "consent-verification",
      name: "Consent Verification",
      trigger: "Personal data is used for marketing or tracking",
      action: "Check recorded consent before processing",
      context: &["consent", "marketing", "newsletter", "subscriber", "tracking"],
      severity: Severity::Medium,
      standards: &[Gdpr],
      description: "Halts processing for subjects without a recorded lawful basis.",
    }
    .build(json!({
      "consentSource": "crm",
      "onMissingConsent": "skip"
    })),
    RuleSpec {
      id: "data-retention",
      name: "Data Retention Policy",
      trigger: "Regulated data is persisted",
      action: "Attach retention period and schedule deletion",
      context: &["store", "database", "archive", "retain", "save", "record"],
      severity: Severity::Medium,
      standards: &[Gdpr, Hipaa],
      description: "Enforces a maximum retention window on stored regulated records.",
    }
    .build(json!({
      "retentionDays": 365,
      "action": "delete"
    })),
    RuleSpec {
      id: "right-to-erasure",
      name: "Right to Erasure",
      trigger: "Subjects can request account or data deletion",
      action: "Propagate deletion requests to every data store",
      context: &["delete", "erase", "unsubscribe", "account deletion"],
      severity: Severity::Medium,
      standards: &[Gdpr],
      description: "Ensures erasure requests reach all systems that hold subject data.",
    }
    .build(json!({
      "propagate": true,
      "confirmationRequired": true
    })),
    RuleSpec {
      id: "phi-access-control",
      name: "PHI Access Control",
      trigger: "Protected health information is read or written",
      action: "Require authorized role and minimum-necessary access",
      context: &[
        "patient",
        "medical",
        "health",
        "diagnosis",
        "clinical",
        "prescription",
        "ehr",
        "treatment",
      ],
      severity: Severity::Critical,
      standards: &[Hipaa],
      description: "Blocks access to health records from nodes without an authorized role.",
    }
    .build(json!({
      "allowedRoles": ["guardian", "auditor"],
      "minimumNecessary": true,
      "encryptAtRest": true
    })),
    RuleSpec {
      id: "phi-audit-trail",
      name: "PHI Audit Trail",
      trigger: "Health records are accessed",
      action: "Record who accessed which record and when",
      context: &["patient", "medical record", "diagnosis", "treatment", "lab result"],
      severity: Severity::High,
      standards: &[Hipaa],
      description: "Writes an immutable access log entry for each health record touched.",
    }
    .build(json!({
      "logFields": ["actor", "recordId", "action", "timestamp"],
      "immutable": true
    })),
    RuleSpec {
      id: "card-data-tokenization",
      name: "Card Data Tokenization",
      trigger: "Raw card data enters the workflow",
      action: "Replace card numbers with processor tokens",
      context: &["credit card", "debit card", "card number", "cvv", "payment"],
      severity: Severity::Critical,
      standards: &[PciDss],
      description: "Keeps primary account numbers out of workflow state and logs.",
    }
    .build(json!({
      "tokenizer": "processor",
      "dropFields": ["cvv", "cardNumber"]
    })),
    RuleSpec {
      id: "payment-fraud-screening",
      name: "Payment Fraud Screening",
      trigger: "Money moves as a result of the workflow",
      action: "Score the transaction and hold suspicious ones",
      context: &["payment", "checkout", "transaction", "refund", "charge"],
      severity: Severity::High,
      standards: &[PciDss],
      description: "Holds transactions above the fraud threshold for manual review.",
    }
    .build(json!({
      "threshold": 0.8,
      "onSuspicious": "hold"
    })),
    RuleSpec {
      id: "webhook-signature-validation",
      name: "Webhook Signature Validation",
      trigger: "The workflow accepts inbound requests",
      action: "Verify request signatures before any processing",
      context: &["webhook", "incoming request", "callback"],
      severity: Severity::High,
      standards: &[Soc2],
      description: "Rejects inbound requests whose signature does not verify.",
    }
    .build(json!({
      "algorithm": "hmac-sha256",
      "header": "X-Signature",
      "toleranceSeconds": 300
    })),
    RuleSpec {
      id: "rate-limiter",
      name: "Rate Limiter",
      trigger: "The workflow is reachable from outside",
      action: "Throttle executions per caller",
      context: &["webhook", "api", "endpoint", "incoming request", "trigger"],
      severity: Severity::Medium,
      standards: &[Soc2],
      description: "Caps executions per caller to contain abuse and runaway loops.",
    }
    .build(json!({
      "maxRequests": 100,
      "windowSeconds": 60
    })),
    RuleSpec {
      id: "secret-management",
      name: "Secret Management",
      trigger: "Credentials are used by a node",
      action: "Resolve credentials from the vault at runtime",
      context: &["api key", "password", "secret", "credential", "token"],
      severity: Severity::Critical,
      standards: &[Soc2, PciDss],
      description: "Keeps credentials out of node configuration and execution logs.",
    }
    .build(json!({
      "source": "vault",
      "redactInLogs": true
    })),
    RuleSpec {
      id: "ai-output-moderation",
      name: "AI Output Moderation",
      trigger: "Model output is forwarded to people or systems",
      action: "Screen model output for leaked data and unsafe content",
      context: &["ai", "llm", "gpt", "openai", "chatbot", "generate"],
      severity: Severity::Medium,
      standards: &[Soc2, Gdpr],
      description: "Filters generated content before it leaves the workflow.",
    }
    .build(json!({
      "checks": ["pii", "toxicity"],
      "onViolation": "block"
    })),
    RuleSpec {
      id: "input-validation",
      name: "Input Validation",
      trigger: "User-supplied input enters the workflow",
      action: "Validate input against a schema",
      context: &["form", "input", "upload", "submission"],
      severity: Severity::Medium,
      standards: &[Soc2],
      description: "Rejects malformed or oversized input before it reaches business logic.",
    }
    .build(json!({
      "maxBytes": 1048576,
      "rejectUnknownFields": true
    })),
  ]
}
