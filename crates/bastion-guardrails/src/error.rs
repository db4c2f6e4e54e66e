use thiserror::Error;

/// Errors that can occur while building a guardrail registry.
#[derive(Debug, Error)]
pub enum GuardrailError {
  /// A rule's context tags could not be compiled into a matcher.
  #[error("invalid context tags on rule '{rule_id}'")]
  InvalidContext {
    rule_id: String,
    #[source]
    source: regex::Error,
  },
}
