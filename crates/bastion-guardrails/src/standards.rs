use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use bastion_workflow::Node;
use serde::{Deserialize, Serialize};

use crate::matching::TermMatcher;

/// A regulatory or contractual regime that imposes required controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStandard {
  /// Data protection (GDPR).
  Gdpr,
  /// Health data (HIPAA).
  Hipaa,
  /// Payment card data (PCI DSS).
  PciDss,
  /// General security controls (SOC 2).
  Soc2,
}

impl ComplianceStandard {
  pub const ALL: [ComplianceStandard; 4] = [
    ComplianceStandard::Gdpr,
    ComplianceStandard::Hipaa,
    ComplianceStandard::PciDss,
    ComplianceStandard::Soc2,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      ComplianceStandard::Gdpr => "GDPR",
      ComplianceStandard::Hipaa => "HIPAA",
      ComplianceStandard::PciDss => "PCI-DSS",
      ComplianceStandard::Soc2 => "SOC2",
    }
  }

  /// Terms whose presence in node text signals data governed by this standard.
  pub fn keywords(&self) -> &'static [&'static str] {
    match self {
      ComplianceStandard::Gdpr => &[
        "personal data",
        "personal information",
        "pii",
        "gdpr",
        "consent",
        "email",
        "e-mail",
        "customer",
        "user profile",
        "phone number",
        "home address",
        "newsletter",
        "marketing",
        "subscriber",
      ],
      ComplianceStandard::Hipaa => &[
        "patient",
        "medical",
        "health",
        "healthcare",
        "diagnosis",
        "hipaa",
        "phi",
        "clinical",
        "prescription",
        "treatment",
        "ehr",
        "lab result",
      ],
      ComplianceStandard::PciDss => &[
        "payment",
        "credit card",
        "debit card",
        "card number",
        "cvv",
        "pci",
        "stripe",
        "checkout",
        "billing",
        "invoice",
        "refund",
      ],
      ComplianceStandard::Soc2 => &[
        "api key",
        "password",
        "secret",
        "credential",
        "token",
        "webhook",
        "authentication",
        "login",
        "database",
        "access control",
        "soc2",
        "soc 2",
      ],
    }
  }
}

/// One compiled keyword matcher per standard, in `ComplianceStandard::ALL` order.
static KEYWORD_MATCHERS: LazyLock<[TermMatcher; 4]> = LazyLock::new(|| {
  ComplianceStandard::ALL.map(|standard| {
    TermMatcher::new(standard.keywords()).expect("standard keywords are literal terms")
  })
});

impl ComplianceStandard {
  fn matcher(&self) -> &'static TermMatcher {
    &KEYWORD_MATCHERS[*self as usize]
  }

  /// True if `text` mentions one of this standard's keywords.
  pub fn is_mentioned_in(&self, text: &str) -> bool {
    self.matcher().is_match(text)
  }
}

impl fmt::Display for ComplianceStandard {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Detect which compliance standards apply to a set of nodes.
///
/// The result is the union across all nodes. Guardrail nodes are skipped so
/// that detection over an augmented graph matches detection over the original.
pub fn detect_standards(nodes: &[Node]) -> BTreeSet<ComplianceStandard> {
  let mut detected = BTreeSet::new();

  for node in nodes.iter().filter(|n| !n.is_guardrail()) {
    let text = node.text();
    for standard in ComplianceStandard::ALL {
      if detected.contains(&standard) {
        continue;
      }
      if standard.is_mentioned_in(&text) {
        detected.insert(standard);
      }
    }
    if detected.len() == ComplianceStandard::ALL.len() {
      break;
    }
  }

  detected
}
