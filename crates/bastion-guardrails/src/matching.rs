use regex::{RegexSet, RegexSetBuilder};

/// Whole-word, case-insensitive matcher over a fixed list of terms.
///
/// A trailing plural "s" is tolerated, so "patient" matches "patients" while
/// "ai" does not match "email".
#[derive(Debug, Clone)]
pub struct TermMatcher {
  set: RegexSet,
  /// Position in the caller's term list of each pattern in `set`.
  positions: Vec<usize>,
}

impl TermMatcher {
  pub fn new<S: AsRef<str>>(terms: &[S]) -> Result<Self, regex::Error> {
    let (positions, patterns): (Vec<usize>, Vec<String>) = terms
      .iter()
      .map(|term| term.as_ref())
      .enumerate()
      .filter(|(_, term)| !term.is_empty())
      .map(|(i, term)| (i, format!(r"\b{}s?\b", regex::escape(term))))
      .unzip();
    let set = RegexSetBuilder::new(patterns)
      .case_insensitive(true)
      .build()?;
    Ok(Self { set, positions })
  }

  pub fn is_match(&self, text: &str) -> bool {
    self.set.is_match(text)
  }

  /// Indices of the terms found in `text`, ascending.
  pub fn matches(&self, text: &str) -> Vec<usize> {
    self
      .set
      .matches(text)
      .into_iter()
      .map(|i| self.positions[i])
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn matcher(terms: &[&str]) -> TermMatcher {
    TermMatcher::new(terms).unwrap()
  }

  #[test]
  fn test_whole_words_only() {
    let ai = matcher(&["ai"]);
    assert!(ai.is_match("summarize with ai"));
    assert!(!ai.is_match("send email"));
    assert!(!ai.is_match("maintain records"));
  }

  #[test]
  fn test_plural_suffix() {
    let patient = matcher(&["patient"]);
    assert!(patient.is_match("notify patients"));
    assert!(!patient.is_match("patientportal"));
  }

  #[test]
  fn test_multi_word_terms() {
    assert!(matcher(&["credit card"]).is_match("validate credit card number"));
    assert!(!matcher(&["card number"]).is_match("validate credit-cardnumber"));
  }

  #[test]
  fn test_later_occurrence_matches() {
    assert!(matcher(&["token"]).is_match("tokenization token"));
  }

  #[test]
  fn test_case_insensitive() {
    assert!(matcher(&["stripe"]).is_match("Stripe Webhook"));
  }

  #[test]
  fn test_terms_are_literal() {
    let m = matcher(&["soc 2", "a.b"]);
    assert!(m.is_match("soc 2 report"));
    assert!(!m.is_match("axb"));
    assert!(m.is_match("a.b"));
  }

  #[test]
  fn test_matches_report_term_indices() {
    let m = matcher(&["", "patient", "webhook", "treatment"]);
    assert!(!m.is_match(""));
    assert_eq!(m.matches("treatment plan for patients"), vec![1, 3]);
  }
}
