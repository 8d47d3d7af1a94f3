//! Input validation for greeting submissions.
//!
//! Checks run in a fixed order: presence, length, then the content
//! denylist. The denylist is an abuse-reduction heuristic with expected
//! false positives; it is not a substitute for parameterised statements in
//! the store.

use std::sync::LazyLock;

use regex::{RegexSet, RegexSetBuilder};

use crate::{
  Error, Result,
  greeting::{MAX_MESSAGE_CHARS, MAX_NAME_CHARS},
};

static SUSPICIOUS_PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
  RegexSetBuilder::new([
    // SQL keywords as whole words
    r"\b(?:select|insert|update|delete|drop|create|alter|exec|union|script)\b",
    // SQL comment and statement separators
    r"--|;|/\*|\*/",
    // extended / system stored procedures
    r"\b(?:xp|sp)_",
    r"<\s*/?\s*script\b",
    r"javascript\s*:",
    // inline event handlers, e.g. `onerror=`
    r"\bon[a-z]+\s*=",
  ])
  .case_insensitive(true)
  .build()
  .expect("denylist patterns are valid")
});

/// A name/message pair that passed every content check, already trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
  pub name:    String,
  pub message: String,
}

/// Validate a raw submission.
///
/// Surrounding whitespace is trimmed before any check, and the trimmed
/// values are what gets returned.
pub fn validate(name: &str, message: &str) -> Result<Submission> {
  let name = name.trim();
  let message = message.trim();

  if name.is_empty() || message.is_empty() {
    return Err(Error::MissingField);
  }

  if name.chars().count() > MAX_NAME_CHARS
    || message.chars().count() > MAX_MESSAGE_CHARS
  {
    return Err(Error::TooLong);
  }

  if is_suspicious(name) || is_suspicious(message) {
    return Err(Error::SuspiciousContent);
  }

  Ok(Submission { name: name.to_owned(), message: message.to_owned() })
}

/// Whether `text` matches any entry of the content denylist.
pub fn is_suspicious(text: &str) -> bool { SUSPICIOUS_PATTERNS.is_match(text) }

/// Canonical form used for duplicate detection: trimmed and case-folded.
pub fn normalize_message(message: &str) -> String {
  message.trim().to_lowercase()
}

/// Whether `incoming` repeats `previous` once both are normalised.
pub fn is_duplicate(previous: &str, incoming: &str) -> bool {
  normalize_message(previous) == normalize_message(incoming)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_plain_greeting_and_trims() {
    let sub = validate("  Sam ", "\tCongrats!\n").unwrap();
    assert_eq!(sub.name, "Sam");
    assert_eq!(sub.message, "Congrats!");
  }

  #[test]
  fn rejects_blank_fields() {
    assert_eq!(validate("", "hello"), Err(Error::MissingField));
    assert_eq!(validate("Sam", "   "), Err(Error::MissingField));
  }

  #[test]
  fn length_limits_count_characters_not_bytes() {
    let name = "é".repeat(MAX_NAME_CHARS);
    assert!(validate(&name, "hi").is_ok());

    // Outside the BMP: two UTF-16 units each, still one character.
    let name = "🎉".repeat(MAX_NAME_CHARS);
    assert!(validate(&name, "hi").is_ok());
    let name = "🎉".repeat(MAX_NAME_CHARS + 1);
    assert_eq!(validate(&name, "hi"), Err(Error::TooLong));

    let name = "a".repeat(MAX_NAME_CHARS + 1);
    assert_eq!(validate(&name, "hi"), Err(Error::TooLong));

    let message = "b".repeat(MAX_MESSAGE_CHARS + 1);
    assert_eq!(validate("Sam", &message), Err(Error::TooLong));
  }

  #[test]
  fn missing_check_runs_before_length_check() {
    let message = "b".repeat(MAX_MESSAGE_CHARS + 1);
    assert_eq!(validate(" ", &message), Err(Error::MissingField));
  }

  #[test]
  fn denylist_catches_sql_injection() {
    assert_eq!(
      validate("Sam", "\"; DROP TABLE greetings;--\""),
      Err(Error::SuspiciousContent)
    );
    assert!(is_suspicious("1 UNION select 2"));
    assert!(is_suspicious("exec xp_cmdshell"));
    assert!(is_suspicious("call sp_who"));
    assert!(is_suspicious("a /* comment */"));
  }

  #[test]
  fn denylist_catches_script_injection() {
    assert!(is_suspicious("<script>alert(1)</script>"));
    assert!(is_suspicious("< SCRIPT src=x>"));
    assert!(is_suspicious("JavaScript:alert(1)"));
    assert!(is_suspicious("<img src=x onerror=alert(1)>"));
    assert!(is_suspicious("<body ONLOAD = go()>"));
  }

  #[test]
  fn keywords_only_match_whole_words() {
    assert!(!is_suspicious("Selected as best couple"));
    assert!(!is_suspicious("Dropping by to say hi"));
    assert!(!is_suspicious("Updates please!"));
    assert!(!is_suspicious("Happy wedding, wasp_free garden"));
  }

  #[test]
  fn ordinary_messages_pass() {
    for message in [
      "Congrats!",
      "Semoga bahagia selalu :)",
      "Wishing you both a lifetime of love & laughter.",
      "It's a great day - enjoy it",
    ] {
      assert!(!is_suspicious(message), "{message}");
    }
  }

  #[test]
  fn duplicate_ignores_case_and_surrounding_whitespace() {
    assert!(is_duplicate("Congrats!", "  congrats!  "));
    assert!(!is_duplicate("Congrats!", "Congrats!!"));
  }
}
