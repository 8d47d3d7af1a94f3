//! Greeting — a single guest submission.
//!
//! Greetings are append-only: once the store assigns an `id` the record is
//! never updated or deleted.

use serde::{Deserialize, Serialize};

/// Maximum length of a greeting's `name`, in characters.
///
/// Characters are Unicode scalar values (`str::chars`), not bytes or UTF-16
/// code units: an emoji outside the BMP counts once.
pub const MAX_NAME_CHARS: usize = 100;

/// Maximum length of a greeting's `message`, in characters, counted the same
/// way as [`MAX_NAME_CHARS`].
pub const MAX_MESSAGE_CHARS: usize = 500;

/// A persisted greeting.
///
/// `ip_address` is kept for abuse control and is never serialised back to
/// clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Greeting {
  /// Store-assigned, strictly increasing with insertion order.
  pub id:         i64,
  pub name:       String,
  pub message:    String,
  /// Milliseconds since the Unix epoch; server-assigned.
  pub timestamp:  i64,
  #[serde(skip_serializing, default)]
  pub ip_address: String,
}

/// Input for [`GreetingStore::insert`](crate::store::GreetingStore::insert).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGreeting {
  pub name:       String,
  pub message:    String,
  pub timestamp:  i64,
  pub ip_address: String,
}
