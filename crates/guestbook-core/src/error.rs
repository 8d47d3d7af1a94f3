//! Error types for `guestbook-core`.
//!
//! Every variant is a client-side input problem; the display strings are
//! returned to callers as-is.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("Name and message are required")]
  MissingField,

  #[error("Name or message too long")]
  TooLong,

  #[error("Invalid characters detected")]
  SuspiciousContent,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
