//! The `GreetingStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `guestbook-store-sqlite`). The HTTP service depends on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::greeting::{Greeting, NewGreeting};

/// Abstraction over a guestbook storage backend.
///
/// The contract is append-and-read-only: there is no update or delete.
/// Implementations must assign ids atomically so that concurrent inserts
/// never share an id, and an inserted record must be visible to the next
/// read.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait GreetingStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Append a greeting and return it with its assigned id.
  fn insert(
    &self,
    input: NewGreeting,
  ) -> impl Future<Output = Result<Greeting, Self::Error>> + Send + '_;

  /// Up to `limit` greetings, newest `timestamp` first. Ties are broken by
  /// the higher id first.
  fn list_recent(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Greeting>, Self::Error>> + Send + '_;

  /// Number of greetings from `ip_address` with `timestamp > since`.
  fn count_since<'a>(
    &'a self,
    ip_address: &'a str,
    since: i64,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  /// The latest greeting from `ip_address` with `timestamp > since`.
  fn most_recent_from<'a>(
    &'a self,
    ip_address: &'a str,
    since: i64,
  ) -> impl Future<Output = Result<Option<Greeting>, Self::Error>> + Send + 'a;
}
