//! Error type for `guestbook-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A row count that does not fit the caller's integer type.
  #[error("count out of range: {0}")]
  CountOutOfRange(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
