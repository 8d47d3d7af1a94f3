//! [`SqliteStore`] — the SQLite implementation of [`GreetingStore`].

use std::path::Path;

use guestbook_core::{
  greeting::{Greeting, NewGreeting},
  store::GreetingStore,
};
use rusqlite::{OptionalExtension as _, Row};

use crate::{Error, Result, schema::SCHEMA};

const GREETING_COLUMNS: &str = "id, name, message, timestamp, ip_address";

fn greeting_from_row(row: &Row<'_>) -> rusqlite::Result<Greeting> {
  Ok(Greeting {
    id:         row.get(0)?,
    name:       row.get(1)?,
    message:    row.get(2)?,
    timestamp:  row.get(3)?,
    ip_address: row.get(4)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A guestbook store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Every
/// statement runs on the connection's own thread, one at a time, so id
/// assignment is serialised across concurrent callers.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::debug!("greetings schema ready");
    Ok(())
  }
}

// ─── GreetingStore impl ──────────────────────────────────────────────────────

impl GreetingStore for SqliteStore {
  type Error = Error;

  async fn insert(&self, input: NewGreeting) -> Result<Greeting> {
    // Insert and read-back are one statement, so the returned row is
    // exactly the one this call created.
    let greeting = self
      .conn
      .call(move |conn| {
        let greeting = conn.query_row(
          &format!(
            "INSERT INTO greetings (name, message, timestamp, ip_address)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING {GREETING_COLUMNS}"
          ),
          rusqlite::params![
            input.name,
            input.message,
            input.timestamp,
            input.ip_address,
          ],
          greeting_from_row,
        )?;
        Ok(greeting)
      })
      .await?;

    Ok(greeting)
  }

  async fn list_recent(&self, limit: usize) -> Result<Vec<Greeting>> {
    let limit_val = i64::try_from(limit).unwrap_or(i64::MAX);

    let greetings = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {GREETING_COLUMNS}
           FROM greetings
           ORDER BY timestamp DESC, id DESC
           LIMIT ?1"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val], greeting_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(greetings)
  }

  async fn count_since(&self, ip_address: &str, since: i64) -> Result<u64> {
    let ip = ip_address.to_owned();

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM greetings
           WHERE ip_address = ?1 AND timestamp > ?2",
          rusqlite::params![ip, since],
          |row| row.get(0),
        )?)
      })
      .await?;

    u64::try_from(count).map_err(|_| Error::CountOutOfRange(count))
  }

  async fn most_recent_from(
    &self,
    ip_address: &str,
    since: i64,
  ) -> Result<Option<Greeting>> {
    let ip = ip_address.to_owned();

    let greeting = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {GREETING_COLUMNS}
                 FROM greetings
                 WHERE ip_address = ?1 AND timestamp > ?2
                 ORDER BY timestamp DESC, id DESC
                 LIMIT 1"
              ),
              rusqlite::params![ip, since],
              greeting_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    Ok(greeting)
  }
}
