//! SQL schema for the guestbook SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Greetings are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
-- AUTOINCREMENT keeps ids from being reused.
CREATE TABLE IF NOT EXISTS greetings (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT    NOT NULL,
    message     TEXT    NOT NULL,
    timestamp   INTEGER NOT NULL,   -- epoch millis; server-assigned
    ip_address  TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS greetings_recent_idx
    ON greetings(timestamp DESC, id DESC);
CREATE INDEX IF NOT EXISTS greetings_ip_time_idx
    ON greetings(ip_address, timestamp);

PRAGMA user_version = 1;
";
