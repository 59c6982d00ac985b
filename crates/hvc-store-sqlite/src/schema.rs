//! SQL schema for the journal's SQLite file.
//!
//! Executed once when a connection opens. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per key. The journal itself is a single JSON document stored
-- under the key 'versions'.
CREATE TABLE IF NOT EXISTS kv (
    key         TEXT PRIMARY KEY,
    value       TEXT NOT NULL,
    updated_at  TEXT NOT NULL    -- ISO 8601 UTC; set on every write
);

PRAGMA user_version = 1;
";
