//! [`SqliteStore`] — the SQLite implementation of [`KeyValueStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use hvc_core::store::KeyValueStore;
use rusqlite::{Connection, OptionalExtension as _};
use tracing::debug;

use crate::{
  Error, Result,
  encode::{decode_dt, encode_dt},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A key-value collaborator backed by a single SQLite file.
pub struct SqliteStore {
  conn: Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  /// Missing parent directories are created.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path)?;
    let store = Self { conn };
    store.init_schema()?;
    debug!(path = %path.display(), "opened sqlite store");
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory()?;
    let store = Self { conn };
    store.init_schema()?;
    Ok(store)
  }

  fn init_schema(&self) -> Result<()> {
    self.conn.execute_batch(SCHEMA)?;
    Ok(())
  }

  /// When `key` was last written, or `None` if it was never written.
  pub fn updated_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = self
      .conn
      .query_row(
        "SELECT updated_at FROM kv WHERE key = ?1",
        rusqlite::params![key],
        |row| row.get(0),
      )
      .optional()?;

    raw.as_deref().map(decode_dt).transpose()
  }
}

// ─── KeyValueStore impl ──────────────────────────────────────────────────────

impl KeyValueStore for SqliteStore {
  type Error = Error;

  fn get(&self, key: &str) -> Result<Option<String>> {
    Ok(
      self
        .conn
        .query_row(
          "SELECT value FROM kv WHERE key = ?1",
          rusqlite::params![key],
          |row| row.get(0),
        )
        .optional()?,
    )
  }

  fn set(&mut self, key: &str, value: &str) -> Result<()> {
    let at_str = encode_dt(Utc::now());
    self.conn.execute(
      "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
       ON CONFLICT (key) DO UPDATE
         SET value = excluded.value, updated_at = excluded.updated_at",
      rusqlite::params![key, value, at_str],
    )?;
    debug!(key, bytes = value.len(), "wrote key");
    Ok(())
  }
}
