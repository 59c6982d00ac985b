//! [`MemoryStore`] — a process-local [`KeyValueStore`].

use std::{collections::HashMap, convert::Infallible};

use crate::store::KeyValueStore;

/// A key-value collaborator that lives only as long as the process. Useful
/// for tests and for embedding the journal without durable storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  entries: HashMap<String, String>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Seed a store with a single entry.
  pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
    let mut entries = HashMap::new();
    entries.insert(key.into(), value.into());
    Self { entries }
  }
}

impl KeyValueStore for MemoryStore {
  type Error = Infallible;

  fn get(&self, key: &str) -> Result<Option<String>, Infallible> {
    Ok(self.entries.get(key).cloned())
  }

  fn set(&mut self, key: &str, value: &str) -> Result<(), Infallible> {
    self.entries.insert(key.to_owned(), value.to_owned());
    Ok(())
  }
}
