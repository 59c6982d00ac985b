//! Error types for `hvc-core`.

use thiserror::Error;

use crate::version::Trait;

#[derive(Debug, Error)]
pub enum Error {
  #[error("version name must not be empty")]
  EmptyName,

  #[error("emotion must be between 1 and 5, got {0}")]
  EmotionOutOfRange(u8),

  #[error("{name} must be between 1 and 10, got {value}")]
  TraitOutOfRange { name: Trait, value: u8 },

  #[error("invalid date format: {0:?}")]
  InvalidDateFormat(String),

  #[error("malformed version data: {0}")]
  MalformedData(String),

  #[error("not enough versions to reflect on: have {have}, need at least 2")]
  InsufficientData { have: usize },

  /// The persistence collaborator rejected a write. The in-memory store has
  /// already applied the mutation.
  #[error("persistence error: {0}")]
  Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
