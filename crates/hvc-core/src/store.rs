//! The [`KeyValueStore`] persistence trait and the [`VersionStore`] that owns
//! the journal.
//!
//! The version store holds the whole journal in memory, in creation order,
//! and mirrors it to a key-value collaborator after every mutation. Higher
//! layers (`hvc-cli`) depend on this type and on the trait, not on any
//! concrete backend.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  analytics::Analytics,
  diff::{VersionDiff, diff},
  encode::{BACKUP_KEY, VERSIONS_KEY, decode_document, encode_versions},
  reflect::{Reflection, reflect},
  version::{
    DEFAULT_DATE_FORMAT, Version, VersionDraft, display_date,
    validate_date_format,
  },
  view::{SortOrder, ViewFilter, sorted_view},
};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the key-value collaborator the journal persists through.
///
/// Reads and writes are synchronous; the store never holds more than one key.
pub trait KeyValueStore {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the value stored under `key`, or `None` if nothing is stored.
  fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

  /// Store `value` under `key`, replacing any previous value.
  fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;
}

// ─── Load outcome ────────────────────────────────────────────────────────────

/// What [`VersionStore::load`] found in the collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
  /// Nothing was stored yet; the journal starts empty.
  Missing,
  /// The stored document was accepted with this many versions.
  Loaded(usize),
  /// The stored document could not be read or was not a version array; the
  /// journal starts empty. A document that was read is copied to
  /// [`BACKUP_KEY`] before the next save overwrites it.
  Malformed,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// The ordered collection of versions plus the collaborator it persists to.
pub struct VersionStore<K> {
  kv:          K,
  versions:    Vec<Version>,
  date_format: String,
  /// An undecodable document still waiting to be copied to [`BACKUP_KEY`].
  unreadable:  Option<String>,
}

impl<K: KeyValueStore> VersionStore<K> {
  /// An empty store over `kv`. Call [`VersionStore::load`] to read any
  /// persisted journal.
  pub fn new(kv: K) -> Self {
    Self {
      kv,
      versions: Vec::new(),
      date_format: DEFAULT_DATE_FORMAT.to_owned(),
      unreadable: None,
    }
  }

  /// Create a store over `kv` and load it in one step.
  pub fn open(kv: K) -> (Self, LoadOutcome) {
    let mut store = Self::new(kv);
    let outcome = store.load();
    (store, outcome)
  }

  /// Use `format` (strftime syntax) for the display date of new versions.
  pub fn with_date_format(mut self, format: impl Into<String>) -> Result<Self> {
    let format = format.into();
    validate_date_format(&format)?;
    self.date_format = format;
    Ok(self)
  }

  pub fn date_format(&self) -> &str { &self.date_format }

  pub fn kv(&self) -> &K { &self.kv }

  pub fn into_inner(self) -> K { self.kv }

  // ── Persistence ───────────────────────────────────────────────────────────

  /// Replace the in-memory journal with the persisted one.
  ///
  /// Never fails: a missing, unreadable or malformed document leaves the
  /// journal empty and is reported through the returned [`LoadOutcome`].
  ///
  /// Records stored without an id are given one and the journal is saved
  /// straight away, so their ids stay the same in later sessions.
  pub fn load(&mut self) -> LoadOutcome {
    self.versions.clear();
    self.unreadable = None;

    let raw = match self.kv.get(VERSIONS_KEY) {
      Ok(Some(raw)) => raw,
      Ok(None) => {
        debug!("no persisted versions; starting empty");
        return LoadOutcome::Missing;
      }
      Err(e) => {
        warn!(error = %e, "failed to read persisted versions; starting empty");
        return LoadOutcome::Malformed;
      }
    };

    let decoded = match decode_document(&raw) {
      Ok(decoded) => decoded,
      Err(e) => {
        warn!(error = %e, "ignoring malformed persisted versions");
        self.unreadable = Some(raw);
        return LoadOutcome::Malformed;
      }
    };

    debug!(count = decoded.versions.len(), "loaded versions");
    self.versions = decoded.versions;
    if decoded.missing_ids > 0 {
      match self.save() {
        Ok(()) => debug!(count = decoded.missing_ids, "assigned version ids"),
        Err(e) => warn!(
          error = %e,
          count = decoded.missing_ids,
          "failed to persist assigned version ids"
        ),
      }
    }
    LoadOutcome::Loaded(self.versions.len())
  }

  /// Serialise the whole journal and write it to the collaborator.
  ///
  /// The first save after a malformed load copies the old document to
  /// [`BACKUP_KEY`] and fails without overwriting it if that copy fails.
  pub fn save(&mut self) -> Result<()> {
    let raw = encode_versions(&self.versions)?;
    if let Some(old) = &self.unreadable {
      self
        .kv
        .set(BACKUP_KEY, old)
        .map_err(|e| Error::Persistence(Box::new(e)))?;
      warn!(key = BACKUP_KEY, "kept unreadable journal before overwriting");
      self.unreadable = None;
    }
    self
      .kv
      .set(VERSIONS_KEY, &raw)
      .map_err(|e| Error::Persistence(Box::new(e)))?;
    debug!(count = self.versions.len(), "saved versions");
    Ok(())
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  /// Record a new version from `draft`, timestamped now.
  ///
  /// See [`VersionStore::create_at`].
  pub fn create(&mut self, draft: &mut VersionDraft) -> Result<&Version> {
    self.create_at(draft, Utc::now())
  }

  /// Record a new version from `draft` with `now` as its creation time.
  ///
  /// An invalid draft is rejected without touching the store or the draft.
  /// On success the draft is reset to its defaults and the journal is saved.
  /// If the save fails the version is still in memory and
  /// [`Error::Persistence`] is returned.
  pub fn create_at(
    &mut self,
    draft: &mut VersionDraft,
    now: DateTime<Utc>,
  ) -> Result<&Version> {
    draft.validate()?;

    let version = Version::from_draft(
      std::mem::take(draft),
      Uuid::new_v4(),
      now,
      display_date(now, &self.date_format),
    );
    debug!(
      version_id = %version.version_id,
      name = %version.name,
      "created version"
    );
    self.versions.push(version);
    self.save()?;

    let last = self.versions.len() - 1;
    Ok(&self.versions[last])
  }

  /// Replace the editable fields of version `id` with `draft`, keeping its id
  /// and creation time.
  ///
  /// Returns `Ok(None)` without saving if no version has that id.
  pub fn update(
    &mut self,
    id: Uuid,
    draft: VersionDraft,
  ) -> Result<Option<&Version>> {
    let Some(pos) = self.position(id) else {
      debug!(version_id = %id, "update of unknown version ignored");
      return Ok(None);
    };
    draft.validate()?;

    self.versions[pos].apply(draft);
    debug!(version_id = %id, "updated version");
    self.save()?;
    Ok(Some(&self.versions[pos]))
  }

  /// Remove version `id`. Returns `Ok(false)` without saving if no version
  /// has that id.
  pub fn delete(&mut self, id: Uuid) -> Result<bool> {
    let Some(pos) = self.position(id) else {
      debug!(version_id = %id, "delete of unknown version ignored");
      return Ok(false);
    };

    self.versions.remove(pos);
    debug!(version_id = %id, "deleted version");
    self.save()?;
    Ok(true)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// All versions in creation order.
  pub fn versions(&self) -> &[Version] { &self.versions }

  pub fn len(&self) -> usize { self.versions.len() }

  pub fn is_empty(&self) -> bool { self.versions.is_empty() }

  pub fn get(&self, id: Uuid) -> Option<&Version> {
    self.versions.iter().find(|v| v.version_id == id)
  }

  /// Versions whose id starts with `prefix`. Hyphens are ignored and case
  /// does not matter.
  pub fn find_by_prefix(&self, prefix: &str) -> Vec<&Version> {
    let prefix: String = prefix
      .trim()
      .chars()
      .filter(|&c| c != '-')
      .map(|c| c.to_ascii_lowercase())
      .collect();
    if prefix.is_empty() {
      return Vec::new();
    }
    self
      .versions
      .iter()
      .filter(|v| v.version_id.simple().to_string().starts_with(&prefix))
      .collect()
  }

  fn position(&self, id: Uuid) -> Option<usize> {
    self.versions.iter().position(|v| v.version_id == id)
  }

  // ── Derived views ─────────────────────────────────────────────────────────

  /// The journal in display order. See [`crate::view::sorted_view`].
  pub fn sorted_view(&self, order: SortOrder) -> Vec<&Version> {
    sorted_view(&self.versions, order)
  }

  /// The journal in display order, restricted by `filter`.
  pub fn filtered_view(
    &self,
    order: SortOrder,
    filter: &ViewFilter,
  ) -> Vec<&Version> {
    filter.apply(self.sorted_view(order))
  }

  pub fn analytics(&self) -> Analytics<'_> { Analytics::new(&self.versions) }

  /// Per-trait comparison of versions `a` and `b`. See [`crate::diff::diff`].
  pub fn diff(&self, a: Option<Uuid>, b: Option<Uuid>) -> VersionDiff {
    diff(&self.versions, a, b)
  }

  /// See [`crate::reflect::reflect`].
  pub fn reflect(&self) -> Result<Reflection> { reflect(&self.versions) }
}
