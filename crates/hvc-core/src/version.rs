//! Version types — the fundamental unit of the journal.
//!
//! A version is a named snapshot of the author at a point in time: free-text
//! notes, tags, an experiment flag, an emotion rating and four trait scores.
//! Versions are identified by a UUID assigned at creation; their position in
//! the store is never used as identity.

use chrono::{DateTime, Local, NaiveDate, Utc, format::StrftimeItems};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::{Error, Result};

/// The display shape used when no other date format is configured; matches
/// the common en-US locale date (`3/14/2026`).
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

pub const DEFAULT_EMOTION: u8 = 3;
pub const DEFAULT_TRAIT_VALUE: u8 = 5;

pub const EMOTION_RANGE: std::ops::RangeInclusive<u8> = 1..=5;
pub const TRAIT_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

// ─── Traits ──────────────────────────────────────────────────────────────────

/// One of the four scored attributes of a version.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Trait {
  Confidence,
  Stress,
  Energy,
  Focus,
}

impl Trait {
  /// Every trait, in display order.
  pub const ALL: [Trait; 4] =
    [Trait::Confidence, Trait::Stress, Trait::Energy, Trait::Focus];

  /// Whether a rising score is an improvement. Lower stress is better.
  pub fn higher_is_better(self) -> bool { !matches!(self, Trait::Stress) }
}

/// The four trait scores of a version, each in `1..=10`.
///
/// Missing fields in persisted data default to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Traits {
  pub confidence: u8,
  pub stress:     u8,
  pub energy:     u8,
  pub focus:      u8,
}

impl Default for Traits {
  fn default() -> Self {
    Self {
      confidence: DEFAULT_TRAIT_VALUE,
      stress:     DEFAULT_TRAIT_VALUE,
      energy:     DEFAULT_TRAIT_VALUE,
      focus:      DEFAULT_TRAIT_VALUE,
    }
  }
}

impl Traits {
  pub fn get(&self, t: Trait) -> u8 {
    match t {
      Trait::Confidence => self.confidence,
      Trait::Stress => self.stress,
      Trait::Energy => self.energy,
      Trait::Focus => self.focus,
    }
  }

  pub fn set(&mut self, t: Trait, value: u8) {
    match t {
      Trait::Confidence => self.confidence = value,
      Trait::Stress => self.stress = value,
      Trait::Energy => self.energy = value,
      Trait::Focus => self.focus = value,
    }
  }

  /// Builder-style [`Traits::set`].
  pub fn with(mut self, t: Trait, value: u8) -> Self {
    self.set(t, value);
    self
  }
}

// ─── Tags ────────────────────────────────────────────────────────────────────

/// Split a comma-separated tag input into trimmed, non-empty tags.
pub fn parse_tags(input: &str) -> Vec<String> {
  normalize_tags(input.split(','))
}

/// Trim every tag and drop the empty ones, preserving order.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  tags
    .into_iter()
    .map(|t| t.as_ref().trim().to_owned())
    .filter(|t| !t.is_empty())
    .collect()
}

// ─── Dates ───────────────────────────────────────────────────────────────────

/// Check that `format` is a usable strftime pattern.
pub fn validate_date_format(format: &str) -> Result<()> {
  let bad = StrftimeItems::new(format)
    .any(|item| matches!(item, chrono::format::Item::Error));
  if bad || format.is_empty() {
    return Err(Error::InvalidDateFormat(format.to_owned()));
  }
  Ok(())
}

/// Render `at` in the local timezone with `format`. The format must have
/// passed [`validate_date_format`].
pub fn display_date(at: DateTime<Utc>, format: &str) -> String {
  at.with_timezone(&Local).format(format).to_string()
}

/// Recover a timestamp from a display date written by an older journal that
/// did not persist `createdAt`. Dates resolve to midnight UTC.
pub fn parse_display_date(date: &str) -> Option<DateTime<Utc>> {
  const SHAPES: [&str; 4] = ["%m/%d/%Y", "%d/%m/%Y", "%Y-%m-%d", "%d.%m.%Y"];

  let date = date.trim();
  SHAPES
    .iter()
    .find_map(|shape| NaiveDate::parse_from_str(date, shape).ok())
    .and_then(|d| d.and_hms_opt(0, 0, 0))
    .map(|dt| dt.and_utc())
}

// ─── VersionDraft ────────────────────────────────────────────────────────────

/// The user-editable fields of a version. Input to
/// [`crate::store::VersionStore::create`] and
/// [`crate::store::VersionStore::update`]; identity and timestamps are
/// always set by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionDraft {
  pub name:       String,
  pub notes:      String,
  pub tags:       Vec<String>,
  pub experiment: bool,
  pub emotion:    u8,
  pub traits:     Traits,
}

impl Default for VersionDraft {
  fn default() -> Self {
    Self {
      name:       String::new(),
      notes:      String::new(),
      tags:       Vec::new(),
      experiment: false,
      emotion:    DEFAULT_EMOTION,
      traits:     Traits::default(),
    }
  }
}

impl VersionDraft {
  /// Convenience constructor with every other field at its default.
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into(), ..Self::default() }
  }

  /// Reject drafts the store must not accept.
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::EmptyName);
    }
    if !EMOTION_RANGE.contains(&self.emotion) {
      return Err(Error::EmotionOutOfRange(self.emotion));
    }
    for t in Trait::ALL {
      let value = self.traits.get(t);
      if !TRAIT_RANGE.contains(&value) {
        return Err(Error::TraitOutOfRange { name: t, value });
      }
    }
    Ok(())
  }
}

impl From<&Version> for VersionDraft {
  fn from(v: &Version) -> Self {
    Self {
      name:       v.name.clone(),
      notes:      v.notes.clone(),
      tags:       v.tags.clone(),
      experiment: v.experiment,
      emotion:    v.emotion,
      traits:     v.traits,
    }
  }
}

// ─── Version ─────────────────────────────────────────────────────────────────

/// A journaled snapshot. Only [`crate::store::VersionStore::update`] ever
/// replaces its editable fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredVersion")]
pub struct Version {
  #[serde(rename = "id")]
  pub version_id: Uuid,
  pub name:       String,
  pub notes:      String,
  /// Display form of `created_at`, fixed at creation.
  pub date:       String,
  /// Store-assigned creation time; the sort key.
  pub created_at: DateTime<Utc>,
  pub tags:       Vec<String>,
  pub experiment: bool,
  pub emotion:    u8,
  pub traits:     Traits,
}

impl Version {
  /// Build a version from a validated draft.
  pub(crate) fn from_draft(
    draft: VersionDraft,
    version_id: Uuid,
    created_at: DateTime<Utc>,
    date: String,
  ) -> Self {
    Self {
      version_id,
      name: draft.name.trim().to_owned(),
      notes: draft.notes,
      date,
      created_at,
      tags: normalize_tags(draft.tags),
      experiment: draft.experiment,
      emotion: draft.emotion,
      traits: draft.traits,
    }
  }

  /// Replace every editable field with those of `draft`.
  pub(crate) fn apply(&mut self, draft: VersionDraft) {
    *self = Self::from_draft(
      draft,
      self.version_id,
      self.created_at,
      std::mem::take(&mut self.date),
    );
  }
}

/// The persisted shape, tolerant of records written before ids, timestamps,
/// tags, emotions or traits existed.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredVersion {
  #[serde(default = "Uuid::new_v4")]
  id:         Uuid,
  #[serde(default)]
  name:       String,
  #[serde(default)]
  notes:      String,
  #[serde(default)]
  date:       String,
  #[serde(default)]
  created_at: Option<DateTime<Utc>>,
  #[serde(default)]
  tags:       Vec<String>,
  #[serde(default)]
  experiment: bool,
  #[serde(default = "default_emotion")]
  emotion:    u8,
  #[serde(default)]
  traits:     Traits,
}

fn default_emotion() -> u8 { DEFAULT_EMOTION }

impl From<StoredVersion> for Version {
  fn from(s: StoredVersion) -> Self {
    let created_at = s
      .created_at
      .or_else(|| parse_display_date(&s.date))
      .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

    Self {
      version_id: s.id,
      name: s.name,
      notes: s.notes,
      date: s.date,
      created_at,
      tags: normalize_tags(s.tags),
      experiment: s.experiment,
      emotion: s.emotion,
      traits: s.traits,
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use serde_json::json;

  use super::*;

  #[test]
  fn parse_tags_trims_and_drops_empty_entries() {
    assert_eq!(parse_tags(" a, b ,,c ,"), vec!["a", "b", "c"]);
    assert!(parse_tags("").is_empty());
    assert!(parse_tags(" , ").is_empty());
  }

  #[test]
  fn trait_parses_case_insensitively() {
    assert_eq!("Focus".parse::<Trait>().unwrap(), Trait::Focus);
    assert_eq!(Trait::Stress.to_string(), "stress");
    assert!("mood".parse::<Trait>().is_err());
  }

  #[test]
  fn draft_validation() {
    assert!(VersionDraft::new("v1").validate().is_ok());
    assert!(matches!(
      VersionDraft::new("   ").validate(),
      Err(Error::EmptyName)
    ));

    let mut draft = VersionDraft::new("v1");
    draft.emotion = 6;
    assert!(matches!(draft.validate(), Err(Error::EmotionOutOfRange(6))));

    let mut draft = VersionDraft::new("v1");
    draft.traits.set(Trait::Energy, 0);
    assert!(matches!(
      draft.validate(),
      Err(Error::TraitOutOfRange { name: Trait::Energy, value: 0 })
    ));
  }

  #[test]
  fn legacy_record_gets_defaults() {
    let v: Version = serde_json::from_value(json!({
      "name": "v1.0",
      "notes": "first",
      "date": "3/14/2026"
    }))
    .unwrap();

    assert_eq!(v.name, "v1.0");
    assert!(v.tags.is_empty());
    assert!(!v.experiment);
    assert_eq!(v.emotion, DEFAULT_EMOTION);
    assert_eq!(v.traits, Traits::default());
    assert_eq!(
      v.created_at,
      Utc.with_ymd_and_hms(2026, 3, 14, 0, 0, 0).unwrap()
    );
  }

  #[test]
  fn partial_traits_default_to_five() {
    let v: Version = serde_json::from_value(json!({
      "name": "v2",
      "date": "",
      "traits": { "confidence": 8 }
    }))
    .unwrap();

    assert_eq!(v.traits.confidence, 8);
    assert_eq!(v.traits.stress, DEFAULT_TRAIT_VALUE);
    assert_eq!(v.created_at, DateTime::<Utc>::UNIX_EPOCH);
  }

  #[test]
  fn legacy_empty_tags_are_dropped_on_load() {
    let v: Version = serde_json::from_value(json!({
      "name": "v3",
      "date": "2026-01-02",
      "tags": [""]
    }))
    .unwrap();
    assert!(v.tags.is_empty());
  }

  #[test]
  fn display_date_shapes() {
    assert_eq!(
      parse_display_date("12/25/2025"),
      Utc.with_ymd_and_hms(2025, 12, 25, 0, 0, 0).single()
    );
    assert_eq!(
      parse_display_date("25/12/2025"),
      Utc.with_ymd_and_hms(2025, 12, 25, 0, 0, 0).single()
    );
    assert_eq!(
      parse_display_date("25.12.2025"),
      Utc.with_ymd_and_hms(2025, 12, 25, 0, 0, 0).single()
    );
    assert_eq!(parse_display_date("yesterday"), None);
  }

  #[test]
  fn date_format_validation() {
    assert!(validate_date_format(DEFAULT_DATE_FORMAT).is_ok());
    assert!(validate_date_format("%Y-%m-%d").is_ok());
    assert!(validate_date_format("%Q").is_err());
    assert!(validate_date_format("").is_err());
  }
}
