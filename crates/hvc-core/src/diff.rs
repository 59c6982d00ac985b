//! Pairwise trait comparison between two versions.

use serde::Serialize;
use uuid::Uuid;

use crate::version::{Trait, Traits, Version};

/// How one trait moved from version `a` to version `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TraitDelta {
  #[serde(rename = "trait")]
  pub name:  Trait,
  pub a:     u8,
  pub b:     u8,
  /// `b - a`
  pub delta: i16,
}

/// The result of comparing two versions, one [`TraitDelta`] per trait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionDiff {
  /// The version on the left, if it was found.
  pub a:      Option<Uuid>,
  /// The version on the right, if it was found.
  pub b:      Option<Uuid>,
  pub traits: Vec<TraitDelta>,
}

impl VersionDiff {
  pub fn get(&self, t: Trait) -> Option<&TraitDelta> {
    self.traits.iter().find(|d| d.name == t)
  }

  /// Deltas for traits whose value differs.
  pub fn changed(&self) -> impl Iterator<Item = &TraitDelta> {
    self.traits.iter().filter(|d| d.delta != 0)
  }
}

/// Compare versions `a` and `b` looked up by id in `versions`.
///
/// A side that is `None` or names no version compares as default traits
/// (all 5), so stale selections still produce a result.
pub fn diff(
  versions: &[Version],
  a: Option<Uuid>,
  b: Option<Uuid>,
) -> VersionDiff {
  let lookup = |id: Option<Uuid>| {
    id.and_then(|id| versions.iter().find(|v| v.version_id == id))
  };
  let left = lookup(a);
  let right = lookup(b);

  let traits_a = left.map(|v| v.traits).unwrap_or_default();
  let traits_b = right.map(|v| v.traits).unwrap_or_default();

  VersionDiff {
    a:      left.map(|v| v.version_id),
    b:      right.map(|v| v.version_id),
    traits: Trait::ALL
      .iter()
      .map(|&t| delta(t, &traits_a, &traits_b))
      .collect(),
  }
}

fn delta(t: Trait, a: &Traits, b: &Traits) -> TraitDelta {
  let (a, b) = (a.get(t), b.get(t));
  TraitDelta { name: t, a, b, delta: i16::from(b) - i16::from(a) }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;

  fn version(traits: Traits) -> Version {
    let now = Utc::now();
    Version {
      version_id: Uuid::new_v4(),
      name:       "v".into(),
      notes:      String::new(),
      date:       String::new(),
      created_at: now,
      tags:       Vec::new(),
      experiment: false,
      emotion:    3,
      traits,
    }
  }

  #[test]
  fn deltas_are_b_minus_a() {
    let a = version(Traits { confidence: 3, stress: 8, energy: 4, focus: 4 });
    let b = version(Traits { confidence: 7, stress: 2, energy: 6, focus: 4 });
    let (ida, idb) = (a.version_id, b.version_id);
    let versions = vec![a, b];

    let d = diff(&versions, Some(ida), Some(idb));
    assert_eq!(d.a, Some(ida));
    assert_eq!(
      d.get(Trait::Confidence),
      Some(&TraitDelta { name: Trait::Confidence, a: 3, b: 7, delta: 4 })
    );
    assert_eq!(d.get(Trait::Stress).unwrap().delta, -6);
    let changed: Vec<Trait> = d.changed().map(|c| c.name).collect();
    assert_eq!(changed, vec![Trait::Confidence, Trait::Stress, Trait::Energy]);
  }

  #[test]
  fn diff_is_antisymmetric() {
    let a = version(Traits { confidence: 1, stress: 10, energy: 6, focus: 2 });
    let b = version(Traits { confidence: 9, stress: 3, energy: 6, focus: 5 });
    let (ida, idb) = (a.version_id, b.version_id);
    let versions = vec![a, b];

    let ab = diff(&versions, Some(ida), Some(idb));
    let ba = diff(&versions, Some(idb), Some(ida));
    for t in Trait::ALL {
      assert_eq!(ab.get(t).unwrap().delta, -ba.get(t).unwrap().delta);
    }
  }

  #[test]
  fn missing_side_compares_as_defaults() {
    let a = version(Traits { confidence: 8, stress: 5, energy: 5, focus: 5 });
    let ida = a.version_id;
    let versions = vec![a];

    let d = diff(&versions, Some(ida), Some(Uuid::new_v4()));
    assert_eq!(d.b, None);
    assert_eq!(d.get(Trait::Confidence).unwrap().delta, -3);
    assert_eq!(d.changed().count(), 1);

    let d = diff(&versions, None, None);
    assert!(d.traits.iter().all(|t| t.a == 5 && t.b == 5 && t.delta == 0));
  }
}
