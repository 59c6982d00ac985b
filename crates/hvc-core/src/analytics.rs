//! Aggregate statistics over the journal.
//!
//! Every figure is recomputed from the versions on each call; nothing is
//! cached. "First" and "last" always mean creation order, never display
//! order.

use std::collections::HashSet;

use serde::Serialize;
use strum::Display;
use uuid::Uuid;

use crate::version::{Trait, Version};

// ─── Series & heatmap types ──────────────────────────────────────────────────

/// One point of a trend series, in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
  pub version_id: Uuid,
  pub date:       String,
  pub value:      u8,
}

/// The trend of one trait across the journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraitSeries {
  #[serde(rename = "trait")]
  pub name:   Trait,
  pub points: Vec<SeriesPoint>,
}

/// Colour band of a trait score on the heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HeatLevel {
  /// 1–3
  Low,
  /// 4–7
  Medium,
  /// 8–10
  High,
}

impl HeatLevel {
  pub fn of(value: u8) -> Self {
    match value {
      0..=3 => Self::Low,
      4..=7 => Self::Medium,
      _ => Self::High,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatCell {
  #[serde(rename = "trait")]
  pub name:  Trait,
  pub value: u8,
  pub level: HeatLevel,
}

/// One heatmap row: a version and its four scored traits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatRow {
  pub version_id: Uuid,
  pub name:       String,
  pub date:       String,
  pub cells:      Vec<HeatCell>,
}

/// Average and growth of a single trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TraitStat {
  #[serde(rename = "trait")]
  pub name:    Trait,
  pub average: u8,
  pub growth:  i16,
}

/// Every aggregate figure at once, for dashboards and `--json` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
  pub count:       usize,
  pub experiments: usize,
  pub normal:      usize,
  pub unique_tags: usize,
  pub traits:      Vec<TraitStat>,
}

// ─── Analytics ───────────────────────────────────────────────────────────────

/// Read-only statistics over a slice of versions in creation order.
#[derive(Debug, Clone, Copy)]
pub struct Analytics<'a> {
  versions: &'a [Version],
}

impl<'a> Analytics<'a> {
  pub fn new(versions: &'a [Version]) -> Self { Self { versions } }

  pub fn count(&self) -> usize { self.versions.len() }

  pub fn experiment_count(&self) -> usize {
    self.versions.iter().filter(|v| v.experiment).count()
  }

  pub fn normal_count(&self) -> usize {
    self.count() - self.experiment_count()
  }

  /// Distinct tag strings across all versions; case-sensitive.
  pub fn unique_tag_count(&self) -> usize {
    self
      .versions
      .iter()
      .flat_map(|v| v.tags.iter().map(String::as_str))
      .collect::<HashSet<_>>()
      .len()
  }

  /// Mean of `t` across all versions, rounded half up; 0 when empty.
  pub fn average(&self, t: Trait) -> u8 {
    let n = self.versions.len() as u32;
    if n == 0 {
      return 0;
    }
    let sum: u32 =
      self.versions.iter().map(|v| u32::from(v.traits.get(t))).sum();
    // (sum / n) rounded: floor((2 * sum + n) / (2 * n))
    ((2 * sum + n) / (2 * n)) as u8
  }

  /// Last minus first value of `t` in creation order; 0 with fewer than two
  /// versions.
  pub fn growth(&self, t: Trait) -> i16 {
    match self.versions {
      [first, .., last] => {
        i16::from(last.traits.get(t)) - i16::from(first.traits.get(t))
      }
      _ => 0,
    }
  }

  /// `(date, emotion)` per version in creation order.
  pub fn emotion_series(&self) -> Vec<SeriesPoint> {
    self.series(|v| v.emotion)
  }

  /// `(date, value)` of `t` per version in creation order.
  pub fn trait_series(&self, t: Trait) -> Vec<SeriesPoint> {
    self.series(|v| v.traits.get(t))
  }

  /// [`Analytics::trait_series`] for every trait, in [`Trait::ALL`] order.
  pub fn trait_trends(&self) -> Vec<TraitSeries> {
    Trait::ALL
      .iter()
      .map(|&t| TraitSeries { name: t, points: self.trait_series(t) })
      .collect()
  }

  fn series(&self, value: impl Fn(&Version) -> u8) -> Vec<SeriesPoint> {
    self
      .versions
      .iter()
      .map(|v| SeriesPoint {
        version_id: v.version_id,
        date:       v.date.clone(),
        value:      value(v),
      })
      .collect()
  }

  /// One row per version in creation order, each trait banded by
  /// [`HeatLevel::of`].
  pub fn heatmap(&self) -> Vec<HeatRow> {
    self
      .versions
      .iter()
      .map(|v| HeatRow {
        version_id: v.version_id,
        name:       v.name.clone(),
        date:       v.date.clone(),
        cells:      Trait::ALL
          .iter()
          .map(|&t| {
            let value = v.traits.get(t);
            HeatCell { name: t, value, level: HeatLevel::of(value) }
          })
          .collect(),
      })
      .collect()
  }

  pub fn summary(&self) -> Summary {
    Summary {
      count:       self.count(),
      experiments: self.experiment_count(),
      normal:      self.normal_count(),
      unique_tags: self.unique_tag_count(),
      traits:      Trait::ALL
        .iter()
        .map(|&t| TraitStat {
          name:    t,
          average: self.average(t),
          growth:  self.growth(t),
        })
        .collect(),
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, TimeZone, Utc};

  use super::*;
  use crate::version::Traits;

  fn version(i: i64, traits: Traits) -> Version {
    let at =
      Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap() + Duration::days(i);
    Version {
      version_id: Uuid::new_v4(),
      name:       format!("v{i}"),
      notes:      String::new(),
      date:       at.format("%-m/%-d/%Y").to_string(),
      created_at: at,
      tags:       Vec::new(),
      experiment: false,
      emotion:    3,
      traits,
    }
  }

  fn confidence(c: u8) -> Traits {
    Traits::default().with(Trait::Confidence, c)
  }

  #[test]
  fn empty_journal() {
    let a = Analytics::new(&[]);
    assert_eq!(a.count(), 0);
    assert_eq!(a.unique_tag_count(), 0);
    for t in Trait::ALL {
      assert_eq!(a.average(t), 0);
      assert_eq!(a.growth(t), 0);
    }
    assert!(a.emotion_series().is_empty());
  }

  #[test]
  fn single_version_average_and_growth() {
    let versions = vec![version(0, Traits {
      confidence: 7,
      stress:     2,
      energy:     9,
      focus:      1,
    })];
    let a = Analytics::new(&versions);
    assert_eq!(a.average(Trait::Confidence), 7);
    assert_eq!(a.average(Trait::Focus), 1);
    assert_eq!(a.growth(Trait::Confidence), 0);
  }

  #[test]
  fn growth_is_last_minus_first_in_creation_order() {
    let versions = vec![version(0, confidence(3)), version(1, confidence(7))];
    assert_eq!(Analytics::new(&versions).growth(Trait::Confidence), 4);

    // Creation order wins even when the last version is dated earlier.
    let versions = vec![version(5, confidence(3)), version(1, confidence(7))];
    assert_eq!(Analytics::new(&versions).growth(Trait::Confidence), 4);

    let versions = vec![
      version(0, confidence(8)),
      version(1, confidence(1)),
      version(2, confidence(2)),
    ];
    assert_eq!(Analytics::new(&versions).growth(Trait::Confidence), -6);
  }

  #[test]
  fn average_rounds_half_up() {
    let versions = vec![version(0, confidence(3)), version(1, confidence(4))];
    assert_eq!(Analytics::new(&versions).average(Trait::Confidence), 4);

    let versions = vec![
      version(0, confidence(3)),
      version(1, confidence(3)),
      version(2, confidence(4)),
    ];
    assert_eq!(Analytics::new(&versions).average(Trait::Confidence), 3);
  }

  #[test]
  fn counts_and_unique_tags() {
    let mut a = version(0, Traits::default());
    a.tags = vec!["a".into(), "b".into()];
    let mut b = version(1, Traits::default());
    b.tags = vec!["b".into(), "c".into()];
    b.experiment = true;
    let mut c = version(2, Traits::default());
    c.tags = vec!["C".into()];
    let versions = vec![a, b, c];

    let stats = Analytics::new(&versions);
    assert_eq!(stats.count(), 3);
    assert_eq!(stats.experiment_count(), 1);
    assert_eq!(stats.normal_count(), 2);
    assert_eq!(stats.unique_tag_count(), 4);
    assert_eq!(Analytics::new(&versions[..2]).unique_tag_count(), 3);
  }

  #[test]
  fn emotion_series_keeps_creation_order() {
    let mut late = version(9, Traits::default());
    late.emotion = 5;
    let mut early = version(0, Traits::default());
    early.emotion = 1;
    let versions = vec![late, early];

    let series = Analytics::new(&versions).emotion_series();
    let values: Vec<u8> = series.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![5, 1]);
    assert_eq!(series[0].date, versions[0].date);
  }

  #[test]
  fn trait_series_keeps_creation_order() {
    let versions = vec![
      version(4, confidence(9)),
      version(0, confidence(2)),
      version(2, confidence(6)),
    ];
    let a = Analytics::new(&versions);

    let series = a.trait_series(Trait::Confidence);
    let values: Vec<u8> = series.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![9, 2, 6]);
    let ids: Vec<Uuid> = series.iter().map(|p| p.version_id).collect();
    let expected: Vec<Uuid> = versions.iter().map(|v| v.version_id).collect();
    assert_eq!(ids, expected);
    assert_eq!(series[1].date, versions[1].date);

    let stress: Vec<u8> =
      a.trait_series(Trait::Stress).iter().map(|p| p.value).collect();
    assert_eq!(stress, vec![5, 5, 5]);
  }

  #[test]
  fn trait_trends_cover_every_trait() {
    let versions = vec![version(0, confidence(3)), version(1, confidence(8))];
    let trends = Analytics::new(&versions).trait_trends();
    let names: Vec<Trait> = trends.iter().map(|s| s.name).collect();
    assert_eq!(names, Trait::ALL.to_vec());
    assert_eq!(trends[0].points.len(), 2);
    assert_eq!(trends[0].points[1].value, 8);

    let json = serde_json::to_value(&trends).unwrap();
    assert_eq!(json[0]["trait"], "confidence");
  }

  #[test]
  fn heatmap_bands() {
    assert_eq!(HeatLevel::of(1), HeatLevel::Low);
    assert_eq!(HeatLevel::of(3), HeatLevel::Low);
    assert_eq!(HeatLevel::of(4), HeatLevel::Medium);
    assert_eq!(HeatLevel::of(7), HeatLevel::Medium);
    assert_eq!(HeatLevel::of(8), HeatLevel::High);
    assert_eq!(HeatLevel::of(10), HeatLevel::High);

    let versions = vec![version(0, Traits {
      confidence: 2,
      stress:     9,
      energy:     5,
      focus:      8,
    })];
    let rows = Analytics::new(&versions).heatmap();
    let levels: Vec<HeatLevel> =
      rows[0].cells.iter().map(|c| c.level).collect();
    assert_eq!(levels, vec![
      HeatLevel::Low,
      HeatLevel::High,
      HeatLevel::Medium,
      HeatLevel::High
    ]);
  }

  #[test]
  fn summary_bundles_every_trait() {
    let versions = vec![version(0, confidence(3)), version(1, confidence(7))];
    let summary = Analytics::new(&versions).summary();
    assert_eq!(summary.count, 2);
    assert_eq!(summary.traits.len(), 4);
    assert_eq!(
      summary.traits[0],
      TraitStat { name: Trait::Confidence, average: 5, growth: 4 }
    );

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["traits"][0]["trait"], "confidence");
  }
}
