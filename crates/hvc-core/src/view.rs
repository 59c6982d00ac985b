//! Display ordering and filtering of the journal.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::version::Version;

/// Which end of the timeline comes first.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortOrder {
  #[default]
  Newest,
  Oldest,
}

/// A copy of the journal's references ordered by creation time.
///
/// Versions created at the same instant keep their creation order in both
/// directions. The journal itself is never reordered.
pub fn sorted_view(versions: &[Version], order: SortOrder) -> Vec<&Version> {
  let mut view: Vec<&Version> = versions.iter().collect();
  match order {
    SortOrder::Newest => view.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    SortOrder::Oldest => view.sort_by_key(|v| v.created_at),
  }
  view
}

/// Restricts a view to a subset of versions. The default filter keeps
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilter {
  /// Keep only versions carrying this exact tag.
  pub tag:        Option<String>,
  /// Keep only experiments (`Some(true)`) or only normal versions
  /// (`Some(false)`).
  pub experiment: Option<bool>,
}

impl ViewFilter {
  pub fn filter_by_tag(tag: impl Into<String>) -> Self {
    Self { tag: Some(tag.into()), ..Default::default() }
  }

  pub fn experiments_only() -> Self {
    Self { experiment: Some(true), ..Default::default() }
  }

  pub fn matches(&self, v: &Version) -> bool {
    let tag_ok = self
      .tag
      .as_deref()
      .is_none_or(|tag| v.tags.iter().any(|t| t == tag));
    let experiment_ok = self.experiment.is_none_or(|e| v.experiment == e);
    tag_ok && experiment_ok
  }

  pub fn apply<'a>(&self, view: Vec<&'a Version>) -> Vec<&'a Version> {
    view.into_iter().filter(|v| self.matches(v)).collect()
  }
}
