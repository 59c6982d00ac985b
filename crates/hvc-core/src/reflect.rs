//! Rule-based reflection over trait growth.
//!
//! Each trait's growth (last minus first, creation order) is classified as
//! improved, declined or unchanged. Stress is inverted: falling stress is an
//! improvement.

use std::fmt;

use serde::Serialize;

use crate::{
  Error, Result,
  analytics::Analytics,
  version::{Trait, Version},
};

const STABLE: &str = "Your traits have remained stable.";
const ENCOURAGEMENT: &str = "Keep tracking your versions to keep growing.";

/// A generated summary of how the author has changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reflection {
  pub improved: Vec<Trait>,
  pub declined: Vec<Trait>,
  pub text:     String,
}

impl fmt::Display for Reflection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.text)
  }
}

/// How a trait reads in prose, given its direction.
fn label(t: Trait, improved: bool) -> &'static str {
  match (t, improved) {
    (Trait::Stress, true) => "stress management",
    _ => t.into(),
  }
}

/// Reflect on the journal's growth. Needs at least two versions.
pub fn reflect(versions: &[Version]) -> Result<Reflection> {
  if versions.len() < 2 {
    return Err(Error::InsufficientData { have: versions.len() });
  }

  let stats = Analytics::new(versions);
  let mut improved = Vec::new();
  let mut declined = Vec::new();
  for t in Trait::ALL {
    let growth = stats.growth(t);
    let better = if t.higher_is_better() { growth } else { -growth };
    if better > 0 {
      improved.push(t);
    } else if better < 0 {
      declined.push(t);
    }
  }

  let mut sentences = Vec::new();
  if !improved.is_empty() {
    sentences.push(format!("Great progress in {}.", join(&improved, true)));
  }
  if !declined.is_empty() {
    sentences.push(format!("Be mindful of {}.", join(&declined, false)));
  }
  if sentences.is_empty() {
    sentences.push(STABLE.to_owned());
  }
  sentences.push(ENCOURAGEMENT.to_owned());

  Ok(Reflection { improved, declined, text: sentences.join(" ") })
}

fn join(traits: &[Trait], improved: bool) -> String {
  traits
    .iter()
    .map(|&t| label(t, improved))
    .collect::<Vec<_>>()
    .join(", ")
}
