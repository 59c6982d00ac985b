//! Plain-text rendering of the journal's views.

use std::fmt::Write as _;

use hvc_core::{
  analytics::{Analytics, HeatLevel, SeriesPoint},
  diff::VersionDiff,
  version::{Trait, Version},
};

/// The first eight hex digits of a version's id. Every id argument accepts
/// it back as a prefix.
pub fn short_id(v: &Version) -> String {
  v.version_id.simple().to_string()[..8].to_owned()
}

// ─── Timeline ─────────────────────────────────────────────────────────────────

/// One card per version, in the order given.
pub fn timeline(view: &[&Version]) -> String {
  if view.is_empty() {
    return "No versions yet.\n".to_owned();
  }

  let mut out = String::new();
  for v in view {
    card(&mut out, v);
    out.push('\n');
  }
  let _ = writeln!(out, "Total: {}", view.len());
  out
}

/// A single version in full.
pub fn card(out: &mut String, v: &Version) {
  let marker = if v.experiment { "  [experiment]" } else { "" };
  let _ = writeln!(
    out,
    "{}  {}  {}{marker}",
    short_id(v),
    v.name,
    v.date
  );
  let _ = writeln!(
    out,
    "          emotion {}/5  {}",
    v.emotion,
    Trait::ALL
      .iter()
      .map(|&t| format!("{t} {}", v.traits.get(t)))
      .collect::<Vec<_>>()
      .join("  ")
  );
  if !v.tags.is_empty() {
    let _ = writeln!(out, "          tags: {}", v.tags.join(", "));
  }
  for line in v.notes.lines() {
    let _ = writeln!(out, "          {line}");
  }
}

// ─── Diff ─────────────────────────────────────────────────────────────────────

pub fn diff(d: &VersionDiff, a: &str, b: &str) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "{:<12}{:>8}{:>8}{:>8}", "trait", a, b, "change");
  for t in &d.traits {
    let _ = writeln!(
      out,
      "{:<12}{:>8}{:>8}{:>8}",
      t.name.to_string(),
      t.a,
      t.b,
      signed(t.delta)
    );
  }
  out
}

fn signed(n: i16) -> String {
  if n > 0 { format!("+{n}") } else { n.to_string() }
}

// ─── Stats ────────────────────────────────────────────────────────────────────

/// Counts, per-trait averages and growth, the emotion and trait trends and
/// the heatmap.
pub fn stats(a: &Analytics<'_>) -> String {
  let mut out = String::new();
  let summary = a.summary();

  let _ = writeln!(
    out,
    "versions {}  experiments {}  normal {}  unique tags {}",
    summary.count, summary.experiments, summary.normal, summary.unique_tags
  );
  out.push('\n');

  let _ = writeln!(out, "{:<12}{:>8}{:>8}", "trait", "average", "growth");
  for s in &summary.traits {
    let _ = writeln!(
      out,
      "{:<12}{:>8}{:>8}",
      s.name.to_string(),
      s.average,
      signed(s.growth)
    );
  }

  let emotion = a.emotion_series();
  if !emotion.is_empty() {
    out.push('\n');
    let _ = writeln!(out, "emotion trend");
    out.push_str(&sparkline(&emotion, 5));
    out.push('\n');
    let _ = writeln!(out, "trait trends");
    for series in a.trait_trends() {
      let _ = write!(out, "{:<12}", series.name.to_string());
      out.push_str(&sparkline(&series.points, 10));
    }
  }

  let rows = a.heatmap();
  if !rows.is_empty() {
    out.push('\n');
    let _ = writeln!(out, "{:<10}{}", "heatmap", heat_header());
    for row in rows {
      let cells: String = row
        .cells
        .iter()
        .map(|c| format!("{:>3}{} ", c.value, heat_glyph(c.level)))
        .collect();
      let name = truncate(&row.name, 9);
      let _ = writeln!(out, "{name:<10}{cells}  {}", row.date);
    }
  }
  out
}

fn heat_header() -> String {
  Trait::ALL
    .iter()
    .map(|t| format!("{:>5}", &t.to_string()[..4]))
    .collect()
}

fn heat_glyph(level: HeatLevel) -> char {
  match level {
    HeatLevel::Low => '░',
    HeatLevel::Medium => '▒',
    HeatLevel::High => '█',
  }
}

/// One bar per point, scaled to `max`.
fn sparkline(points: &[SeriesPoint], max: u8) -> String {
  const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
  let mut out = String::new();
  for p in points {
    let idx = usize::from(p.value.clamp(1, max) - 1) * (BARS.len() - 1)
      / usize::from(max.saturating_sub(1).max(1));
    out.push(BARS[idx]);
  }
  out.push('\n');
  out
}

fn truncate(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    s.to_owned()
  } else {
    let mut t: String = s.chars().take(max - 1).collect();
    t.push('…');
    t
  }
}
