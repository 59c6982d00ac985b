//! Subcommands and their dispatch against a [`VersionStore`].

use anyhow::{Context as _, Result, anyhow, bail};
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use hvc_core::{
  Error,
  encode::BACKUP_KEY,
  store::{KeyValueStore, VersionStore},
  version::{
    DEFAULT_EMOTION, DEFAULT_TRAIT_VALUE, Trait, Traits, VersionDraft,
    parse_tags,
  },
  view::{SortOrder, ViewFilter},
};
use serde::Serialize;
use uuid::Uuid;

use crate::render;

// ─── Arguments ────────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Record a new version of yourself.
  Add(AddArgs),
  /// Show the timeline.
  List(ListArgs),
  /// Show one version in full.
  Show {
    /// Version id or any unique prefix of it.
    id: String,
  },
  /// Change the fields of an existing version.
  Edit(EditArgs),
  /// Remove a version.
  Delete {
    /// Version id or any unique prefix of it.
    id: String,
  },
  /// Compare the trait scores of two versions.
  Diff {
    a:    String,
    b:    String,
    #[arg(long)]
    json: bool,
  },
  /// Counts, averages, growth, the emotion trend and the trait heatmap.
  Stats {
    #[arg(long)]
    json: bool,
  },
  /// A short reflection on how your traits have moved.
  Reflect,
}

impl Command {
  /// Whether running this command writes the journal back to the store.
  pub fn mutates(&self) -> bool {
    matches!(self, Self::Add(_) | Self::Edit(_) | Self::Delete { .. })
  }
}

#[derive(Args, Debug)]
pub struct AddArgs {
  /// Version name, e.g. "v2.0".
  pub name:       String,
  /// What changed?
  #[arg(short, long, default_value = "")]
  pub notes:      String,
  /// Comma-separated tags.
  #[arg(short, long, default_value = "")]
  pub tags:       String,
  /// Mark this version as an experiment.
  #[arg(short = 'x', long)]
  pub experiment: bool,
  /// Emotion rating, 1–5.
  #[arg(short, long, default_value_t = DEFAULT_EMOTION)]
  pub emotion:    u8,
  #[arg(long, default_value_t = DEFAULT_TRAIT_VALUE)]
  pub confidence: u8,
  #[arg(long, default_value_t = DEFAULT_TRAIT_VALUE)]
  pub stress:     u8,
  #[arg(long, default_value_t = DEFAULT_TRAIT_VALUE)]
  pub energy:     u8,
  #[arg(long, default_value_t = DEFAULT_TRAIT_VALUE)]
  pub focus:      u8,
}

impl From<AddArgs> for VersionDraft {
  fn from(a: AddArgs) -> Self {
    VersionDraft {
      name:       a.name,
      notes:      a.notes,
      tags:       parse_tags(&a.tags),
      experiment: a.experiment,
      emotion:    a.emotion,
      traits:     Traits {
        confidence: a.confidence,
        stress:     a.stress,
        energy:     a.energy,
        focus:      a.focus,
      },
    }
  }
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
  /// newest or oldest; defaults to the configured order.
  #[arg(long)]
  pub order:       Option<SortOrder>,
  /// Only versions carrying this tag.
  #[arg(long)]
  pub tag:         Option<String>,
  /// Only experiments.
  #[arg(long, conflicts_with = "normal")]
  pub experiments: bool,
  /// Only non-experiments.
  #[arg(long)]
  pub normal:      bool,
  #[arg(long)]
  pub json:        bool,
}

/// Every field is optional; omitted fields keep their current value.
#[derive(Args, Debug, Default)]
pub struct EditArgs {
  /// Version id or any unique prefix of it.
  pub id:         String,
  #[arg(long)]
  pub name:       Option<String>,
  #[arg(short, long)]
  pub notes:      Option<String>,
  /// Comma-separated tags; replaces all existing tags.
  #[arg(short, long)]
  pub tags:       Option<String>,
  #[arg(short = 'x', long)]
  pub experiment: Option<bool>,
  #[arg(short, long)]
  pub emotion:    Option<u8>,
  #[arg(long)]
  pub confidence: Option<u8>,
  #[arg(long)]
  pub stress:     Option<u8>,
  #[arg(long)]
  pub energy:     Option<u8>,
  #[arg(long)]
  pub focus:      Option<u8>,
}

impl EditArgs {
  fn apply(self, draft: &mut VersionDraft) {
    if let Some(name) = self.name {
      draft.name = name;
    }
    if let Some(notes) = self.notes {
      draft.notes = notes;
    }
    if let Some(tags) = self.tags {
      draft.tags = parse_tags(&tags);
    }
    if let Some(experiment) = self.experiment {
      draft.experiment = experiment;
    }
    if let Some(emotion) = self.emotion {
      draft.emotion = emotion;
    }
    let traits = [
      (Trait::Confidence, self.confidence),
      (Trait::Stress, self.stress),
      (Trait::Energy, self.energy),
      (Trait::Focus, self.focus),
    ];
    for (t, value) in traits {
      if let Some(value) = value {
        draft.traits.set(t, value);
      }
    }
  }
}

// ─── Dispatch ─────────────────────────────────────────────────────────────────

/// Ambient facts a command may report alongside the journal.
#[derive(Debug, Clone, Default)]
pub struct Context {
  pub default_order:      SortOrder,
  pub last_saved:         Option<DateTime<Utc>>,
  /// The stored journal could not be read and must not be overwritten.
  pub journal_unreadable: bool,
}

#[derive(Serialize)]
struct StatsReport<'a> {
  summary:    hvc_core::analytics::Summary,
  emotion:    Vec<hvc_core::analytics::SeriesPoint>,
  traits:     Vec<hvc_core::analytics::TraitSeries>,
  heatmap:    Vec<hvc_core::analytics::HeatRow>,
  last_saved: Option<&'a DateTime<Utc>>,
}

/// Run `command` and return what should be printed to stdout.
pub fn run<K: KeyValueStore>(
  journal: &mut VersionStore<K>,
  command: Command,
  ctx: &Context,
) -> Result<String> {
  if ctx.journal_unreadable && command.mutates() {
    bail!(
      "the stored journal could not be read, so it was not changed; restore \
       or repair the store, or rerun with --discard-unreadable to start a new \
       journal (an unparseable document is kept under the {BACKUP_KEY:?} key)"
    );
  }

  match command {
    Command::Add(args) => {
      let mut draft = VersionDraft::from(args);
      let v = journal.create(&mut draft).context("failed to add version")?;
      Ok(format!("Added {} {}\n", render::short_id(v), v.name))
    }

    Command::List(args) => {
      let order = args.order.unwrap_or(ctx.default_order);
      let filter = ViewFilter {
        tag:        args.tag,
        experiment: match (args.experiments, args.normal) {
          (true, _) => Some(true),
          (_, true) => Some(false),
          _ => None,
        },
      };
      let view = journal.filtered_view(order, &filter);
      if args.json {
        return Ok(serde_json::to_string_pretty(&view)? + "\n");
      }
      Ok(render::timeline(&view))
    }

    Command::Show { id } => {
      let id = resolve(journal, &id)?;
      let v = journal
        .get(id)
        .ok_or_else(|| anyhow!("version {id} disappeared"))?;
      let mut out = String::new();
      render::card(&mut out, v);
      Ok(out)
    }

    Command::Edit(args) => {
      let id = resolve(journal, &args.id)?;
      let mut draft = journal
        .get(id)
        .map(VersionDraft::from)
        .ok_or_else(|| anyhow!("version {id} disappeared"))?;
      args.apply(&mut draft);
      let v = journal
        .update(id, draft)
        .context("failed to update version")?
        .ok_or_else(|| anyhow!("version {id} disappeared"))?;
      Ok(format!("Updated {} {}\n", render::short_id(v), v.name))
    }

    Command::Delete { id } => {
      let id = resolve(journal, &id)?;
      let label = journal
        .get(id)
        .map(|v| format!("{} {}", render::short_id(v), v.name))
        .unwrap_or_default();
      journal.delete(id).context("failed to delete version")?;
      Ok(format!("Deleted {label}\n"))
    }

    Command::Diff { a, b, json } => {
      let (ida, idb) = (resolve(journal, &a)?, resolve(journal, &b)?);
      let d = journal.diff(Some(ida), Some(idb));
      if json {
        return Ok(serde_json::to_string_pretty(&d)? + "\n");
      }
      let name =
        |id| journal.get(id).map(|v| v.name.clone()).unwrap_or_default();
      Ok(render::diff(&d, &name(ida), &name(idb)))
    }

    Command::Stats { json } => {
      let analytics = journal.analytics();
      if json {
        let report = StatsReport {
          summary:    analytics.summary(),
          emotion:    analytics.emotion_series(),
          traits:     analytics.trait_trends(),
          heatmap:    analytics.heatmap(),
          last_saved: ctx.last_saved.as_ref(),
        };
        return Ok(serde_json::to_string_pretty(&report)? + "\n");
      }
      let mut out = render::stats(&analytics);
      if let Some(at) = ctx.last_saved {
        let at = at.format("%Y-%m-%d %H:%M UTC");
        out.push_str(&format!("\nlast saved {at}\n"));
      }
      Ok(out)
    }

    Command::Reflect => match journal.reflect() {
      Ok(r) => Ok(format!("{r}\n")),
      Err(Error::InsufficientData { have }) => Ok(format!(
        "Not enough data yet: {have} version(s) recorded, add at least 2 to \
         reflect on your growth.\n"
      )),
      Err(e) => Err(e.into()),
    },
  }
}

/// Resolve a full id or a unique id prefix.
fn resolve<K: KeyValueStore>(
  journal: &VersionStore<K>,
  input: &str,
) -> Result<Uuid> {
  if let Ok(id) = Uuid::parse_str(input.trim()) {
    if journal.get(id).is_some() {
      return Ok(id);
    }
    bail!("no version matches {input:?}");
  }

  match journal.find_by_prefix(input).as_slice() {
    [v] => Ok(v.version_id),
    [] => bail!("no version matches {input:?}"),
    many => bail!("{input:?} is ambiguous: it matches {} versions", many.len()),
  }
}
