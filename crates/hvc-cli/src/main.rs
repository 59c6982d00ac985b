//! `hvc` — Human Version Control on the command line.
//!
//! # Usage
//!
//! ```text
//! hvc add "v2.0" --notes "new job" --tags work,career --confidence 8
//! hvc list --order oldest
//! hvc diff 3f2a9c1e 8b41d0aa
//! hvc stats
//! hvc reflect
//! ```

mod commands;
mod render;
mod settings;

use std::{io::Write as _, path::PathBuf};

use anyhow::{Context as _, Result};
use clap::Parser;
use commands::{Command, Context};
use hvc_core::{encode::VERSIONS_KEY, store::{LoadOutcome, VersionStore}};
use hvc_store_sqlite::SqliteStore;
use settings::{Settings, expand_tilde};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
  name = "hvc",
  version,
  about = "Track your personal growth like code"
)]
struct Cli {
  /// Path to a TOML config file (store_path, date_format, default_order).
  #[arg(short, long, value_name = "FILE", env = "HVC_CONFIG")]
  config: Option<PathBuf>,

  /// SQLite file holding the journal; overrides the configured store_path.
  #[arg(long, value_name = "FILE")]
  store: Option<PathBuf>,

  /// Allow changes even when the stored journal could not be read. The
  /// unreadable journal is replaced by a new one.
  #[arg(long, global = true)]
  discard_unreadable: bool,

  #[command(subcommand)]
  command: Command,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(cli.config.as_deref())?;

  // CLI flag overrides config file, which overrides defaults.
  let store_path = cli
    .store
    .as_deref()
    .map(expand_tilde)
    .unwrap_or_else(|| settings.store_path.clone());

  let kv = SqliteStore::open(&store_path).with_context(|| {
    format!("failed to open store at {}", store_path.display())
  })?;
  let (journal, outcome) = VersionStore::open(kv);
  let mut journal = journal
    .with_date_format(&settings.date_format)
    .context("invalid date_format in settings")?;

  let unreadable = outcome == LoadOutcome::Malformed;
  if unreadable {
    tracing::warn!(
      path = %store_path.display(),
      discard = cli.discard_unreadable,
      "stored journal was unreadable; showing an empty journal"
    );
  }

  let ctx = Context {
    default_order:      settings.default_order,
    journal_unreadable: unreadable && !cli.discard_unreadable,
    last_saved:         journal
      .kv()
      .updated_at(VERSIONS_KEY)
      .context("failed to read store metadata")?,
  };

  let output = commands::run(&mut journal, cli.command, &ctx)?;

  let mut stdout = std::io::stdout().lock();
  stdout.write_all(output.as_bytes())?;
  stdout.flush()?;
  Ok(())
}
