//! Layered configuration: built-in defaults, then an optional TOML file, then
//! `HVC_*` environment variables.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use hvc_core::{version::DEFAULT_DATE_FORMAT, view::SortOrder};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "~/.config/hvc/config.toml";
const DEFAULT_STORE_PATH: &str = "~/.local/share/hvc/versions.db";

/// Runtime configuration for the `hvc` binary.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// SQLite file holding the journal. A leading `~` is expanded.
  pub store_path:    PathBuf,
  /// strftime pattern for the display date of new versions.
  pub date_format:   String,
  /// Timeline order when `list` is given no `--order`.
  pub default_order: SortOrder,
}

impl Settings {
  /// Read settings from `file` (required when given explicitly) or the
  /// default config path (optional), overlaid with the environment.
  pub fn load(file: Option<&Path>) -> Result<Self> {
    let (path, required) = match file {
      Some(p) => (p.to_path_buf(), true),
      None => (expand_tilde(Path::new(DEFAULT_CONFIG_PATH)), false),
    };

    let settings = config::Config::builder()
      .set_default("store_path", DEFAULT_STORE_PATH)?
      .set_default("date_format", DEFAULT_DATE_FORMAT)?
      .set_default("default_order", "newest")?
      .add_source(config::File::from(path.clone()).required(required))
      .add_source(config::Environment::with_prefix("HVC"))
      .build()
      .with_context(|| {
        format!("failed to read config file {}", path.display())
      })?;

    let mut settings: Settings = settings
      .try_deserialize()
      .context("failed to deserialise settings")?;
    settings.store_path = expand_tilde(&settings.store_path);
    Ok(settings)
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
