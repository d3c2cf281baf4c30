//! Data structures produced while localizing and cataloguing games.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metadata describing a game, read from its `metadata.json`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GameMetadata {
  /// Stable identifier, matching the game folder name.
  pub id: String,
  /// Display name.
  pub name: String,
  /// Author or publisher credit.
  pub author: String,
  /// Short description shown in listings.
  pub description: String,
  /// Path to the thumbnail image.
  pub thumbnail: String,
  /// Category used by the frontend for grouping.
  pub category: String,
  /// Fields not covered above, carried through untouched.
  #[serde(flatten)]
  pub extra: BTreeMap<String, Value>,
}

/// Role a referenced resource plays in the page, which decides where it is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceRole {
  /// `<script src>`.
  Script,
  /// `<link rel=stylesheet href>`.
  Stylesheet,
  /// `<img src>`.
  Image,
  /// `<link rel=icon|shortcut icon href>`.
  Favicon,
  /// `url(...)` inside a downloaded stylesheet.
  CssAsset,
}

/// Single resource reference found in an HTML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceReference {
  /// Role of the reference.
  pub role: ResourceRole,
  /// Element the reference was found on.
  pub element: &'static str,
  /// Attribute carrying the reference.
  pub attribute: &'static str,
  /// Raw attribute value as written in the document.
  pub value: String,
}

/// Why a game was not localized even though nothing failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
  /// The wrapper page contains no iframe to localize.
  NotIframe,
}

impl fmt::Display for SkipReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::NotIframe => f.write_str("not-iframe"),
    }
  }
}

/// Result of localizing one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalizeOutcome {
  /// The game now runs from local files.
  Localized {
    /// Distinct resources downloaded during the run.
    files_downloaded: usize,
  },
  /// The game was left untouched.
  Skipped(SkipReason),
}

/// Result of restoring one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
  /// `index.html` now matches the backup.
  Restored,
  /// No backup exists for the game.
  NoBackup,
}

/// Game found by a scan for iframe wrapper pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanEntry {
  /// Game folder name.
  pub game_id: String,
  /// `src` of the wrapper's iframe.
  pub iframe_src: String,
  /// Whether a backup (and so a previous localization) exists.
  pub has_backup: bool,
}

/// Tally of a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
  /// Games localized or restored.
  pub succeeded: usize,
  /// Games skipped because a precondition was missing.
  pub skipped: usize,
  /// Games that failed with an error.
  pub failed: usize,
}

impl fmt::Display for BatchSummary {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} succeeded, {} failed, {} skipped",
      self.succeeded, self.failed, self.skipped
    )
  }
}
