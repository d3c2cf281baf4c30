//! Writing `games-list.json` and `games-metadata.json`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::catalog::scanning::{list_game_ids, load_game_metadata};
use crate::project::ArcadeLayout;

/// Counts reported after regenerating the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogSummary {
  /// Games written to the id list.
  pub games: usize,
  /// Metadata entries written; lower than `games` when some files failed to parse.
  pub metadata_entries: usize,
}

/// Regenerate both catalog files from the game folders.
pub fn generate_catalog(layout: &ArcadeLayout) -> Result<CatalogSummary> {
  let game_ids = list_game_ids(layout)?;
  let metadata = load_game_metadata(layout)?;

  fs::create_dir_all(&layout.catalog_dir)
    .with_context(|| format!("failed to create {}", layout.catalog_dir.display()))?;
  write_json(&layout.games_list_path(), &game_ids)?;
  write_json(&layout.games_metadata_path(), &metadata)?;

  info!(
    games = game_ids.len(),
    path = %layout.games_list_path().display(),
    "generated games list"
  );
  Ok(CatalogSummary {
    games: game_ids.len(),
    metadata_entries: metadata.len(),
  })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
  let json = serde_json::to_string_pretty(value)
    .with_context(|| format!("failed to serialize {}", path.display()))?;
  fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::GameMetadata;
  use tempfile::tempdir;

  #[test]
  fn writes_list_and_metadata_next_to_games_dir() {
    let dir = tempdir().unwrap();
    let games_dir = dir.path().join("games/html");
    for (game_id, name) in [("slope", "Slope"), ("2048", "2048")] {
      fs::create_dir_all(games_dir.join(game_id)).unwrap();
      fs::write(
        games_dir.join(game_id).join("metadata.json"),
        format!(r#"{{"id":"{game_id}","name":"{name}"}}"#),
      )
      .unwrap();
    }
    fs::create_dir_all(games_dir.join("wip")).unwrap();
    fs::create_dir_all(games_dir.join("broken")).unwrap();
    fs::write(games_dir.join("broken/metadata.json"), "{").unwrap();

    let layout = ArcadeLayout::with_games_dir(&games_dir);
    let summary = generate_catalog(&layout).unwrap();

    assert_eq!(summary, CatalogSummary {
      games: 3,
      metadata_entries: 2,
    });
    let list = fs::read_to_string(dir.path().join("games/games-list.json")).unwrap();
    assert_eq!(list, "[\n  \"2048\",\n  \"broken\",\n  \"slope\"\n]");

    let metadata: Vec<GameMetadata> = serde_json::from_str(
      &fs::read_to_string(dir.path().join("games/games-metadata.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(metadata.len(), 2);
    assert_eq!(metadata[1].name, "Slope");
  }

  #[test]
  fn fails_when_games_dir_is_missing() {
    let dir = tempdir().unwrap();
    let layout = ArcadeLayout::with_games_dir(dir.path().join("nowhere/html"));
    assert!(generate_catalog(&layout).is_err());
  }
}
