//! Directory scanning utilities for discovering catalogued games.

use std::fs;

use anyhow::{Context, Result};
use tracing::warn;

use crate::models::GameMetadata;
use crate::project::ArcadeLayout;

/// Names of the game folders that carry a metadata file, sorted.
pub fn list_game_ids(layout: &ArcadeLayout) -> Result<Vec<String>> {
    let games_dir = &layout.games_dir;
    let entries = fs::read_dir(games_dir)
        .with_context(|| format!("failed to read games directory {}", games_dir.display()))?;

    let mut game_ids = Vec::new();
    for entry in entries.flatten() {
        if !entry.file_type().is_ok_and(|ft| ft.is_dir()) {
            continue;
        }

        let game_id = entry.file_name().to_string_lossy().to_string();
        if game_id.starts_with('.') {
            continue;
        }

        if entry.path().join(&layout.metadata_file).is_file() {
            game_ids.push(game_id);
        }
    }

    game_ids.sort();
    Ok(game_ids)
}

/// Metadata of every listed game. Files that cannot be read or parsed are logged and skipped.
///
/// An empty `id` is filled in from the folder name.
pub fn load_game_metadata(layout: &ArcadeLayout) -> Result<Vec<GameMetadata>> {
    let mut games = Vec::new();

    for game_id in list_game_ids(layout)? {
        let path = layout.metadata_path(&game_id);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                warn!(game = game_id.as_str(), path = %path.display(), error = %err, "unreadable metadata");
                continue;
            }
        };

        let mut metadata: GameMetadata = match serde_json::from_str(&content) {
            Ok(metadata) => metadata,
            Err(err) => {
                warn!(game = game_id.as_str(), path = %path.display(), error = %err, "invalid metadata");
                continue;
            }
        };
        if metadata.id.is_empty() {
            metadata.id = game_id;
        }
        games.push(metadata);
    }

    Ok(games)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;

    fn add_game(games_dir: &Path, game_id: &str, metadata: Option<&str>) {
        let dir = games_dir.join(game_id);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("index.html"), "<html></html>").unwrap();
        if let Some(metadata) = metadata {
            fs::write(dir.join("metadata.json"), metadata).unwrap();
        }
    }

    #[test]
    fn lists_only_folders_with_metadata() {
        let dir = tempdir().unwrap();
        let games_dir = dir.path().join("html");
        add_game(&games_dir, "slope", Some("{}"));
        add_game(&games_dir, "2048", Some("{}"));
        add_game(&games_dir, "draft", None);
        add_game(&games_dir, ".hidden", Some("{}"));

        let layout = ArcadeLayout::with_games_dir(&games_dir);
        assert_eq!(list_game_ids(&layout).unwrap(), vec!["2048".to_string(), "slope".to_string()]);
    }

    #[test]
    fn missing_games_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let layout = ArcadeLayout::with_games_dir(dir.path().join("absent"));
        let err = list_game_ids(&layout).unwrap_err();
        assert!(err.to_string().contains("failed to read games directory"));
    }

    #[test]
    fn loads_metadata_and_skips_broken_files() {
        let dir = tempdir().unwrap();
        let games_dir = dir.path().join("html");
        add_game(
            &games_dir,
            "slope",
            Some(r#"{"id":"slope","name":"Slope","author":"Y8","category":"arcade","rating":5}"#),
        );
        add_game(&games_dir, "broken", Some("{ nope"));
        add_game(&games_dir, "anon", Some(r#"{"name":"Anonymous"}"#));

        let layout = ArcadeLayout::with_games_dir(&games_dir);
        let games = load_game_metadata(&layout).unwrap();

        assert_eq!(games.len(), 2);
        assert_eq!(games[0].id, "anon");
        assert_eq!(games[1].name, "Slope");
        assert_eq!(games[1].extra.get("rating"), Some(&serde_json::json!(5)));
    }
}
