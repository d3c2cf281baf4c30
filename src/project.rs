//! Filesystem layout of the game collection.

use std::path::PathBuf;

use crate::models::ResourceRole;

/// Owned description of where games and generated catalog files live.
#[derive(Debug, Clone)]
pub struct ArcadeLayout {
  /// Directory holding one folder per game.
  pub games_dir: PathBuf,
  /// Directory receiving the generated catalog files.
  pub catalog_dir: PathBuf,
  /// Entry point file name inside each game folder.
  pub index_html_file: String,
  /// Name of the pre-localization copy of the entry point.
  pub backup_file: String,
  /// Metadata file name inside each game folder.
  pub metadata_file: String,
  /// File name of the generated id list.
  pub games_list_file: String,
  /// File name of the generated metadata list.
  pub games_metadata_file: String,
  /// Subdirectories that downloaded resources are grouped into.
  pub asset_dirs: AssetDirs,
}

/// Per-role subdirectory names inside a game folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDirs {
  /// Scripts referenced by `<script src>`.
  pub scripts: String,
  /// Stylesheets referenced by `<link rel=stylesheet>`.
  pub stylesheets: String,
  /// Images and favicons.
  pub images: String,
  /// Assets referenced from stylesheets via `url(...)`.
  pub css_assets: String,
}

impl Default for AssetDirs {
  fn default() -> Self {
    Self {
      scripts: "js".into(),
      stylesheets: "css".into(),
      images: "images".into(),
      css_assets: "assets".into(),
    }
  }
}

impl AssetDirs {
  /// Subdirectory a resource of the given role is stored under.
  pub fn dir_for(&self, role: ResourceRole) -> &str {
    match role {
      ResourceRole::Script => &self.scripts,
      ResourceRole::Stylesheet => &self.stylesheets,
      ResourceRole::Image | ResourceRole::Favicon => &self.images,
      ResourceRole::CssAsset => &self.css_assets,
    }
  }
}

impl ArcadeLayout {
  /// Layout rooted at `games_dir` using the default file names.
  pub fn with_games_dir(games_dir: impl Into<PathBuf>) -> Self {
    let mut config = crate::config::ArcadeConfig::default();
    let games_dir = games_dir.into();
    config.games_dir = games_dir.to_string_lossy().into_owned();
    config.into_layout()
  }

  /// Folder of a single game.
  pub fn game_dir(&self, game_id: &str) -> PathBuf {
    self.games_dir.join(game_id)
  }

  /// Entry point of a single game.
  pub fn index_path(&self, game_id: &str) -> PathBuf {
    self.game_dir(game_id).join(&self.index_html_file)
  }

  /// Pre-localization copy of a game's entry point.
  pub fn backup_path(&self, game_id: &str) -> PathBuf {
    self.game_dir(game_id).join(&self.backup_file)
  }

  /// Metadata file of a single game.
  pub fn metadata_path(&self, game_id: &str) -> PathBuf {
    self.game_dir(game_id).join(&self.metadata_file)
  }

  /// Location of the generated id list.
  pub fn games_list_path(&self) -> PathBuf {
    self.catalog_dir.join(&self.games_list_file)
  }

  /// Location of the generated metadata list.
  pub fn games_metadata_path(&self) -> PathBuf {
    self.catalog_dir.join(&self.games_metadata_file)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn resolves_per_game_paths() {
    let layout = ArcadeLayout::with_games_dir("site/games/html");
    assert_eq!(
      layout.index_path("slope"),
      PathBuf::from("site/games/html/slope/index.html")
    );
    assert_eq!(
      layout.backup_path("slope"),
      PathBuf::from("site/games/html/slope/index.html.backup")
    );
    assert_eq!(
      layout.games_list_path(),
      PathBuf::from("site/games/games-list.json")
    );
  }

  #[test]
  fn favicons_share_the_image_directory() {
    let dirs = AssetDirs::default();
    assert_eq!(dirs.dir_for(ResourceRole::Favicon), "images");
    assert_eq!(dirs.dir_for(ResourceRole::CssAsset), "assets");
    assert_eq!(dirs.dir_for(ResourceRole::Script), "js");
  }
}
