//! Project configuration loader describing where games live and how they are localized.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::fetch::FetchSettings;
use crate::project::{ArcadeLayout, AssetDirs};

/// File name searched for in the working directory when no explicit config is given.
pub const DEFAULT_CONFIG_FILE: &str = "arcade.config.json";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Discoverable project configuration describing filesystem layout and fetch behaviour.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArcadeConfig {
    /// Directory holding one folder per game.
    pub games_dir: String,
    /// Directory receiving `games-list.json` and `games-metadata.json`.
    ///
    /// Falls back to the parent of `games_dir` when left empty.
    pub catalog_dir: String,
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
    /// Subdirectory for downloaded scripts.
    pub script_dir: String,
    /// Subdirectory for downloaded stylesheets.
    pub stylesheet_dir: String,
    /// Subdirectory for downloaded images and favicons.
    pub image_dir: String,
    /// Subdirectory for assets referenced from stylesheets.
    pub css_asset_dir: String,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Extra headers sent with every request.
    pub headers: BTreeMap<String, String>,
    /// Maximum number of 301/302 hops followed for a single fetch.
    pub max_redirects: usize,
    /// Optional per-request timeout. Requests never time out when unset.
    pub request_timeout_secs: Option<u64>,
    /// Pause between consecutive games in a batch.
    pub pacing_delay_ms: u64,
    /// Lifetime of the cached metadata list served by the HTTP API.
    pub metadata_cache_ttl_secs: u64,
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            games_dir: "static/games/html".into(),
            catalog_dir: String::new(),
            index_html_file: "index.html".into(),
            backup_file: "index.html.backup".into(),
            metadata_file: "metadata.json".into(),
            games_list_file: "games-list.json".into(),
            games_metadata_file: "games-metadata.json".into(),
            script_dir: "js".into(),
            stylesheet_dir: "css".into(),
            image_dir: "images".into(),
            css_asset_dir: "assets".into(),
            user_agent: DEFAULT_USER_AGENT.into(),
            headers: BTreeMap::new(),
            max_redirects: 10,
            request_timeout_secs: None,
            pacing_delay_ms: 500,
            metadata_cache_ttl_secs: 60,
        }
    }
}

impl ArcadeConfig {
    /// Attempt to load configuration from the provided directory.
    ///
    /// When the configuration file does not exist or fails to parse we fallback to default
    /// values so downstream callers can continue operating with sensible assumptions.
    pub fn discover(dir: &Path) -> Self {
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        Self::from_path(&candidate).unwrap_or_default()
    }

    /// Read configuration from a specific JSON file.
    pub fn from_path(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&content) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "ignoring unparsable config");
                None
            }
        }
    }

    /// Convert the configuration into an owned layout description.
    pub fn into_layout(self) -> ArcadeLayout {
        let games_dir = PathBuf::from(&self.games_dir);
        let catalog_dir = if self.catalog_dir.is_empty() {
            games_dir
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        } else {
            PathBuf::from(&self.catalog_dir)
        };

        ArcadeLayout {
            games_dir,
            catalog_dir,
            index_html_file: self.index_html_file,
            backup_file: self.backup_file,
            metadata_file: self.metadata_file,
            games_list_file: self.games_list_file,
            games_metadata_file: self.games_metadata_file,
            asset_dirs: AssetDirs {
                scripts: self.script_dir,
                stylesheets: self.stylesheet_dir,
                images: self.image_dir,
                css_assets: self.css_asset_dir,
            },
        }
    }

    /// Settings for the HTTP fetcher derived from this configuration.
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            user_agent: self.user_agent.clone(),
            headers: self
                .headers
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
            max_redirects: self.max_redirects,
            timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }

    /// Delay inserted between consecutive games.
    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }

    /// Time-to-live for the cached metadata list.
    pub fn metadata_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.metadata_cache_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn discover_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let config = ArcadeConfig::discover(dir.path());
        assert_eq!(config.games_dir, "static/games/html");
        assert_eq!(config.max_redirects, 10);
        assert_eq!(config.pacing_delay(), Duration::from_millis(500));
    }

    #[test]
    fn discover_reads_partial_overrides() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            r#"{"games_dir": "public/games", "pacing_delay_ms": 0, "request_timeout_secs": 30}"#,
        )
        .unwrap();

        let config = ArcadeConfig::discover(dir.path());
        assert_eq!(config.games_dir, "public/games");
        assert_eq!(config.pacing_delay(), Duration::ZERO);
        assert_eq!(config.backup_file, "index.html.backup");
        assert_eq!(
            config.fetch_settings().timeout,
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn unparsable_config_is_ignored() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "{ not json").unwrap();
        let config = ArcadeConfig::discover(dir.path());
        assert_eq!(config.script_dir, "js");
    }

    #[test]
    fn catalog_dir_defaults_to_parent_of_games_dir() {
        let layout = ArcadeConfig::default().into_layout();
        assert_eq!(layout.catalog_dir, PathBuf::from("static/games"));
        assert_eq!(layout.asset_dirs.css_assets, "assets");
    }
}
