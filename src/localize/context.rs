//! Per-run download state: the cache of fetched URLs and the game folder they land in.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use tracing::{debug, info, warn};
use url::Url;

use crate::asset_paths::{derive_file_name, local_asset_file, reserve_local_asset_path};
use crate::error::{LocalizeError, LocalizeResult};
use crate::fetch::{Fetch, FetchedResource};
use crate::models::ResourceRole;
use crate::project::AssetDirs;

use super::css;

/// Mapping from absolute source URL to the game-relative path it was saved under.
///
/// Each URL is fetched at most once per run: successes are reused, failures are remembered
/// so later references to the same URL stay unresolved without another request.
#[derive(Debug, Clone, Default)]
pub struct DownloadCache {
  entries: BTreeMap<String, String>,
  failed: BTreeSet<String>,
  used_paths: BTreeSet<String>,
}

impl DownloadCache {
  /// Empty cache.
  pub fn new() -> Self {
    Self::default()
  }

  /// Local path recorded for `url`.
  pub fn get(&self, url: &str) -> Option<&str> {
    self.entries.get(url).map(String::as_str)
  }

  /// Whether a previous attempt to download `url` failed.
  pub fn has_failed(&self, url: &str) -> bool {
    self.failed.contains(url)
  }

  /// Number of distinct URLs downloaded.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Returns `true` when nothing has been downloaded.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Record a completed download.
  pub fn record(&mut self, url: impl Into<String>, local_path: impl Into<String>) {
    let local_path = local_path.into();
    self.used_paths.insert(local_path.clone());
    self.entries.insert(url.into(), local_path);
  }

  /// Remember that `url` could not be downloaded.
  pub fn record_failure(&mut self, url: impl Into<String>) {
    self.failed.insert(url.into());
  }

  /// Claim a local path for a new download, suffixing it when already taken.
  pub fn reserve_path(&mut self, subdir: &str, file_name: &str) -> String {
    reserve_local_asset_path(subdir, file_name, &mut self.used_paths)
  }

  /// Forget everything.
  pub fn clear(&mut self) {
    self.entries.clear();
    self.failed.clear();
    self.used_paths.clear();
  }
}

/// Everything a single localization run needs, passed explicitly through the pipeline.
pub struct LocalizationContext<'a> {
  fetcher: &'a dyn Fetch,
  game_dir: PathBuf,
  dirs: AssetDirs,
  cache: DownloadCache,
}

impl<'a> LocalizationContext<'a> {
  /// Fresh context writing into `game_dir` with an empty cache.
  pub fn new(fetcher: &'a dyn Fetch, game_dir: impl Into<PathBuf>, dirs: AssetDirs) -> Self {
    Self {
      fetcher,
      game_dir: game_dir.into(),
      dirs,
      cache: DownloadCache::new(),
    }
  }

  /// Number of distinct files downloaded so far.
  pub fn files_downloaded(&self) -> usize {
    self.cache.len()
  }

  /// Fetch a document without storing it, e.g. the page being localized.
  pub async fn fetch_document(&self, url: &Url) -> LocalizeResult<FetchedResource> {
    Ok(self.fetcher.fetch(url).await?)
  }

  /// Download `url` for the given role and return its game-relative path.
  ///
  /// Stylesheets additionally have their `url(...)` references localized. Failures are
  /// logged and yield `None`, leaving the caller's reference untouched.
  pub async fn localize_resource(&mut self, url: &Url, role: ResourceRole) -> Option<String> {
    match role {
      ResourceRole::Stylesheet => self.localize_stylesheet(url).await,
      role => self.localize_asset(url, role).await,
    }
  }

  /// Download a resource verbatim and return its game-relative path.
  pub async fn localize_asset(&mut self, url: &Url, role: ResourceRole) -> Option<String> {
    if let Some(cached) = self.cached(url) {
      return cached;
    }

    match self.download(url, role).await {
      Ok(local_path) => Some(local_path),
      Err(err) => {
        self.fail(url, &err);
        None
      }
    }
  }

  async fn localize_stylesheet(&mut self, url: &Url) -> Option<String> {
    if let Some(cached) = self.cached(url) {
      return cached;
    }

    match self.download_stylesheet(url).await {
      Ok(local_path) => Some(local_path),
      Err(err) => {
        self.fail(url, &err);
        None
      }
    }
  }

  fn cached(&self, url: &Url) -> Option<Option<String>> {
    if let Some(local_path) = self.cache.get(url.as_str()) {
      debug!(%url, local_path, "reusing download");
      return Some(Some(local_path.to_string()));
    }
    if self.cache.has_failed(url.as_str()) {
      debug!(%url, "skipping previously failed download");
      return Some(None);
    }
    None
  }

  fn fail(&mut self, url: &Url, err: &LocalizeError) {
    warn!(%url, error = %err, "failed to download");
    self.cache.record_failure(url.as_str());
  }

  async fn download(&mut self, url: &Url, role: ResourceRole) -> LocalizeResult<String> {
    info!(%url, "downloading");
    let resource = self.fetcher.fetch(url).await?;
    let file_name = derive_file_name(url, &resource.content_type);
    let local_path = self
      .cache
      .reserve_path(self.dirs.dir_for(role), &file_name);

    self.store(&local_path, &resource.body).await?;
    self.cache.record(url.as_str(), local_path.clone());
    Ok(local_path)
  }

  async fn download_stylesheet(&mut self, url: &Url) -> LocalizeResult<String> {
    info!(%url, "downloading stylesheet");
    let resource = self.fetcher.fetch(url).await?;
    let file_name = derive_file_name(url, &resource.content_type);
    let local_path = self
      .cache
      .reserve_path(self.dirs.dir_for(ResourceRole::Stylesheet), &file_name);

    let rewritten = css::rewrite_stylesheet(self, &resource.text(), &resource.url, &local_path).await;
    self.store(&local_path, rewritten.as_bytes()).await?;
    self.cache.record(url.as_str(), local_path.clone());
    Ok(local_path)
  }

  async fn store(&self, local_path: &str, body: &[u8]) -> LocalizeResult<()> {
    let file = local_asset_file(&self.game_dir, local_path);
    if let Some(parent) = file.parent() {
      tokio::fs::create_dir_all(parent)
        .await
        .map_err(|err| LocalizeError::io("create", parent, err))?;
    }
    tokio::fs::write(&file, body)
      .await
      .map_err(|err| LocalizeError::io("write", file, err))
  }
}
