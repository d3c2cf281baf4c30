//! Per-game orchestration: localize a wrapper page, restore it, and run either over a batch.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tracing::{error, info, warn};
use url::Url;

use crate::error::{LocalizeError, LocalizeResult};
use crate::fetch::Fetch;
use crate::localize::{LocalizationContext, find_iframe_src, rewrite_document};
use crate::models::{BatchSummary, LocalizeOutcome, RestoreOutcome, ScanEntry, SkipReason};
use crate::project::ArcadeLayout;

/// Delay between consecutive games when none is configured.
pub const DEFAULT_PACING: Duration = Duration::from_millis(500);

/// Drives localization of the games under an [`ArcadeLayout`].
pub struct GameLocalizer<F> {
  layout: ArcadeLayout,
  fetcher: F,
  pacing: Duration,
}

impl<F: Fetch> GameLocalizer<F> {
  /// Create a localizer for `layout` fetching through `fetcher`.
  pub fn new(layout: ArcadeLayout, fetcher: F) -> Self {
    Self {
      layout,
      fetcher,
      pacing: DEFAULT_PACING,
    }
  }

  /// Override the delay inserted between consecutive games of a batch.
  pub fn with_pacing(mut self, pacing: Duration) -> Self {
    self.pacing = pacing;
    self
  }

  /// Layout the localizer operates on.
  pub fn layout(&self) -> &ArcadeLayout {
    &self.layout
  }

  /// Replace a game's iframe wrapper with a local copy of the framed page.
  ///
  /// The wrapper is read from the backup when one exists, so re-running refreshes the
  /// offline copy from the original page. An `index.html` edited after the backup was taken
  /// is ignored: the backup's iframe is what gets localized, while [`scan`] reports the
  /// current `index.html`. `index.html` is only replaced once the whole document has been
  /// rewritten.
  pub async fn localize_game(&self, game_id: &str) -> LocalizeResult<LocalizeOutcome> {
    let index_path = self.layout.index_path(game_id);
    let backup_path = self.layout.backup_path(game_id);

    let (wrapper, has_backup) = match read_optional(&backup_path).await? {
      Some(original) => (original, true),
      None => (read_required(&index_path).await?, false),
    };

    let Some(iframe_src) = find_iframe_src(&String::from_utf8_lossy(&wrapper)) else {
      warn!(game = game_id, "not an iframe game, skipping");
      return Ok(LocalizeOutcome::Skipped(SkipReason::NotIframe));
    };
    let iframe_url = Url::parse(&iframe_src).map_err(|source| LocalizeError::InvalidUrl {
      url: iframe_src.clone(),
      source,
    })?;
    info!(game = game_id, iframe = %iframe_url, "localizing");

    let mut ctx = LocalizationContext::new(
      &self.fetcher,
      self.layout.game_dir(game_id),
      self.layout.asset_dirs.clone(),
    );
    let page = ctx.fetch_document(&iframe_url).await?;
    let rewritten = rewrite_document(&mut ctx, &page.text(), &page.url).await?;

    if !has_backup {
      write_backup(&backup_path, &wrapper).await?;
    }
    write_atomically(&index_path, rewritten.as_bytes()).await?;

    let files_downloaded = ctx.files_downloaded();
    info!(game = game_id, files_downloaded, "localized");
    Ok(LocalizeOutcome::Localized { files_downloaded })
  }

  /// Put the pre-localization `index.html` back. The backup itself is kept.
  pub async fn restore_game(&self, game_id: &str) -> LocalizeResult<RestoreOutcome> {
    let backup_path = self.layout.backup_path(game_id);
    let Some(original) = read_optional(&backup_path).await? else {
      warn!(game = game_id, "no backup found");
      return Ok(RestoreOutcome::NoBackup);
    };

    write_atomically(&self.layout.index_path(game_id), &original).await?;
    info!(game = game_id, "restored");
    Ok(RestoreOutcome::Restored)
  }

  /// Localize each game in turn, pausing between games. Failures are logged and counted.
  pub async fn localize_batch(&self, game_ids: &[String]) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for (position, game_id) in game_ids.iter().enumerate() {
      if position > 0 && !self.pacing.is_zero() {
        tokio::time::sleep(self.pacing).await;
      }

      match self.localize_game(game_id).await {
        Ok(LocalizeOutcome::Localized { .. }) => summary.succeeded += 1,
        Ok(LocalizeOutcome::Skipped(_)) => summary.skipped += 1,
        Err(err) => {
          error!(game = game_id.as_str(), error = %err, "localization failed");
          summary.failed += 1;
        }
      }
    }

    summary
  }

  /// Restore each game in turn. Games without a backup count as skipped.
  pub async fn restore_batch(&self, game_ids: &[String]) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for game_id in game_ids {
      match self.restore_game(game_id).await {
        Ok(RestoreOutcome::Restored) => summary.succeeded += 1,
        Ok(RestoreOutcome::NoBackup) => summary.skipped += 1,
        Err(err) => {
          error!(game = game_id.as_str(), error = %err, "restore failed");
          summary.failed += 1;
        }
      }
    }

    summary
  }
}

/// Visible game folders under the games directory, sorted by name.
pub fn list_games(layout: &ArcadeLayout) -> LocalizeResult<Vec<String>> {
  let games_dir = &layout.games_dir;
  let entries = fs::read_dir(games_dir).map_err(|err| LocalizeError::io("list", games_dir, err))?;

  let mut game_ids: Vec<String> = entries
    .flatten()
    .filter(|entry| entry.file_type().is_ok_and(|ft| ft.is_dir()))
    .map(|entry| entry.file_name().to_string_lossy().to_string())
    .filter(|game_id| !game_id.starts_with('.'))
    .collect();
  game_ids.sort();
  Ok(game_ids)
}

/// Games whose current `index.html` is an iframe wrapper.
pub fn scan(layout: &ArcadeLayout) -> LocalizeResult<Vec<ScanEntry>> {
  let mut found = Vec::new();

  for game_id in list_games(layout)? {
    let Ok(html) = fs::read_to_string(layout.index_path(&game_id)) else {
      continue;
    };
    if let Some(iframe_src) = find_iframe_src(&html) {
      found.push(ScanEntry {
        has_backup: layout.backup_path(&game_id).exists(),
        game_id,
        iframe_src,
      });
    }
  }

  Ok(found)
}

async fn read_required(path: &Path) -> LocalizeResult<Vec<u8>> {
  tokio::fs::read(path)
    .await
    .map_err(|err| LocalizeError::io("read", path, err))
}

async fn read_optional(path: &Path) -> LocalizeResult<Option<Vec<u8>>> {
  match tokio::fs::read(path).await {
    Ok(contents) => Ok(Some(contents)),
    Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
    Err(err) => Err(LocalizeError::io("read", path, err)),
  }
}

/// Write the original wrapper next to `index.html`, never replacing an existing backup.
async fn write_backup(path: &Path, original: &[u8]) -> LocalizeResult<()> {
  let mut file = match tokio::fs::OpenOptions::new()
    .write(true)
    .create_new(true)
    .open(path)
    .await
  {
    Ok(file) => file,
    Err(err) if err.kind() == ErrorKind::AlreadyExists => return Ok(()),
    Err(err) => return Err(LocalizeError::io("create", path, err)),
  };

  file
    .write_all(original)
    .await
    .map_err(|err| LocalizeError::io("write", path, err))?;
  file
    .flush()
    .await
    .map_err(|err| LocalizeError::io("write", path, err))
}

async fn write_atomically(path: &Path, contents: &[u8]) -> LocalizeResult<()> {
  let mut staging = path.as_os_str().to_owned();
  staging.push(".tmp");

  tokio::fs::write(&staging, contents)
    .await
    .map_err(|err| LocalizeError::io("write", &staging, err))?;
  tokio::fs::rename(&staging, path)
    .await
    .map_err(|err| LocalizeError::io("replace", path, err))
}
