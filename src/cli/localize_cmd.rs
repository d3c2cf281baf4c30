//! `offline-arcade localize`: localize or restore games.

use anyhow::{Context, Result, bail};
use offline_arcade::config::ArcadeConfig;
use offline_arcade::fetch::HttpFetcher;
use offline_arcade::localizer::{GameLocalizer, list_games};

pub async fn run(config: ArcadeConfig, ids: Vec<String>, all: bool, restore: bool) -> Result<()> {
    let fetcher =
        HttpFetcher::new(config.fetch_settings()).context("failed to build HTTP client")?;
    let pacing = config.pacing_delay();
    let localizer = GameLocalizer::new(config.into_layout(), fetcher).with_pacing(pacing);

    let game_ids = if all || (restore && ids.is_empty()) {
        list_games(localizer.layout())?
    } else if !ids.is_empty() {
        ids
    } else {
        bail!("no games given; pass one or more game ids or --all");
    };

    let summary = if restore {
        println!("Restoring {} games", game_ids.len());
        localizer.restore_batch(&game_ids).await
    } else {
        println!("Found {} games to process", game_ids.len());
        localizer.localize_batch(&game_ids).await
    };

    println!("{}", "=".repeat(50));
    println!("Summary: {summary}");
    Ok(())
}
