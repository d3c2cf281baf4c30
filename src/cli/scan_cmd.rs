//! `offline-arcade scan`: report games that are still iframe wrappers.

use anyhow::Result;
use offline_arcade::config::ArcadeConfig;
use offline_arcade::localizer::scan;

pub fn run(config: ArcadeConfig) -> Result<()> {
    let found = scan(&config.into_layout())?;

    println!("Found {} iframe games:", found.len());
    for entry in &found {
        let marker = if entry.has_backup { " (has backup)" } else { "" };
        println!("  - {} -> {}{}", entry.game_id, entry.iframe_src, marker);
    }

    if !found.is_empty() {
        let ids: Vec<&str> = found.iter().map(|entry| entry.game_id.as_str()).collect();
        println!("\nTo localize all: offline-arcade localize {}", ids.join(" "));
    }
    Ok(())
}
