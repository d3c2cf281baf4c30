//! `offline-arcade catalog`: regenerate the catalog files.

use anyhow::Result;
use offline_arcade::catalog::generate_catalog;
use offline_arcade::config::ArcadeConfig;

pub fn run(config: ArcadeConfig) -> Result<()> {
    let layout = config.into_layout();
    let summary = generate_catalog(&layout)?;

    println!("Generated games list with {} games", summary.games);
    println!("  Saved to: {}", layout.games_list_path().display());
    if summary.metadata_entries != summary.games {
        println!(
            "  {} metadata files could not be read",
            summary.games - summary.metadata_entries
        );
    }
    Ok(())
}
