//! `offline-arcade serve`: run the catalog API.

use std::sync::Arc;

use anyhow::Result;
use offline_arcade::config::ArcadeConfig;
use offline_arcade::server::{ArcadeState, serve};

pub async fn run(config: ArcadeConfig, port: u16) -> Result<()> {
    let ttl = config.metadata_cache_ttl();
    let state = ArcadeState::new(config.into_layout(), ttl);
    serve(port, Arc::new(state)).await
}
