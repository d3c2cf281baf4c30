//! HTTP API serving the game catalog and the game folders themselves.
//!
//! `GET /api/games` lists game ids straight from disk on every call, while
//! `GET /api/games/metadata` is answered from an in-process cache refreshed after a TTL.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{debug, error, info};

use crate::catalog::{list_game_ids, load_game_metadata};
use crate::models::GameMetadata;
use crate::project::ArcadeLayout;

/// Metadata list kept in memory until it is older than the TTL.
#[derive(Debug)]
pub struct MetadataCache {
  ttl: Duration,
  entry: Option<(Instant, Vec<GameMetadata>)>,
}

impl MetadataCache {
  /// Empty cache with the given time-to-live.
  pub fn new(ttl: Duration) -> Self {
    Self { ttl, entry: None }
  }

  /// Cached list when still fresh at `now`, otherwise the result of `load`.
  ///
  /// A failed load is logged and answered with an empty list; it is not cached.
  pub fn get_or_refresh(
    &mut self,
    now: Instant,
    load: impl FnOnce() -> anyhow::Result<Vec<GameMetadata>>,
  ) -> Vec<GameMetadata> {
    if let Some((loaded_at, games)) = &self.entry
      && now.saturating_duration_since(*loaded_at) < self.ttl
    {
      debug!(games = games.len(), "serving cached metadata");
      return games.clone();
    }

    match load() {
      Ok(games) => {
        self.entry = Some((now, games.clone()));
        games
      }
      Err(err) => {
        error!(error = %err, "failed to load games metadata");
        Vec::new()
      }
    }
  }

  /// Drop the cached list.
  pub fn invalidate(&mut self) {
    self.entry = None;
  }
}

/// State shared by all request handlers.
pub struct ArcadeState {
  layout: ArcadeLayout,
  metadata: Mutex<MetadataCache>,
}

impl ArcadeState {
  /// State for `layout` with a metadata cache of the given TTL.
  pub fn new(layout: ArcadeLayout, metadata_ttl: Duration) -> Self {
    Self {
      layout,
      metadata: Mutex::new(MetadataCache::new(metadata_ttl)),
    }
  }
}

/// Build the router: the catalog API plus static files under `/games`.
pub fn router(state: Arc<ArcadeState>) -> Router {
  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods(Any)
    .allow_headers(Any);
  let static_games = ServeDir::new(&state.layout.catalog_dir);

  Router::new()
    .route("/api/games", get(handle_list_games))
    .route("/api/games/metadata", get(handle_games_metadata))
    .nest_service("/games", static_games)
    .layer(cors)
    .with_state(state)
}

/// Serve the API on localhost until the process is stopped.
pub async fn serve(port: u16, state: Arc<ArcadeState>) -> anyhow::Result<()> {
  let app = router(state);
  let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
  info!("serving games on http://{addr}");

  let listener = tokio::net::TcpListener::bind(addr).await?;
  axum::serve(listener, app).await?;
  Ok(())
}

async fn handle_list_games(State(state): State<Arc<ArcadeState>>) -> Json<Vec<String>> {
  match list_game_ids(&state.layout) {
    Ok(game_ids) => Json(game_ids),
    Err(err) => {
      error!(error = %err, "failed to list games");
      Json(Vec::new())
    }
  }
}

async fn handle_games_metadata(State(state): State<Arc<ArcadeState>>) -> Json<Vec<GameMetadata>> {
  let mut cache = state
    .metadata
    .lock()
    .unwrap_or_else(PoisonError::into_inner);
  Json(cache.get_or_refresh(Instant::now(), || load_game_metadata(&state.layout)))
}
