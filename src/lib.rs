#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fetch;
pub mod localize;
pub mod localizer;
pub mod models;
pub mod project;
pub mod server;

pub use config::ArcadeConfig;
pub use error::{FetchError, LocalizeError, LocalizeResult};
pub use fetch::{Fetch, FetchSettings, FetchedResource, HttpFetcher};
pub use localizer::GameLocalizer;
pub use models::{BatchSummary, GameMetadata, LocalizeOutcome, RestoreOutcome};
pub use project::{ArcadeLayout, AssetDirs};
