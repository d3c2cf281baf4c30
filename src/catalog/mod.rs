//! Catalog files consumed by the frontend, generated from the game folders.

mod generation;
mod scanning;

pub use generation::{CatalogSummary, generate_catalog};
pub use scanning::{list_game_ids, load_game_metadata};
