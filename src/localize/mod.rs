//! Download and rewrite pipeline for a single remote page.
//!
//! [`LocalizationContext`] carries the per-run state (fetcher, target folder, download
//! cache). The [`html`] and [`css`] modules walk documents and stylesheets through it.

mod context;
pub mod css;
mod dom;
pub mod html;
pub mod iframe;

pub use context::{DownloadCache, LocalizationContext};
pub use css::{replace_url_tokens, rewrite_stylesheet, stylesheet_references};
pub use html::{apply_local_paths, discover_references, rewrite_document};
pub use iframe::find_iframe_src;
