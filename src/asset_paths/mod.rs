//! Helpers for naming and placing downloaded resources inside a game folder.
//!
//! The logic for filtering references, deriving sanitized file names, and building
//! game-relative paths lives in focused submodules so each piece can be tested on its own.

mod bundle;
mod filters;
mod naming;

pub use bundle::{
    local_asset_file, make_local_asset_path, relative_to_document, reserve_local_asset_path,
};
pub use filters::{should_skip_reference, should_skip_stylesheet_reference};
pub use naming::{
    CONTENT_TYPE_EXTENSIONS, derive_file_name, extension_for_content_type, sanitize_filename,
    url_file_name,
};
