//! Subcommand implementations for the `offline-arcade` binary.

pub mod catalog_cmd;
pub mod localize_cmd;
pub mod scan_cmd;
pub mod serve_cmd;
