use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Produce the game-relative path a downloaded resource is referenced by.
///
/// The generated path always uses forward slashes so that the rewritten documents work on
/// every platform, regardless of the native directory separator.
pub fn make_local_asset_path(subdir: &str, file_name: &str) -> String {
    let subdir = subdir.replace('\\', "/");
    let subdir = subdir.trim_matches('/');
    if subdir.is_empty() {
        file_name.to_string()
    } else {
        format!("{subdir}/{file_name}")
    }
}

/// Reserve a local path that no other resource of the current run uses.
///
/// Colliding names gain a numeric suffix before the extension (`main.js`, `main_1.js`, ...).
pub fn reserve_local_asset_path(
    subdir: &str,
    file_name: &str,
    used: &mut BTreeSet<String>,
) -> String {
    let base = make_local_asset_path(subdir, file_name);
    if used.insert(base.clone()) {
        return base;
    }

    let (stem, extension) = match file_name.rfind('.') {
        Some(index) if index > 0 => file_name.split_at(index),
        _ => (file_name, ""),
    };

    let mut counter = 1;
    loop {
        let candidate = make_local_asset_path(subdir, &format!("{stem}_{counter}{extension}"));
        if used.insert(candidate.clone()) {
            return candidate;
        }
        counter += 1;
    }
}

/// Path of `target` as seen from the document stored at `from_document`.
///
/// Both arguments are game-relative paths as produced by [`make_local_asset_path`].
pub fn relative_to_document(from_document: &str, target: &str) -> String {
    let from_dirs: Vec<&str> = from_document
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();
    let from_dirs = &from_dirs[..from_dirs.len().saturating_sub(1)];
    let target_segments: Vec<&str> = target
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();

    let shared = from_dirs
        .iter()
        .zip(&target_segments)
        .take_while(|(a, b)| a == b)
        .count()
        .min(target_segments.len().saturating_sub(1));

    let mut parts: Vec<&str> = vec![".."; from_dirs.len() - shared];
    parts.extend_from_slice(&target_segments[shared..]);
    parts.join("/")
}

/// Location on disk of a game-relative path.
pub fn local_asset_file(game_dir: &Path, local_path: &str) -> PathBuf {
    local_path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold(game_dir.to_path_buf(), |path, segment| path.join(segment))
}
