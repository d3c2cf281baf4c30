use std::path::Path;

use url::Url;

/// Content types recognised when a downloaded file has no extension.
///
/// Lookup walks the table in order and takes the first entry contained in the declared
/// content type, so the order is part of the contract for ambiguous types.
pub const CONTENT_TYPE_EXTENSIONS: &[(&str, &str)] = &[
    ("text/html", ".html"),
    ("text/css", ".css"),
    ("text/javascript", ".js"),
    ("application/javascript", ".js"),
    ("application/json", ".json"),
    ("image/png", ".png"),
    ("image/jpeg", ".jpg"),
    ("image/gif", ".gif"),
    ("image/svg+xml", ".svg"),
    ("image/webp", ".webp"),
    ("audio/mpeg", ".mp3"),
    ("audio/ogg", ".ogg"),
    ("audio/wav", ".wav"),
    ("font/woff", ".woff"),
    ("font/woff2", ".woff2"),
    ("font/ttf", ".ttf"),
    ("application/wasm", ".wasm"),
];

/// Extension (with leading dot) inferred from a `Content-Type` header value.
pub fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    CONTENT_TYPE_EXTENSIONS
        .iter()
        .find(|(mime, _)| content_type.contains(mime))
        .map(|(_, extension)| *extension)
}

/// Replace every character outside `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Last non-empty segment of the URL path, or `index` for the root.
pub fn url_file_name(url: &Url) -> &str {
    url.path()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or("index")
}

/// Name a downloaded resource is stored under.
///
/// The name comes from the URL, gains an extension from the content type when it has none,
/// and is sanitized last.
pub fn derive_file_name(url: &Url, content_type: &str) -> String {
    let mut name = url_file_name(url).to_string();
    if Path::new(&name).extension().is_none()
        && let Some(extension) = extension_for_content_type(content_type)
    {
        name.push_str(extension);
    }
    sanitize_filename(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn sanitizes_illegal_characters() {
        assert_eq!(sanitize_filename("weird name?.png"), "weird_name_.png");
        assert_eq!(sanitize_filename("ok-file_1.min.js"), "ok-file_1.min.js");
        assert_eq!(sanitize_filename("spr%C3%A9.png"), "spr_C3_A9.png");
    }

    #[test]
    fn first_matching_content_type_wins() {
        assert_eq!(extension_for_content_type("image/png"), Some(".png"));
        assert_eq!(
            extension_for_content_type("text/html; charset=utf-8"),
            Some(".html")
        );
        assert_eq!(
            extension_for_content_type("application/javascript"),
            Some(".js")
        );
        // "font/woff2" contains "font/woff", which is listed first.
        assert_eq!(extension_for_content_type("font/woff2"), Some(".woff"));
        assert_eq!(extension_for_content_type("application/octet-stream"), None);
    }

    #[test]
    fn takes_last_path_segment() {
        assert_eq!(url_file_name(&url("https://a.example/x/y/game.js?v=3")), "game.js");
        assert_eq!(url_file_name(&url("https://a.example/x/levels/")), "levels");
        assert_eq!(url_file_name(&url("https://a.example/")), "index");
    }

    #[test]
    fn appends_extension_from_content_type() {
        let name = derive_file_name(&url("https://cdn.example/sprite"), "image/png");
        assert_eq!(name, "sprite.png");
    }

    #[test]
    fn keeps_existing_extension() {
        let name = derive_file_name(&url("https://cdn.example/app.bundle.js"), "text/plain");
        assert_eq!(name, "app.bundle.js");
    }

    #[test]
    fn leaves_unknown_types_without_extension() {
        let name = derive_file_name(&url("https://cdn.example/blob"), "application/x-custom");
        assert_eq!(name, "blob");
    }

    #[test]
    fn root_documents_become_index() {
        let name = derive_file_name(&url("https://games.example/"), "text/html");
        assert_eq!(name, "index.html");
    }
}
