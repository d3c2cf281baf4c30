use regex::Regex;

fn inline_reference_patterns() -> &'static [Regex] {
    use std::sync::OnceLock;

    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| vec![Regex::new(r"(?i)^data:").expect("invalid data URI regex")])
        .as_slice()
}

fn stylesheet_reference_patterns() -> &'static [Regex] {
    use std::sync::OnceLock;

    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            vec![
                Regex::new(r"(?i)^data:").expect("invalid data URI regex"),
                Regex::new(r"^#").expect("invalid fragment regex"),
            ]
        })
        .as_slice()
}

/// Determine whether an HTML attribute value should be left alone instead of downloaded.
///
/// Empty values and `data:` URIs carry no separately fetchable resource.
pub fn should_skip_reference(value: &str) -> bool {
    value.is_empty()
        || inline_reference_patterns()
            .iter()
            .any(|pattern| pattern.is_match(value))
}

/// Determine whether a stylesheet `url(...)` target should be left alone.
///
/// On top of [`should_skip_reference`], bare fragment anchors such as SVG filter references
/// (`url(#glow)`) point into the current document and are never downloaded.
pub fn should_skip_stylesheet_reference(value: &str) -> bool {
    value.is_empty()
        || stylesheet_reference_patterns()
            .iter()
            .any(|pattern| pattern.is_match(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_data_uris() {
        assert!(should_skip_reference("data:image/png;base64,abc"));
        assert!(should_skip_reference("DATA:text/plain,hi"));
    }

    #[test]
    fn skips_empty_values() {
        assert!(should_skip_reference(""));
        assert!(should_skip_stylesheet_reference(""));
    }

    #[test]
    fn keeps_relative_and_absolute_urls() {
        assert!(!should_skip_reference("js/game.js"));
        assert!(!should_skip_reference("https://cdn.example.com/game.js"));
        assert!(!should_skip_reference("#not-special-in-html"));
    }

    #[test]
    fn skips_fragments_only_in_stylesheets() {
        assert!(should_skip_stylesheet_reference("#glow"));
        assert!(should_skip_stylesheet_reference("data:font/woff2;base64,AAA"));
        assert!(!should_skip_stylesheet_reference("../img/x.png"));
    }
}
