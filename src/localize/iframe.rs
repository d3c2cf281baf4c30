//! Locating the remote game behind an iframe wrapper page.

use super::dom;

/// `src` of the first `<iframe>` with a non-empty source, trimmed.
pub fn find_iframe_src(html: &str) -> Option<String> {
  let document = dom::parse(html);
  dom::elements(&document)
    .iter()
    .filter(|handle| dom::tag_name(handle) == Some("iframe"))
    .filter_map(|handle| dom::attribute(handle, "src"))
    .map(|src| src.trim().to_string())
    .find(|src| !src.is_empty())
}
