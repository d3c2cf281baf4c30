//! Discovery and rewriting of resource references in an HTML document.
//!
//! The document is walked twice: once to collect references, and once after all downloads
//! completed to point each reference at its local copy. Downloads happen in between, so no
//! DOM handle is held across an await point.

use std::collections::HashMap;

use markup5ever_rcdom::{Handle, RcDom};
use tracing::{debug, warn};
use url::Url;

use crate::asset_paths::should_skip_reference;
use crate::error::{LocalizeError, LocalizeResult};
use crate::models::{ResourceReference, ResourceRole};

use super::context::LocalizationContext;
use super::dom;

fn rel_matches(handle: &Handle, accepted: &[&str]) -> bool {
  dom::attribute(handle, "rel").is_some_and(|rel| {
    let rel = rel.trim();
    accepted
      .iter()
      .any(|candidate| rel.eq_ignore_ascii_case(candidate))
  })
}

fn reference(
  handle: &Handle,
  role: ResourceRole,
  element: &'static str,
  attribute: &'static str,
) -> Option<(Handle, ResourceReference)> {
  let value = dom::attribute(handle, attribute)?;
  if should_skip_reference(&value) {
    return None;
  }
  Some((handle.clone(), ResourceReference {
    role,
    element,
    attribute,
    value,
  }))
}

fn with_tag<'a>(elements: &'a [Handle], tag: &'static str) -> impl Iterator<Item = &'a Handle> {
  elements
    .iter()
    .filter(move |handle| dom::tag_name(handle) == Some(tag))
}

/// Elements carrying localizable references, in processing order.
///
/// Scripts come first, then stylesheets, then images, then the first favicon link.
fn matched_references(document: &RcDom) -> Vec<(Handle, ResourceReference)> {
  let elements = dom::elements(document);

  let mut matched = Vec::new();
  matched.extend(
    with_tag(&elements, "script").filter_map(|handle| reference(handle, ResourceRole::Script, "script", "src")),
  );
  matched.extend(
    with_tag(&elements, "link")
      .filter(|handle| rel_matches(handle, &["stylesheet"]))
      .filter_map(|handle| reference(handle, ResourceRole::Stylesheet, "link", "href")),
  );
  matched.extend(
    with_tag(&elements, "img").filter_map(|handle| reference(handle, ResourceRole::Image, "img", "src")),
  );
  if let Some(favicon) = with_tag(&elements, "link").find(|handle| rel_matches(handle, &["icon", "shortcut icon"])) {
    matched.extend(reference(favicon, ResourceRole::Favicon, "link", "href"));
  }

  matched
}

/// Resource references in `html` that localization would download, in processing order.
pub fn discover_references(html: &str) -> Vec<ResourceReference> {
  matched_references(&dom::parse(html))
    .into_iter()
    .map(|(_, reference)| reference)
    .collect()
}

/// Point every reference whose absolute URL appears in `local_paths` at the local copy.
///
/// `local_paths` maps absolute URLs (resolved against `base`) to game-relative paths.
pub fn apply_local_paths(
  html: &str,
  base: &Url,
  local_paths: &HashMap<String, String>,
) -> LocalizeResult<String> {
  let document = dom::parse(html);
  for (handle, reference) in matched_references(&document) {
    let Ok(absolute) = base.join(&reference.value) else {
      continue;
    };
    if let Some(local_path) = local_paths.get(absolute.as_str()) {
      dom::set_attribute(&handle, reference.attribute, local_path);
    }
  }

  dom::serialize_document(&document).map_err(LocalizeError::Serialize)
}

/// Download every resource referenced by `html` and return the rewritten document.
///
/// `base` is the document's own URL. References that cannot be resolved or downloaded keep
/// their original value.
pub async fn rewrite_document(
  ctx: &mut LocalizationContext<'_>,
  html: &str,
  base: &Url,
) -> LocalizeResult<String> {
  let references = discover_references(html);
  debug!(%base, count = references.len(), "discovered resource references");

  let mut local_paths: HashMap<String, String> = HashMap::new();
  for reference in references {
    let absolute = match base.join(&reference.value) {
      Ok(url) => url,
      Err(err) => {
        warn!(
          %base,
          element = reference.element,
          value = %reference.value,
          error = %err,
          "unresolvable reference"
        );
        continue;
      }
    };
    if local_paths.contains_key(absolute.as_str()) {
      continue;
    }

    if let Some(local_path) = ctx.localize_resource(&absolute, reference.role).await {
      local_paths.insert(absolute.to_string(), local_path);
    }
  }

  apply_local_paths(html, base, &local_paths)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::fetch::testing::StaticFetcher;
  use crate::project::AssetDirs;
  use tempfile::tempdir;

  const PAGE: &str = "https://games.example/slope/";

  fn base() -> Url {
    Url::parse(PAGE).unwrap()
  }

  #[test]
  fn discovers_references_in_processing_order() {
    let html = r#"<html><head>
      <link rel="icon" href="favicon.ico">
      <link rel="shortcut icon" href="other.ico">
      <link rel="stylesheet" href="style.css">
      <link rel="preload" href="skip.js">
      <script>inline()</script>
      <script src="game.js"></script>
    </head><body>
      <img src="data:image/png;base64,AAAA">
      <img src="logo.png">
      <img src="">
      <iframe src="ads.html"></iframe>
    </body></html>"#;

    let found: Vec<(ResourceRole, String)> = discover_references(html)
      .into_iter()
      .map(|reference| (reference.role, reference.value))
      .collect();

    assert_eq!(found, vec![
      (ResourceRole::Script, "game.js".to_string()),
      (ResourceRole::Stylesheet, "style.css".to_string()),
      (ResourceRole::Image, "logo.png".to_string()),
      (ResourceRole::Favicon, "favicon.ico".to_string()),
    ]);
  }

  #[test]
  fn matches_rel_case_insensitively() {
    let html = r#"<link rel="StyleSheet" href="a.css"><link rel="Shortcut Icon" href="b.ico">"#;
    let roles: Vec<ResourceRole> = discover_references(html)
      .into_iter()
      .map(|reference| reference.role)
      .collect();
    assert_eq!(roles, vec![ResourceRole::Stylesheet, ResourceRole::Favicon]);
  }

  #[tokio::test]
  async fn duplicate_images_share_one_download() {
    let dir = tempdir().unwrap();
    let fetcher = StaticFetcher::default()
      .with("https://games.example/slope/ball.png", "image/png", b"ball".to_vec());
    let mut ctx = LocalizationContext::new(&fetcher, dir.path(), AssetDirs::default());

    let html = r#"<html><body><img src="ball.png"><img src="https://games.example/slope/ball.png"></body></html>"#;
    let rewritten = rewrite_document(&mut ctx, html, &base()).await.unwrap();

    assert_eq!(fetcher.request_count("https://games.example/slope/ball.png"), 1);
    assert_eq!(rewritten.matches("src=\"images/ball.png\"").count(), 2);
    assert_eq!(ctx.files_downloaded(), 1);
  }

  #[tokio::test]
  async fn stylesheet_assets_land_in_asset_dir() {
    let dir = tempdir().unwrap();
    let fetcher = StaticFetcher::default()
      .with(
        "https://games.example/slope/css/main.css",
        "text/css",
        b"body { background: url(../img/x.png) }".to_vec(),
      )
      .with("https://games.example/slope/img/x.png", "image/png", b"x".to_vec());
    let mut ctx = LocalizationContext::new(&fetcher, dir.path(), AssetDirs::default());

    let html = r#"<html><head><link rel="stylesheet" href="css/main.css"></head><body></body></html>"#;
    let rewritten = rewrite_document(&mut ctx, html, &base()).await.unwrap();

    assert!(rewritten.contains("href=\"css/main.css\""));
    assert!(dir.path().join("assets/x.png").exists());
    let css = std::fs::read_to_string(dir.path().join("css/main.css")).unwrap();
    assert_eq!(css, "body { background: url('../assets/x.png') }");
    assert_eq!(ctx.files_downloaded(), 2);
  }

  #[tokio::test]
  async fn failed_downloads_keep_original_reference() {
    let dir = tempdir().unwrap();
    let fetcher = StaticFetcher::default()
      .with("https://cdn.example/engine.js", "application/javascript", b"js".to_vec());
    let mut ctx = LocalizationContext::new(&fetcher, dir.path(), AssetDirs::default());

    let html = r#"<html><head><script src="https://cdn.example/engine.js"></script><script src="missing.js"></script></head><body></body></html>"#;
    let rewritten = rewrite_document(&mut ctx, html, &base()).await.unwrap();

    assert!(rewritten.contains("src=\"js/engine.js\""));
    assert!(rewritten.contains("src=\"missing.js\""));
    assert_eq!(ctx.files_downloaded(), 1);
  }

  #[tokio::test]
  async fn data_uris_are_never_fetched() {
    let dir = tempdir().unwrap();
    let fetcher = StaticFetcher::default();
    let mut ctx = LocalizationContext::new(&fetcher, dir.path(), AssetDirs::default());

    let html = r#"<html><body><img src="data:image/gif;base64,R0lGODlh"></body></html>"#;
    let rewritten = rewrite_document(&mut ctx, html, &base()).await.unwrap();

    assert!(fetcher.requests().is_empty());
    assert!(rewritten.contains("data:image/gif;base64,R0lGODlh"));
  }

  #[tokio::test]
  async fn extensionless_urls_gain_extension_from_content_type() {
    let dir = tempdir().unwrap();
    let fetcher = StaticFetcher::default()
      .with("https://games.example/slope/sprite", "image/png", b"png".to_vec());
    let mut ctx = LocalizationContext::new(&fetcher, dir.path(), AssetDirs::default());

    let rewritten = rewrite_document(&mut ctx, r#"<img src="sprite">"#, &base())
      .await
      .unwrap();

    assert!(rewritten.contains("src=\"images/sprite.png\""));
    assert!(dir.path().join("images/sprite.png").exists());
  }
}
