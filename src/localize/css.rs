//! Localization of `url(...)` references inside stylesheets.
//!
//! Tokens are replaced verbatim rather than through a CSS rewrite; every match is an exact
//! substring of the source, so untouched parts of the stylesheet stay byte-identical.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use tracing::warn;
use url::Url;

use crate::asset_paths::{relative_to_document, should_skip_stylesheet_reference};
use crate::models::ResourceRole;

use super::context::LocalizationContext;

fn url_token_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r#"url\(['"]?([^'")\s]+)['"]?\)"#).expect("invalid css url() regex")
  })
}

/// Targets of the `url(...)` tokens in `css` that should be downloaded, in source order.
///
/// `data:` URIs and bare fragments are excluded; repeated targets are reported once.
pub fn stylesheet_references(css: &str) -> Vec<String> {
  let mut targets: Vec<String> = Vec::new();
  for caps in url_token_pattern().captures_iter(css) {
    let target = &caps[1];
    if should_skip_stylesheet_reference(target) || targets.iter().any(|seen| seen == target) {
      continue;
    }
    targets.push(target.to_string());
  }
  targets
}

/// Replace `url(...)` tokens whose target has a replacement, leaving the rest untouched.
pub fn replace_url_tokens(css: &str, replacements: &HashMap<String, String>) -> String {
  url_token_pattern()
    .replace_all(css, |caps: &Captures| match replacements.get(&caps[1]) {
      Some(local) => format!("url('{local}')"),
      None => caps[0].to_string(),
    })
    .into_owned()
}

/// Download every asset referenced by `css` and point its tokens at the local copies.
///
/// `base` is the stylesheet's own URL and `stylesheet_path` the game-relative path the
/// stylesheet is stored under; rewritten tokens are relative to that path.
pub async fn rewrite_stylesheet(
  ctx: &mut LocalizationContext<'_>,
  css: &str,
  base: &Url,
  stylesheet_path: &str,
) -> String {
  let mut replacements = HashMap::new();

  for target in stylesheet_references(css) {
    let absolute = match base.join(&target) {
      Ok(url) => url,
      Err(err) => {
        warn!(%base, %target, error = %err, "unresolvable stylesheet reference");
        continue;
      }
    };

    if let Some(local_path) = ctx.localize_asset(&absolute, ResourceRole::CssAsset).await {
      replacements.insert(target, relative_to_document(stylesheet_path, &local_path));
    }
  }

  replace_url_tokens(css, &replacements)
}
