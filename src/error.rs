//! Error kinds surfaced by the fetch and localization pipeline.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure while retrieving a remote resource.
#[derive(Debug, Error)]
pub enum FetchError {
  /// The final response carried a status other than 200.
  #[error("HTTP {status} for {url}")]
  Status {
    /// Terminal status code.
    status: u16,
    /// URL that produced it.
    url: String,
  },
  /// The request could not be completed.
  #[error("request to {url} failed: {source}")]
  Network {
    /// URL being requested.
    url: String,
    /// Underlying client error.
    source: reqwest::Error,
  },
  /// A redirect response did not name a usable target.
  #[error("redirect from {url} has no usable Location header")]
  MissingLocation {
    /// URL that answered with the redirect.
    url: String,
  },
  /// A redirect named a target that is not a valid URL.
  #[error("redirect from {url} points at invalid location {location:?}: {source}")]
  InvalidRedirect {
    /// URL that answered with the redirect.
    url: String,
    /// Raw `Location` header value.
    location: String,
    /// Parse failure.
    source: url::ParseError,
  },
  /// A configured or per-call header is not a valid HTTP header.
  #[error("invalid request header {name:?}")]
  InvalidHeader {
    /// Header name as given.
    name: String,
  },
  /// The redirect chain was longer than allowed.
  #[error("gave up on {url} after {limit} redirects")]
  TooManyRedirects {
    /// URL originally requested.
    url: String,
    /// Configured hop limit.
    limit: usize,
  },
}

impl FetchError {
  /// HTTP status carried by the error, if any.
  pub fn status(&self) -> Option<u16> {
    match self {
      Self::Status { status, .. } => Some(*status),
      _ => None,
    }
  }
}

/// Failure while localizing or restoring a game.
#[derive(Debug, Error)]
pub enum LocalizeError {
  /// Retrieving a document failed.
  #[error(transparent)]
  Fetch(#[from] FetchError),
  /// A reference could not be turned into an absolute URL.
  #[error("invalid URL {url:?}: {source}")]
  InvalidUrl {
    /// Raw reference.
    url: String,
    /// Parse failure.
    source: url::ParseError,
  },
  /// The rewritten document could not be serialized.
  #[error("failed to serialize document: {0}")]
  Serialize(#[source] io::Error),
  /// Reading or writing the game folder failed.
  #[error("failed to {action} {}: {source}", path.display())]
  Io {
    /// What was being attempted, e.g. "read" or "write".
    action: &'static str,
    /// File involved.
    path: PathBuf,
    /// Underlying I/O error.
    source: io::Error,
  },
}

impl LocalizeError {
  pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
    Self::Io {
      action,
      path: path.into(),
      source,
    }
  }
}

/// Convenience alias used across the localization pipeline.
pub type LocalizeResult<T> = Result<T, LocalizeError>;
