//! Retrieval of remote documents and assets.
//!
//! Redirects are followed by hand rather than by reqwest so that only `301`/`302` responses
//! are honoured and the chain length is bounded by [`FetchSettings::max_redirects`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, LOCATION};
use tracing::debug;
use url::Url;

use crate::error::FetchError;

/// Full body of a fetched resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedResource {
  /// URL the body was served from, after redirects.
  pub url: Url,
  /// Declared `Content-Type`, empty when the server sent none.
  pub content_type: String,
  /// Raw response body.
  pub body: Vec<u8>,
}

impl FetchedResource {
  /// Body decoded as UTF-8, replacing invalid sequences.
  pub fn text(&self) -> String {
    String::from_utf8_lossy(&self.body).into_owned()
  }
}

/// Source of remote resources used by the localization pipeline.
#[async_trait]
pub trait Fetch: Send + Sync {
  /// Retrieve `url`, failing on anything but a final 200 response.
  async fn fetch(&self, url: &Url) -> Result<FetchedResource, FetchError>;
}

/// Knobs for [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct FetchSettings {
  /// User agent sent with every request.
  pub user_agent: String,
  /// Headers sent with every request.
  pub headers: Vec<(String, String)>,
  /// Maximum number of redirects followed per fetch.
  pub max_redirects: usize,
  /// Optional per-request timeout.
  pub timeout: Option<Duration>,
}

impl Default for FetchSettings {
  fn default() -> Self {
    crate::config::ArcadeConfig::default().fetch_settings()
  }
}

/// [`Fetch`] implementation backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
  client: reqwest::Client,
  headers: Vec<(String, String)>,
  max_redirects: usize,
}

impl HttpFetcher {
  /// Build a client from the given settings.
  pub fn new(settings: FetchSettings) -> reqwest::Result<Self> {
    let mut builder = reqwest::Client::builder()
      .user_agent(settings.user_agent)
      .redirect(reqwest::redirect::Policy::none());
    if let Some(timeout) = settings.timeout {
      builder = builder.timeout(timeout);
    }

    Ok(Self {
      client: builder.build()?,
      headers: settings.headers,
      max_redirects: settings.max_redirects,
    })
  }

  /// `Accept: */*`, then the configured headers, then `overrides`; later names replace
  /// earlier ones.
  fn request_headers(&self, overrides: &[(String, String)]) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));

    for (name, value) in self.headers.iter().chain(overrides) {
      let invalid = || FetchError::InvalidHeader { name: name.clone() };
      let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
      let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
      headers.insert(header_name, header_value);
    }

    Ok(headers)
  }

  /// Fetch `url` with `overrides` replacing same-named configured headers.
  pub async fn get_with_headers(
    &self,
    url: &Url,
    overrides: &[(String, String)],
  ) -> Result<FetchedResource, FetchError> {
    let headers = self.request_headers(overrides)?;
    let mut current = url.clone();

    for _ in 0..=self.max_redirects {
      let request = self.client.get(current.clone()).headers(headers.clone());

      let response = request.send().await.map_err(|source| FetchError::Network {
        url: current.to_string(),
        source,
      })?;
      let status = response.status();

      if status == StatusCode::MOVED_PERMANENTLY || status == StatusCode::FOUND {
        let location = response
          .headers()
          .get(LOCATION)
          .and_then(|value| value.to_str().ok())
          .filter(|value| !value.is_empty())
          .ok_or_else(|| FetchError::MissingLocation {
            url: current.to_string(),
          })?
          .to_string();
        let next = current
          .join(&location)
          .map_err(|source| FetchError::InvalidRedirect {
            url: current.to_string(),
            location: location.clone(),
            source,
          })?;
        debug!(from = %current, to = %next, status = status.as_u16(), "following redirect");
        current = next;
        continue;
      }

      if status != StatusCode::OK {
        return Err(FetchError::Status {
          status: status.as_u16(),
          url: current.to_string(),
        });
      }

      let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
      let body = response
        .bytes()
        .await
        .map_err(|source| FetchError::Network {
          url: current.to_string(),
          source,
        })?;

      return Ok(FetchedResource {
        url: current,
        content_type,
        body: body.to_vec(),
      });
    }

    Err(FetchError::TooManyRedirects {
      url: url.to_string(),
      limit: self.max_redirects,
    })
  }
}

#[async_trait]
impl Fetch for HttpFetcher {
  async fn fetch(&self, url: &Url) -> Result<FetchedResource, FetchError> {
    self.get_with_headers(url, &[]).await
  }
}

#[cfg(test)]
pub(crate) mod testing {
  use std::collections::HashMap;
  use std::sync::Mutex;

  use super::*;

  /// In-memory fetcher answering from a fixed table; unknown URLs get a 404.
  #[derive(Default)]
  pub struct StaticFetcher {
    responses: HashMap<String, (String, Vec<u8>)>,
    requests: Mutex<Vec<String>>,
  }

  impl StaticFetcher {
    pub fn with(mut self, url: &str, content_type: &str, body: impl Into<Vec<u8>>) -> Self {
      self
        .responses
        .insert(url.to_string(), (content_type.to_string(), body.into()));
      self
    }

    pub fn requests(&self) -> Vec<String> {
      self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self, url: &str) -> usize {
      self
        .requests
        .lock()
        .unwrap()
        .iter()
        .filter(|requested| requested.as_str() == url)
        .count()
    }
  }

  #[async_trait]
  impl Fetch for StaticFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedResource, FetchError> {
      self.requests.lock().unwrap().push(url.to_string());
      match self.responses.get(url.as_str()) {
        Some((content_type, body)) => Ok(FetchedResource {
          url: url.clone(),
          content_type: content_type.clone(),
          body: body.clone(),
        }),
        None => Err(FetchError::Status {
          status: 404,
          url: url.to_string(),
        }),
      }
    }
  }
}
