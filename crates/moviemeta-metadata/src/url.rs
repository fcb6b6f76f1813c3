use moviemeta_core::domain::{FetchRequest, MediaCandidate};
use moviemeta_core::ports::QueryBuilder;

use crate::config::FetcherConfig;

/// Builds service URLs from candidates.
///
/// `<host>/?t=<title>` or `<host>/?t=<title>&y=<year>`, plus `&apikey=` when a
/// key is configured. No title means no URL: the result is `""`.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
  host: String,
  api_key: Option<String>,
}

impl RequestBuilder {
  pub fn new(host: impl Into<String>) -> Self {
    let host = host.into().trim_end_matches('/').to_string();
    Self { host, api_key: None }
  }

  pub fn from_config(cfg: &FetcherConfig) -> Self {
    let builder = Self::new(cfg.host.as_str());
    match &cfg.api_key {
      Some(key) => builder.with_api_key(key.as_str()),
      None => builder,
    }
  }

  pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
    self.api_key = Some(key.into()).filter(|k| !k.is_empty());
    self
  }

  pub fn build_url(&self, candidate: &MediaCandidate) -> String {
    let Some(title) = candidate.title.as_deref() else {
      return String::new();
    };

    let mut url = format!("{}/?t={}", self.host, urlencoding::encode(title));

    if let Some(year) = candidate.year {
      url.push_str(&format!("&y={year}"));
    }

    if let Some(key) = &self.api_key {
      url.push_str(&format!("&apikey={}", urlencoding::encode(key)));
    }

    url
  }
}

impl QueryBuilder for RequestBuilder {
  fn build(&self, candidate: &MediaCandidate) -> FetchRequest {
    FetchRequest::new(candidate.title.clone(), candidate.year, self.build_url(candidate))
  }
}
