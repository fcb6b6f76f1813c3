use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use moviemeta_core::domain::{FetchErrorKind, FetchRequest, MetadataRecord};
use moviemeta_core::ports::RequestProcessor;

use crate::config::FetcherConfig;
use crate::error::FetcherError;
use crate::parser::ResponseParser;
use crate::payload::OmdbPayload;

/// Maps a transport error onto the record taxonomy.
///
/// Timeouts are checked first: a connect that times out is reported as
/// `err_timeout`, a refused or unreachable host as `err_connect`. Anything
/// else the client can raise (bad URL, protocol error) is `err_request`.
pub fn classify(err: &reqwest::Error) -> FetchErrorKind {
  if err.is_timeout() {
    FetchErrorKind::Timeout
  } else if err.is_connect() {
    FetchErrorKind::Connect
  } else {
    FetchErrorKind::Request
  }
}

/// One GET per request against the metadata service.
///
/// `fetch` never fails: every problem ends up as a `MetadataRecord::Failed`
/// so a single bad request cannot abort the batch.
#[derive(Debug, Clone)]
pub struct Fetcher {
  client: Client,
  parser: ResponseParser,
}

impl Fetcher {
  pub fn new(timeout: Duration) -> Result<Self, FetcherError> {
    if timeout.is_zero() {
      return Err(FetcherError::InvalidConfig("timeout must be greater than zero".into()));
    }

    let client = Client::builder()
      .timeout(timeout)
      .user_agent(format!("moviemeta/{}", env!("CARGO_PKG_VERSION")))
      .build()?;

    Ok(Self::with_client(client))
  }

  pub fn from_config(cfg: &FetcherConfig) -> Result<Self, FetcherError> {
    Self::new(cfg.timeout())
  }

  pub fn with_client(client: Client) -> Self {
    Self { client, parser: ResponseParser::new() }
  }

  pub async fn fetch(&self, request: &FetchRequest) -> MetadataRecord {
    let title = request.display_title();
    info!("Fetching movie data: {title}...");

    if !request.has_url() {
      return failure(title, FetchErrorKind::Request, "no title to query");
    }

    let response = match self.client.get(&request.url).send().await {
      Ok(r) => r,
      Err(e) => return failure(title, classify(&e), &e),
    };

    debug!(title, status = response.status().as_u16(), "response received");

    let body = match response.bytes().await {
      Ok(b) => b,
      Err(e) => return failure(title, classify(&e), &e),
    };

    let payload: OmdbPayload = match serde_json::from_slice(&body) {
      Ok(p) => p,
      Err(e) => return failure(title, FetchErrorKind::Decode, &e),
    };

    if !payload.found() {
      debug!(title, reason = payload.error.as_deref().unwrap_or(""), "title not found");
    }

    MetadataRecord::Movie(self.parser.parse(request.title.as_deref(), &payload))
  }
}

fn failure(title: &str, kind: FetchErrorKind, cause: impl std::fmt::Display) -> MetadataRecord {
  warn!("Error fetching movie data: {title} [{}]: {cause}", kind.as_str().to_uppercase());
  MetadataRecord::failed(kind)
}

#[async_trait]
impl RequestProcessor for Fetcher {
  async fn process(&self, request: FetchRequest) -> MetadataRecord {
    self.fetch(&request).await
  }
}
