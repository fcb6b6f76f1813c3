use thiserror::Error;

/// Setup failures. Per-request failures are never errors: they come back as
/// `MetadataRecord::Failed`.
#[derive(Debug, Error)]
pub enum FetcherError {
  #[error("http client error: {0}")]
  Client(#[from] reqwest::Error),

  #[error("invalid config: {0}")]
  InvalidConfig(String),
}
