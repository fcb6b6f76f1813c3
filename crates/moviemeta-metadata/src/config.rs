use std::time::Duration;

use moviemeta_config::{ConfigBackend, ConfigError, config_backend};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// `[fetcher]` section of `moviemeta.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
  /// Base URL of the metadata service, without query string.
  pub host: String,
  /// Appended as `apikey=` when set.
  pub api_key: Option<String>,
  /// Per-request timeout, connect and read included.
  pub timeout_secs: u64,
  /// Worker pool size. The queue holds twice as many requests.
  pub workers: usize,
}

impl Default for FetcherConfig {
  fn default() -> Self {
    Self { host: "http://www.omdbapi.com".to_string(), api_key: None, timeout_secs: 10, workers: 5 }
  }
}

impl FetcherConfig {
  /// Loads `[fetcher]` from the global config file and writes the resolved
  /// section back, so a fresh install gets an editable file with defaults.
  ///
  /// Without a usable config directory the defaults apply.
  pub fn load() -> Result<Self, ConfigError> {
    match config_backend() {
      Ok(backend) => Self::load_from(backend),
      Err(e) => {
        warn!("config directory unavailable, using fetcher defaults: {e}");
        Ok(Self::default())
      }
    }
  }

  /// A failed write-back is only logged; an unreadable section is an error.
  pub fn load_from<B: ConfigBackend>(backend: &B) -> Result<Self, ConfigError> {
    let cfg: Self = backend.load_section_with_default("fetcher")?;
    if let Err(e) = backend.save_section("fetcher", &cfg) {
      warn!("cannot write [fetcher] defaults back: {e}");
    }
    Ok(cfg)
  }

  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }

  pub fn builder() -> FetcherConfigBuilder {
    FetcherConfigBuilder::new()
  }
}

/// Builder so tests and callers only touch the fields they care about.
#[derive(Debug, Clone)]
pub struct FetcherConfigBuilder {
  inner: FetcherConfig,
}

impl FetcherConfigBuilder {
  pub fn new() -> Self {
    Self { inner: FetcherConfig::default() }
  }

  pub fn host(mut self, host: impl Into<String>) -> Self {
    self.inner.host = host.into();
    self
  }

  pub fn api_key(mut self, key: impl Into<String>) -> Self {
    self.inner.api_key = Some(key.into());
    self
  }

  pub fn timeout_secs(mut self, secs: u64) -> Self {
    self.inner.timeout_secs = secs;
    self
  }

  pub fn workers(mut self, workers: usize) -> Self {
    self.inner.workers = workers;
    self
  }

  pub fn build(self) -> FetcherConfig {
    self.inner
  }
}

impl Default for FetcherConfigBuilder {
  fn default() -> Self {
    Self::new()
  }
}
