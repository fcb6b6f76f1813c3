use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;

use moviemeta_core::ports::{CandidateScanner, NameGuesser, ScanError as CoreScanError, ScanOutcome};

use crate::config::ScannerConfig;
use crate::fs_scanner::{ScannerError, scan_tree};
use crate::guesser::FilenameGuesser;

/// `CandidateScanner` over the local filesystem.
///
/// The first successful `scan` walks the tree; later calls (and clones, which
/// share the cache) get the stored outcome back without touching the disk.
/// A failed scan is not cached, so the next call tries again.
#[derive(Clone)]
pub struct FsScanner {
  config: Arc<ScannerConfig>,
  guesser: Arc<dyn NameGuesser>,
  cache: Arc<OnceCell<ScanOutcome>>,
}

impl FsScanner {
  pub fn new(config: ScannerConfig, guesser: impl NameGuesser + 'static) -> Self {
    Self { config: Arc::new(config), guesser: Arc::new(guesser), cache: Arc::new(OnceCell::new()) }
  }

  pub fn with_default_guesser(config: ScannerConfig) -> Self {
    Self::new(config, FilenameGuesser::new())
  }

  /// True once a scan has completed and been cached.
  pub fn is_cached(&self) -> bool {
    self.cache.initialized()
  }
}

#[async_trait]
impl CandidateScanner for FsScanner {
  async fn scan(&self) -> Result<ScanOutcome, CoreScanError> {
    let outcome = self
      .cache
      .get_or_try_init(|| async { scan_tree(&self.config, self.guesser.as_ref()).await.map_err(map_scanner_error) })
      .await?;

    Ok(outcome.clone())
  }
}

fn map_scanner_error(err: ScannerError) -> CoreScanError {
  match err {
    ScannerError::RootNotFound(path) => CoreScanError::RootNotFound(path),
    ScannerError::Io(e) => CoreScanError::Io(e.to_string()),
    ScannerError::Config(e) => CoreScanError::Internal(e.to_string()),
  }
}
