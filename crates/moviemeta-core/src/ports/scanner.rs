use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::MediaCandidate;

/// A subtree or entry the walk had to skip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanIssue {
  pub path: PathBuf,
  pub message: String,
}

/// Result of walking a library root.
///
/// `issues` accumulates every directory or entry that could not be read, so
/// the caller decides whether to log them or fail loudly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
  pub candidates: Vec<MediaCandidate>,
  pub issues: Vec<ScanIssue>,
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
  #[error("root directory not found: {0}")]
  RootNotFound(PathBuf),

  #[error("io error: {0}")]
  Io(String),

  #[error("internal error: {0}")]
  Internal(String),
}

/// Library scanner port.
///
/// Implementations compute the outcome once; repeated calls return the cached
/// result without touching the filesystem again.
#[async_trait]
pub trait CandidateScanner: Send + Sync {
  async fn scan(&self) -> Result<ScanOutcome, ScanError>;
}
