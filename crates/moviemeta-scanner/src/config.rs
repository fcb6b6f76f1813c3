use moviemeta_config::{ConfigError, ExcludeList};
use std::path::PathBuf;

/// What to walk and what to leave out.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
  /// Library root.
  pub root: PathBuf,

  /// Directory names never descended into.
  pub excluded: ExcludeList,

  /// Maximum directory depth below `root`.
  pub max_depth: usize,

  pub follow_symlinks: bool,
}

impl ScannerConfig {
  pub fn new(root: impl Into<PathBuf>, excluded: ExcludeList) -> Self {
    Self { root: root.into(), excluded, max_depth: 64, follow_symlinks: false }
  }

  /// Root from the caller (falls back to the working directory) and the
  /// exclude list from `subdir.txt`, read once.
  pub fn load(root: Option<PathBuf>) -> Result<Self, ConfigError> {
    let root = match root {
      Some(r) => r,
      None => std::env::current_dir()?,
    };
    let excluded = ExcludeList::load_default()?;
    Ok(Self::new(root, excluded))
  }

  pub fn with_max_depth(mut self, depth: usize) -> Self {
    self.max_depth = depth;
    self
  }
}
