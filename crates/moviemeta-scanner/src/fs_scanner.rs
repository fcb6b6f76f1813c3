use std::path::PathBuf;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use thiserror::Error;
use tracing::{debug, warn};

use moviemeta_core::domain::MediaCandidate;
use moviemeta_core::ports::{NameGuesser, ScanIssue, ScanOutcome};
use moviemeta_fs::async_walker::{Filtering, WalkConfig, WalkEntry, WalkError, walk_filtered};

use crate::config::ScannerConfig;

#[derive(Debug, Error)]
pub enum ScannerError {
  #[error("root directory not found: {0}")]
  RootNotFound(PathBuf),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("config error: {0}")]
  Config(#[from] moviemeta_config::ConfigError),
}

/// Walks `cfg.root` and returns one candidate per non-excluded file.
///
/// Excluded directories are pruned. A symlink to a directory is never a
/// candidate and is descended only with `cfg.follow_symlinks`. Unreadable
/// entries and subtrees cut by `cfg.max_depth` end up in `ScanOutcome::issues`.
///
/// Only a missing or non-directory root is an error. Candidates are sorted by path.
pub async fn scan_tree(cfg: &ScannerConfig, guesser: &dyn NameGuesser) -> Result<ScanOutcome, ScannerError> {
  match tokio::fs::metadata(&cfg.root).await {
    Ok(meta) if meta.is_dir() => {}
    _ => return Err(ScannerError::RootNotFound(cfg.root.clone())),
  }

  let walk_cfg = WalkConfig { follow_symlinks: cfg.follow_symlinks, max_depth: cfg.max_depth, dedup_dirs: true };

  // The filter outlives this call's borrow of `cfg`.
  let excluded = Arc::new(cfg.excluded.clone());
  let follow_symlinks = cfg.follow_symlinks;
  let max_depth = cfg.max_depth;

  let entries = walk_filtered(&cfg.root, walk_cfg, move |entry| {
    let excluded = Arc::clone(&excluded);
    let path = entry.path.clone();
    let name = entry.file_name();
    let depth = entry.depth;
    let file_type = entry.file_type;

    async move {
      let is_link = file_type.is_symlink();
      let is_dir = if is_link {
        // Dangling links fall through as plain entries.
        tokio::fs::metadata(&path).await.map(|m| m.is_dir()).unwrap_or(false)
      } else {
        file_type.is_dir()
      };

      if !is_dir {
        Filtering::Continue
      } else if excluded.contains(&name) || (is_link && !follow_symlinks) {
        Filtering::IgnoreDir
      } else if depth > max_depth {
        // Emitted so the scan can report the cut subtree.
        Filtering::Continue
      } else {
        Filtering::Ignore
      }
    }
  });

  Ok(collect_outcome(entries, guesser, max_depth).await)
}

async fn points_to_dir(entry: &WalkEntry) -> bool {
  if entry.file_type.is_symlink() {
    tokio::fs::metadata(&entry.path).await.map(|m| m.is_dir()).unwrap_or(false)
  } else {
    entry.is_dir()
  }
}

async fn collect_outcome<S>(entries: S, guesser: &dyn NameGuesser, max_depth: usize) -> ScanOutcome
where
  S: Stream<Item = Result<WalkEntry, WalkError>>,
{
  tokio::pin!(entries);

  let mut outcome = ScanOutcome::default();

  while let Some(res) = entries.next().await {
    match res {
      Ok(entry) => {
        if entry.depth > max_depth && points_to_dir(&entry).await {
          warn!(path = %entry.path.display(), max_depth, "depth limit reached, subtree skipped");
          outcome.issues.push(ScanIssue {
            path: entry.path,
            message: format!("not descended: depth limit of {max_depth} reached"),
          });
          continue;
        }

        let guess = guesser.guess(&entry.file_name());
        debug!(path = %entry.path.display(), title = ?guess.title, year = ?guess.year, "candidate");
        outcome.candidates.push(MediaCandidate::from_guess(entry.path, guess));
      }
      Err(e) => {
        // One bad subtree must not abort the whole scan.
        warn!(path = %e.path.display(), "walker error: {}", e.source);
        outcome.issues.push(ScanIssue { path: e.path, message: e.source.to_string() });
      }
    }
  }

  outcome.candidates.sort_by(|a, b| a.source_path.cmp(&b.source_path));

  outcome
}
