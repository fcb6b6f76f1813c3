use std::collections::HashSet;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use futures::stream::{self, Stream};
use thiserror::Error;
use tokio::fs::{self, ReadDir};

// =============================================================================
// 1. File identity (platform specific)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct FileId(u64, u64);

#[cfg(unix)]
fn get_file_id(meta: &std::fs::Metadata) -> FileId {
  use std::os::unix::fs::MetadataExt;
  FileId(meta.dev(), meta.ino())
}

#[cfg(not(unix))]
fn get_file_id(_meta: &std::fs::Metadata) -> FileId {
  FileId(0, 0) // no inode: dedup degrades to "first directory wins"
}

// =============================================================================
// 2. Config and types
// =============================================================================

/// Controls how the tree is walked.
#[derive(Debug, Clone)]
pub struct WalkConfig {
  pub follow_symlinks: bool,
  pub max_depth: usize,
  /// Skip directories already visited (same device/inode).
  pub dedup_dirs: bool,
}

impl Default for WalkConfig {
  fn default() -> Self {
    Self { follow_symlinks: false, max_depth: 64, dedup_dirs: true }
  }
}

/// Decision returned by the filter for each entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filtering {
  /// Do not emit the entry, but descend into it if it is a directory.
  Ignore,
  /// Do not emit the entry and never descend into it.
  IgnoreDir,
  /// Emit the entry (and descend if it is a directory).
  Continue,
}

#[derive(Debug)]
pub struct WalkEntry {
  pub path: PathBuf,
  pub depth: usize,
  /// File type from `lstat`: a symlink stays a symlink.
  pub file_type: std::fs::FileType,
}

impl WalkEntry {
  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Last path component, lossily converted.
  pub fn file_name(&self) -> String {
    self.path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
  }

  pub fn is_dir(&self) -> bool {
    self.file_type.is_dir()
  }
}

/// I/O failure while walking, tagged with the path that caused it.
#[derive(Debug, Error)]
#[error("{}: {source}", path.display())]
pub struct WalkError {
  pub path: PathBuf,
  #[source]
  pub source: io::Error,
}

impl WalkError {
  fn new(path: impl Into<PathBuf>, source: io::Error) -> Self {
    Self { path: path.into(), source }
  }
}

// =============================================================================
// 3. Internal state
// =============================================================================

enum Frame {
  /// A directory we still have to open.
  Pending {
    path: PathBuf,
    depth: usize,
    /// Identity already known when we came through a resolved symlink.
    id_hint: Option<FileId>,
  },
  /// A directory being iterated.
  Open { rd: ReadDir, path: PathBuf, depth: usize },
}

// =============================================================================
// 4. Walker
// =============================================================================

/// Stream over the entries below `root`. The filter decides what is emitted
/// and what is descended into.
///
/// Errors are yielded as items; the walk goes on with the next entry.
pub fn walk_filtered<F, Fut>(
  root: impl Into<PathBuf>,
  cfg: WalkConfig,
  filter: F,
) -> impl Stream<Item = Result<WalkEntry, WalkError>>
where
  F: FnMut(&WalkEntry) -> Fut + Send + 'static,
  Fut: Future<Output = Filtering> + Send,
{
  let mut stack = Vec::with_capacity(16);
  stack.push(Frame::Pending { path: root.into(), depth: 0, id_hint: None });

  let visited = HashSet::new();
  let state = (stack, visited, cfg, filter);

  stream::unfold(state, |(mut stack, mut visited, cfg, mut filter)| async move {
    loop {
      let top = stack.last_mut()?;

      match top {
        Frame::Pending { path, depth, id_hint } => {
          let path = path.clone();
          let depth = *depth;
          let id_hint = *id_hint;

          stack.pop();

          if depth > cfg.max_depth {
            continue;
          }

          if cfg.dedup_dirs {
            let file_id = match id_hint {
              Some(id) => Some(id),
              None => match fs::metadata(&path).await {
                Ok(m) if m.is_dir() => Some(get_file_id(&m)),
                Ok(_) => None,
                Err(e) => return Some((Err(WalkError::new(path, e)), (stack, visited, cfg, filter))),
              },
            };

            if let Some(id) = file_id {
              if !visited.insert(id) {
                continue;
              }
            }
          }

          match fs::read_dir(&path).await {
            Ok(rd) => stack.push(Frame::Open { rd, path, depth }),
            Err(e) => {
              // Permission denied and friends: report, keep walking the rest.
              return Some((Err(WalkError::new(path, e)), (stack, visited, cfg, filter)));
            }
          }
        }

        Frame::Open { rd, path: dir_path, depth } => {
          let depth = *depth;

          match rd.next_entry().await {
            Ok(Some(entry)) => {
              let path = entry.path();

              let ft = match entry.file_type().await {
                Ok(ft) => ft,
                Err(e) => return Some((Err(WalkError::new(path, e)), (stack, visited, cfg, filter))),
              };

              let entry_depth = depth + 1;
              let walk_entry = WalkEntry { path: path.clone(), depth: entry_depth, file_type: ft };

              let filtering = filter(&walk_entry).await;
              let recurse = filtering != Filtering::IgnoreDir && entry_depth <= cfg.max_depth;

              let mut pending_frame = None;

              if recurse {
                if ft.is_dir() {
                  pending_frame = Some(Frame::Pending { path, depth: entry_depth, id_hint: None });
                } else if ft.is_symlink() && cfg.follow_symlinks {
                  // Resolve now so the identity travels with the frame.
                  if let Ok(m) = fs::metadata(&walk_entry.path).await {
                    if m.is_dir() {
                      let id = cfg.dedup_dirs.then(|| get_file_id(&m));
                      pending_frame = Some(Frame::Pending { path, depth: entry_depth, id_hint: id });
                    }
                  }
                }
              }

              if let Some(frame) = pending_frame {
                stack.push(frame);
              }

              if filtering == Filtering::Continue {
                return Some((Ok(walk_entry), (stack, visited, cfg, filter)));
              }
            }
            Ok(None) => {
              stack.pop();
            }
            Err(e) => {
              let dir_path = dir_path.clone();
              stack.pop();
              return Some((Err(WalkError::new(dir_path, e)), (stack, visited, cfg, filter)));
            }
          }
        }
      }
    }
  })
}
