use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::paths::ConfigError;

/// File holding the directory names to skip, looked up in the working directory.
pub const EXCLUDE_FILE: &str = "subdir.txt";
pub const EXCLUDE_SEP: char = ',';

/// Directory names the scanner must not descend into.
///
/// Matching is on the bare directory name, not on paths: `Extras` excludes
/// every directory called `Extras` wherever it sits in the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExcludeList {
  names: BTreeSet<String>,
}

impl ExcludeList {
  pub fn new<I, S>(names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let names = names.into_iter().map(|n| n.as_ref().trim().to_string()).filter(|n| !n.is_empty()).collect();
    Self { names }
  }

  /// Parses the first line of `content` as a comma-separated list.
  pub fn parse(content: &str) -> Self {
    let first_line = content.lines().next().unwrap_or("");
    Self::new(first_line.split(EXCLUDE_SEP))
  }

  /// Reads `path` once. A missing file means "exclude nothing".
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    match fs::read_to_string(path) {
      Ok(content) => {
        let list = Self::parse(&content);
        debug!(path = %path.display(), excluded = list.len(), "loaded exclude list");
        Ok(list)
      }
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
      Err(e) => Err(e.into()),
    }
  }

  /// `subdir.txt` from the current working directory.
  pub fn load_default() -> Result<Self, ConfigError> {
    Self::load(Path::new(EXCLUDE_FILE))
  }

  pub fn contains(&self, name: &str) -> bool {
    self.names.contains(name)
  }

  pub fn len(&self) -> usize {
    self.names.len()
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }
}
