use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ports::guesser::GuessedName;

/// A file found by the scanner, with the best-effort title/year guessed from its name.
///
/// Candidates are immutable once built: the scanner owns the list and the
/// rest of the pipeline only ever reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaCandidate {
  pub source_path: PathBuf,
  pub title: Option<String>,
  pub year: Option<u16>,
}

impl MediaCandidate {
  pub fn new(source_path: impl Into<PathBuf>, title: Option<String>, year: Option<u16>) -> Self {
    Self { source_path: source_path.into(), title, year }
  }

  pub fn from_guess(source_path: impl Into<PathBuf>, guess: GuessedName) -> Self {
    Self::new(source_path, guess.title, guess.year)
  }
}
