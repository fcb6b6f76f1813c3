use std::fmt;

use serde::{Serialize, Serializer};

/// Score-like field (`metaScore`, `imdbRating`).
///
/// The service reports a missing score with a sentinel; those fields collapse
/// it to a numeric zero while every other text field keeps `""` as its empty
/// value. The three states are kept apart here so callers never have to
/// compare against sentinel strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rating {
  /// Field missing or empty in the payload. Serialized as `""`.
  #[default]
  Absent,
  /// Service returned the "not available" sentinel. Serialized as `0`.
  NotAvailable,
  /// Verbatim value. Serialized as a string.
  Value(String),
}

impl Serialize for Rating {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      Rating::Absent => serializer.serialize_str(""),
      Rating::NotAvailable => serializer.serialize_u8(0),
      Rating::Value(v) => serializer.serialize_str(v),
    }
  }
}

/// Normalized metadata of one title.
///
/// Text fields use `""` for "absent"; a not-found answer from the service is a
/// value of this type with only `title` filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieMetadata {
  pub title: String,
  pub year: String,
  pub runtime: String,
  pub genre: String,
  pub plot: String,
  pub meta_score: Rating,
  pub imdb_rating: Rating,
  pub awards: String,
}

impl MovieMetadata {
  pub fn empty(title: impl Into<String>) -> Self {
    Self { title: title.into(), ..Self::default() }
  }
}

/// Transport failure classes. Serialized with the tags consumers of
/// `moviemeta.txt` already know (`err_connect`, `err_timeout`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FetchErrorKind {
  /// Host unreachable or connection refused.
  #[serde(rename = "err_connect")]
  Connect,
  /// Connect or read timed out.
  #[serde(rename = "err_timeout")]
  Timeout,
  /// Request could not be issued (no title, malformed URL, other transport error).
  #[serde(rename = "err_request")]
  Request,
  /// Response body was not the payload we expect.
  #[serde(rename = "err_decode")]
  Decode,
  /// The processor itself failed while handling the request.
  #[serde(rename = "err_internal")]
  Internal,
}

impl FetchErrorKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      FetchErrorKind::Connect => "err_connect",
      FetchErrorKind::Timeout => "err_timeout",
      FetchErrorKind::Request => "err_request",
      FetchErrorKind::Decode => "err_decode",
      FetchErrorKind::Internal => "err_internal",
    }
  }
}

impl fmt::Display for FetchErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Fixed-shape error record: `{"success": false, "errorKind": "..."}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchFailure {
  success: bool,
  error_kind: FetchErrorKind,
}

impl FetchFailure {
  pub fn new(kind: FetchErrorKind) -> Self {
    Self { success: false, error_kind: kind }
  }

  pub fn kind(&self) -> FetchErrorKind {
    self.error_kind
  }
}

impl From<FetchErrorKind> for FetchFailure {
  fn from(kind: FetchErrorKind) -> Self {
    Self::new(kind)
  }
}

/// One output entry per candidate: either metadata (possibly empty when the
/// service did not know the title) or a tagged transport failure.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum MetadataRecord {
  Movie(MovieMetadata),
  Failed(FetchFailure),
}

impl MetadataRecord {
  pub fn failed(kind: FetchErrorKind) -> Self {
    MetadataRecord::Failed(FetchFailure::new(kind))
  }

  pub fn is_success(&self) -> bool {
    matches!(self, MetadataRecord::Movie(_))
  }

  pub fn movie(&self) -> Option<&MovieMetadata> {
    match self {
      MetadataRecord::Movie(m) => Some(m),
      MetadataRecord::Failed(_) => None,
    }
  }

  pub fn failure(&self) -> Option<FetchErrorKind> {
    match self {
      MetadataRecord::Movie(_) => None,
      MetadataRecord::Failed(f) => Some(f.kind()),
    }
  }
}

impl From<MovieMetadata> for MetadataRecord {
  fn from(movie: MovieMetadata) -> Self {
    MetadataRecord::Movie(movie)
  }
}
