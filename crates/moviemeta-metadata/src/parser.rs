use moviemeta_core::domain::{MovieMetadata, Rating};

use crate::payload::OmdbPayload;

/// Sentinel the service uses for "no value".
pub const NOT_AVAILABLE: &str = "N/A";

/// Normalizes a service payload into a `MovieMetadata`.
///
/// # Rules (in order)
/// 1. `title` is always the title we asked for, never the one echoed back.
/// 2. Not found: only `title` is set, everything else keeps its empty value.
/// 3. Non-empty fields are copied with `"` escaped as `\"`. The sentinel is
///    handled per field: `runtime` becomes `""`, `metaScore`/`imdbRating`
///    become numeric zero, and `year`/`genre`/`plot`/`awards` keep it verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser;

impl ResponseParser {
  pub fn new() -> Self {
    Self
  }

  pub fn parse(&self, requested_title: Option<&str>, payload: &OmdbPayload) -> MovieMetadata {
    let mut movie = MovieMetadata::empty(requested_title.unwrap_or(""));

    if !payload.found() {
      return movie;
    }

    movie.year = verbatim(&payload.year);
    movie.runtime = match present(&payload.runtime) {
      Some(NOT_AVAILABLE) | None => String::new(),
      Some(v) => escape_quotes(v),
    };
    movie.genre = verbatim(&payload.genre);
    movie.plot = verbatim(&payload.plot);
    movie.meta_score = rating(&payload.metascore);
    movie.imdb_rating = rating(&payload.imdb_rating);
    movie.awards = verbatim(&payload.awards);

    movie
  }
}

fn present(field: &Option<String>) -> Option<&str> {
  field.as_deref().filter(|v| !v.is_empty())
}

fn escape_quotes(value: &str) -> String {
  value.replace('"', "\\\"")
}

fn verbatim(field: &Option<String>) -> String {
  present(field).map(escape_quotes).unwrap_or_default()
}

fn rating(field: &Option<String>) -> Rating {
  match present(field) {
    None => Rating::Absent,
    Some(NOT_AVAILABLE) => Rating::NotAvailable,
    Some(v) => Rating::Value(escape_quotes(v)),
  }
}
