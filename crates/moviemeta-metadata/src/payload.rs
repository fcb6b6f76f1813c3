use serde::Deserialize;
use serde_json::Value;

/// Body returned by the metadata service (OMDb shape).
///
/// Every field is optional: a not-found answer only carries `Response` and
/// `Error`, and fields the service does not know come back missing or empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OmdbPayload {
  /// Found indicator, `"True"` / `"False"`.
  #[serde(rename = "Response", default)]
  pub response: Option<Value>,
  #[serde(rename = "Error", default)]
  pub error: Option<String>,
  #[serde(rename = "Title", default)]
  pub title: Option<String>,
  #[serde(rename = "Year", default)]
  pub year: Option<String>,
  #[serde(rename = "Runtime", default)]
  pub runtime: Option<String>,
  #[serde(rename = "Genre", default)]
  pub genre: Option<String>,
  #[serde(rename = "Plot", default)]
  pub plot: Option<String>,
  #[serde(rename = "Metascore", default)]
  pub metascore: Option<String>,
  #[serde(rename = "imdbRating", default)]
  pub imdb_rating: Option<String>,
  #[serde(rename = "Awards", default)]
  pub awards: Option<String>,
}

impl OmdbPayload {
  /// Whether the service found the title. A missing indicator counts as not found.
  pub fn found(&self) -> bool {
    match &self.response {
      Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
      Some(Value::Bool(b)) => *b,
      _ => false,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn found_indicator_variants() {
    let found: OmdbPayload = serde_json::from_str(r#"{"Response":"True","Title":"Heat"}"#).unwrap();
    let missing: OmdbPayload = serde_json::from_str(r#"{"Response":"False","Error":"Movie not found!"}"#).unwrap();
    let boolean: OmdbPayload = serde_json::from_str(r#"{"Response":true}"#).unwrap();
    let absent: OmdbPayload = serde_json::from_str(r#"{"Title":"Heat"}"#).unwrap();

    assert!(found.found());
    assert!(!missing.found());
    assert_eq!(missing.error.as_deref(), Some("Movie not found!"));
    assert!(boolean.found());
    assert!(!absent.found());
  }
}
