/// One query against the metadata service, derived from a `MediaCandidate`.
///
/// `url` is empty when the candidate had no title; the fetcher turns that
/// into an error record instead of issuing a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
  pub title: Option<String>,
  pub year: Option<u16>,
  pub url: String,
}

impl FetchRequest {
  pub fn new(title: Option<String>, year: Option<u16>, url: impl Into<String>) -> Self {
    Self { title, year, url: url.into() }
  }

  pub fn has_url(&self) -> bool {
    !self.url.is_empty()
  }

  /// Title used in records and log lines. Empty when nothing was guessed.
  pub fn display_title(&self) -> &str {
    self.title.as_deref().unwrap_or("")
  }
}
