/// What a guesser could make out of a file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuessedName {
  pub title: Option<String>,
  pub year: Option<u16>,
}

impl GuessedName {
  pub fn new(title: Option<String>, year: Option<u16>) -> Self {
    Self { title, year }
  }
}

/// Port that turns a file name into a title/year guess.
///
/// Implementations must be cheap and infallible: a name they cannot make
/// sense of yields an empty guess, not an error.
pub trait NameGuesser: Send + Sync {
  fn guess(&self, file_name: &str) -> GuessedName;
}

impl<F> NameGuesser for F
where
  F: Fn(&str) -> GuessedName + Send + Sync,
{
  fn guess(&self, file_name: &str) -> GuessedName {
    self(file_name)
  }
}
