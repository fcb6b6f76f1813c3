// crates/moviemeta-core/src/errors.rs
use thiserror::Error;

/// Errors that stop a whole run.
///
/// Per-candidate problems never show up here: they become records. Upper
/// layers (the CLI) map this to an exit status and a log line.
#[derive(Debug, Error)]
pub enum CoreError {
  #[error("scan error: {0}")]
  Scan(String),

  #[error("config error: {0}")]
  Config(String),

  #[error("output error: {0}")]
  Output(String),
}
