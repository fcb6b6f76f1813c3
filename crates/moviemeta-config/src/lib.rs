mod backend;
mod exclude;
mod paths;

pub use backend::{ConfigBackend, TomlConfigBackend};
pub use exclude::{EXCLUDE_FILE, EXCLUDE_SEP, ExcludeList};
pub use paths::{ConfigError, MoviemetaPaths};

use once_cell::sync::Lazy;

/// Process-wide paths (portable via `MOVIEMETA_BASE_DIR`, otherwise the platform dirs).
pub static PATHS: Lazy<Result<MoviemetaPaths, String>> = Lazy::new(|| MoviemetaPaths::new().map_err(|e| e.to_string()));

/// Process-wide config backend rooted at `PATHS`.
pub static CONFIG_BACKEND: Lazy<Result<TomlConfigBackend, String>> =
  Lazy::new(|| PATHS.clone().map(TomlConfigBackend::new));

/// Returns the global backend, or the reason it could not be initialised.
pub fn config_backend() -> Result<&'static TomlConfigBackend, ConfigError> {
  CONFIG_BACKEND.as_ref().map_err(|e| ConfigError::Other(e.clone()))
}
