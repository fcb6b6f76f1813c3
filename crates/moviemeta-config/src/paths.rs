use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("toml error: {0}")]
  Toml(#[from] toml::de::Error),
  #[error("directories error: could not determine home directory")]
  Directories,
  #[error("other: {0}")]
  Other(String),
}

/// Where moviemeta keeps its own files.
///
/// `MOVIEMETA_BASE_DIR` switches to a portable layout (`<base>/config`);
/// otherwise the platform config directory is used.
#[derive(Debug, Clone)]
pub struct MoviemetaPaths {
  pub base_dir: PathBuf,
  pub config_dir: PathBuf,
}

impl MoviemetaPaths {
  pub fn new() -> Result<Self, ConfigError> {
    if let Ok(env_base) = std::env::var("MOVIEMETA_BASE_DIR") {
      return Self::at(env_base);
    }

    let proj_dirs = ProjectDirs::from("org", "moviemeta", "moviemeta").ok_or(ConfigError::Directories)?;
    let config_dir = proj_dirs.config_dir().to_path_buf();
    std::fs::create_dir_all(&config_dir)?;

    Ok(Self { base_dir: config_dir.clone(), config_dir })
  }

  /// Portable layout rooted at `base`.
  pub fn at(base: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let base_dir = base.as_ref().to_path_buf();
    let config_dir = base_dir.join("config");
    std::fs::create_dir_all(&config_dir)?;

    Ok(Self { base_dir, config_dir })
  }

  pub fn config_file(&self) -> PathBuf {
    self.config_dir.join("moviemeta.toml")
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  struct EnvVarGuard {
    key: String,
    original: Option<String>,
  }

  impl EnvVarGuard {
    fn new(key: &str, value: &str) -> Self {
      let original = std::env::var(key).ok();
      unsafe { std::env::set_var(key, value) };
      EnvVarGuard { key: key.to_owned(), original }
    }
  }

  impl Drop for EnvVarGuard {
    fn drop(&mut self) {
      match &self.original {
        Some(val) => unsafe { std::env::set_var(&self.key, val) },
        None => unsafe { std::env::remove_var(&self.key) },
      }
    }
  }

  #[test]
  fn test_base_dir_override() {
    let tmp = tempdir().unwrap();
    let _env = EnvVarGuard::new("MOVIEMETA_BASE_DIR", tmp.path().to_str().unwrap());

    let paths = MoviemetaPaths::new().unwrap();

    assert_eq!(paths.base_dir, tmp.path());
    assert_eq!(paths.config_dir, tmp.path().join("config"));
    assert_eq!(paths.config_file(), tmp.path().join("config").join("moviemeta.toml"));
    assert!(paths.config_dir.exists());
  }
}
