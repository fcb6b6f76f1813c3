use crate::paths::{ConfigError, MoviemetaPaths};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;

// toml_edit for writes so user comments survive a save.
use toml_edit::{DocumentMut, Item};

/// Section-oriented access to `moviemeta.toml`.
pub trait ConfigBackend {
  /// Missing file or missing section yields `T::default()`.
  fn load_section_with_default<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Default;

  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError>;
}

#[derive(Debug, Clone)]
pub struct TomlConfigBackend {
  paths: MoviemetaPaths,
}

impl TomlConfigBackend {
  pub fn new(paths: MoviemetaPaths) -> Self {
    Self { paths }
  }

  pub fn paths(&self) -> &MoviemetaPaths {
    &self.paths
  }

  fn read_value(&self) -> Result<Option<toml::Value>, ConfigError> {
    let path = self.paths.config_file();
    let content = match fs::read_to_string(&path) {
      Ok(c) => c,
      Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
      Err(e) => return Err(e.into()),
    };

    Ok(Some(toml::from_str(&content)?))
  }
}

fn decode_section<T: DeserializeOwned>(section: &str, table: &toml::Value) -> Result<T, ConfigError> {
  table.clone().try_into().map_err(|e| ConfigError::Other(format!("decode section [{section}]: {e}")))
}

impl ConfigBackend for TomlConfigBackend {
  fn load_section_with_default<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Default,
  {
    let Some(toml_val) = self.read_value()? else {
      return Ok(T::default());
    };

    match toml_val.get(section) {
      Some(table) => decode_section(section, table),
      None => Ok(T::default()),
    }
  }

  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError> {
    let path = self.paths.config_file();

    let mut doc: DocumentMut = match fs::read_to_string(&path) {
      Ok(content) => content
        .parse::<DocumentMut>()
        .map_err(|e| ConfigError::Other(format!("parse toml_edit doc: {e}")))?,
      Err(e) if e.kind() == ErrorKind::NotFound => DocumentMut::new(),
      Err(e) => return Err(e.into()),
    };

    // Serialize the section alone ("key = value" lines, no header) and splice
    // it in as a table so the rest of the document keeps its formatting.
    let section_str =
      toml::to_string(value).map_err(|e| ConfigError::Other(format!("encode section [{section}]: {e}")))?;

    let section_item: Item = section_str
      .parse::<DocumentMut>()
      .map_err(|e| ConfigError::Other(format!("parse section as doc: {e}")))?
      .into_item();

    doc[section] = section_item;

    moviemeta_fs::atomic_write_str(&path, &doc.to_string())?;

    Ok(())
  }
}
