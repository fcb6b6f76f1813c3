use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Sibling temp path: `moviemeta.txt` -> `moviemeta.txt.tmp`.
fn tmp_path_for(path: &Path) -> PathBuf {
  let mut name = path.file_name().map(OsString::from).unwrap_or_default();
  name.push(".tmp");
  path.with_file_name(name)
}

/// Writes `contents` to a temp file next to `path`, syncs it and renames it
/// over `path`. Readers never observe a half-written file.
pub fn atomic_write(path: &Path, contents: impl AsRef<[u8]>) -> io::Result<()> {
  let tmp_path = tmp_path_for(path);

  {
    let mut tmp_file = fs::File::create(&tmp_path)?;
    tmp_file.write_all(contents.as_ref())?;
    tmp_file.sync_all()?;
  }

  if let Err(e) = fs::rename(&tmp_path, path) {
    let _ = fs::remove_file(&tmp_path);
    return Err(e);
  }
  Ok(())
}

pub fn atomic_write_str(path: &Path, contents: &str) -> io::Result<()> {
  atomic_write(path, contents.as_bytes())
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn replaces_existing_file() {
    let tmp = tempdir().unwrap();
    let target = tmp.path().join("moviemeta.txt");
    fs::write(&target, "old").unwrap();

    atomic_write_str(&target, "[]").unwrap();

    assert_eq!(fs::read_to_string(&target).unwrap(), "[]");
    assert!(!tmp.path().join("moviemeta.txt.tmp").exists());
  }

  #[test]
  fn temp_name_keeps_extension() {
    assert_eq!(tmp_path_for(Path::new("/a/moviemeta.txt")), PathBuf::from("/a/moviemeta.txt.tmp"));
  }
}
