use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "moviemeta.log";

/// Installs the global subscriber.
///
/// With `to_file`, everything from `debug` up is appended to `moviemeta.log`
/// in the working directory. Otherwise only warnings reach stderr. `RUST_LOG`
/// overrides the level in both cases.
pub fn init(to_file: bool) -> anyhow::Result<()> {
  if to_file {
    init_file(Path::new(LOG_FILE))
  } else {
    tracing_subscriber::fmt()
      .with_env_filter(filter("warn"))
      .with_writer(std::io::stderr)
      .with_target(false)
      .try_init()
      .map_err(|e| anyhow::anyhow!(e))
  }
}

fn init_file(path: &Path) -> anyhow::Result<()> {
  let file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(path)
    .with_context(|| format!("cannot open log file {}", path.display()))?;

  tracing_subscriber::fmt()
    .with_env_filter(filter("debug"))
    .with_writer(Mutex::new(file))
    .with_ansi(false)
    .try_init()
    .map_err(|e| anyhow::anyhow!(e))
}

fn filter(default: &str) -> EnvFilter {
  EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}
