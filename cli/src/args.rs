use std::path::PathBuf;

use clap::Parser;

/// Movie meta generator.
///
/// Walks a directory, guesses a title/year for every file and writes the
/// metadata found for each one to `moviemeta.txt`.
#[derive(Debug, Parser)]
#[command(name = "moviemeta", version, about)]
pub struct Args {
  /// Directory path (defaults to the current directory)
  #[arg(short = 'd', value_name = "DIR")]
  pub dir: Option<PathBuf>,

  /// Log behaviour to moviemeta.log
  #[arg(long)]
  pub log: bool,

  /// Use in sequential mode
  #[arg(short = 's')]
  pub sequential: bool,

  /// Worker pool size (overrides `workers` in moviemeta.toml)
  #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
  pub workers: Option<u16>,

  /// Print the scanned candidates as JSON and exit
  #[arg(long)]
  pub list: bool,
}
