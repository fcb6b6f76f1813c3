mod app;
mod args;
mod logging;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};

use crate::app::RunStatus;
use crate::args::Args;

const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
  let args = Args::parse();

  if let Err(e) = logging::init(args.log) {
    eprintln!("moviemeta: {e:#}");
    return ExitCode::FAILURE;
  }

  // Without --log, warnings already go to stderr.
  let echo = args.log;

  match app::run(args).await {
    Ok(RunStatus::Written { records }) => {
      info!(records, "done");
      ExitCode::SUCCESS
    }
    Ok(RunStatus::Listed { candidates }) => {
      info!(candidates, "listed");
      ExitCode::SUCCESS
    }
    Ok(RunStatus::Interrupted { gathered }) => {
      warn!("interrupted after {gathered} record(s), nothing written");
      if echo {
        eprintln!("moviemeta: interrupted after {gathered} record(s), nothing written");
      }
      ExitCode::from(EXIT_INTERRUPTED)
    }
    Err(e) => {
      error!("{e:#}");
      if echo {
        eprintln!("moviemeta: {e:#}");
      }
      ExitCode::FAILURE
    }
  }
}
