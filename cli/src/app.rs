use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use moviemeta_core::CoreError;
use moviemeta_core::domain::MetadataRecord;
use moviemeta_core::ports::BatchRunner;
use moviemeta_core::services::CatalogService;
use moviemeta_fs::atomic_write_str;
use moviemeta_metadata::{Fetcher, FetcherConfig, RequestBuilder};
use moviemeta_pipeline::{PoolConfig, SequentialRunner, WorkerPool};
use moviemeta_scanner::{FsScanner, ScannerConfig};

use crate::args::Args;

pub const OUTPUT_FILE: &str = "moviemeta.txt";

/// How a run ended when nothing fatal happened.
#[derive(Debug, PartialEq, Eq)]
pub enum RunStatus {
  /// Records written to the output file.
  Written { records: usize },
  /// `--list`: candidates printed, nothing fetched.
  Listed { candidates: usize },
  /// Ctrl-C before the batch finished. Nothing was written.
  Interrupted { gathered: usize },
}

type Service = CatalogService<FsScanner, RequestBuilder, Box<dyn BatchRunner>>;

fn build_service(args: &Args) -> anyhow::Result<Service> {
  let scanner_cfg = ScannerConfig::load(args.dir.clone()).map_err(|e| CoreError::Config(e.to_string()))?;
  let fetcher_cfg = FetcherConfig::load().map_err(|e| CoreError::Config(e.to_string()))?;

  let scanner = FsScanner::with_default_guesser(scanner_cfg);
  let queries = RequestBuilder::from_config(&fetcher_cfg);
  let fetcher = Fetcher::from_config(&fetcher_cfg).context("cannot build HTTP client")?;

  let runner: Box<dyn BatchRunner> = if args.sequential {
    info!("running sequentially");
    Box::new(SequentialRunner::new(fetcher))
  } else {
    let workers = args.workers.map(usize::from).unwrap_or(fetcher_cfg.workers);
    info!(workers, "running with worker pool");
    Box::new(WorkerPool::new(fetcher, PoolConfig::new(workers)))
  };

  Ok(CatalogService::new(scanner, queries, runner))
}

pub async fn run(args: Args) -> anyhow::Result<RunStatus> {
  let service = build_service(&args)?;

  if args.list {
    let (candidates, _) = service.candidates().await?;
    println!("{}", serde_json::to_string_pretty(&candidates)?);
    return Ok(RunStatus::Listed { candidates: candidates.len() });
  }

  let cancel = CancellationToken::new();
  let interrupt = tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

  let started = Instant::now();
  let report = service.fetch_all(cancel).await;
  interrupt.abort();
  let report = report?;

  if !report.outcome.completed {
    return Ok(RunStatus::Interrupted { gathered: report.outcome.records.len() });
  }

  println!("Finished in {:.3} s", started.elapsed().as_secs_f64());

  write_records(Path::new(OUTPUT_FILE), &report.outcome.records)?;
  info!(records = report.outcome.records.len(), path = OUTPUT_FILE, "output written");

  Ok(RunStatus::Written { records: report.outcome.records.len() })
}

async fn cancel_on_ctrl_c(cancel: CancellationToken) {
  match tokio::signal::ctrl_c().await {
    Ok(()) => {
      warn!("interrupted, stopping workers");
      cancel.cancel();
    }
    Err(e) => warn!("cannot listen for Ctrl-C: {e}"),
  }
}

/// Serializes `records` as one JSON array and replaces `path` atomically.
pub fn write_records(path: &Path, records: &[MetadataRecord]) -> Result<(), CoreError> {
  let json = serde_json::to_string(records).map_err(|e| CoreError::Output(e.to_string()))?;
  atomic_write_str(path, &json).map_err(|e| CoreError::Output(format!("{}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
  use super::*;
  use moviemeta_core::domain::{FetchErrorKind, MovieMetadata};

  #[test]
  fn output_is_a_single_json_array() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join(OUTPUT_FILE);

    let records = vec![MovieMetadata::empty("Heat").into(), MetadataRecord::failed(FetchErrorKind::Timeout)];
    write_records(&path, &records).unwrap();

    let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value.as_array().map(Vec::len), Some(2));
    assert_eq!(value[0]["title"], "Heat");
    assert_eq!(value[1]["errorKind"], "err_timeout");
  }
}
