use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::domain::{FetchRequest, MediaCandidate};
use crate::errors::CoreError;
use crate::ports::{BatchOutcome, BatchRunner, CandidateScanner, QueryBuilder, ScanIssue};

/// Summary of one end-to-end run.
#[derive(Debug, Clone)]
pub struct CatalogReport {
  /// Number of candidates the scan produced.
  pub candidates: usize,
  pub issues: Vec<ScanIssue>,
  pub outcome: BatchOutcome,
  pub elapsed: Duration,
}

/// Wires the scan, the query builder and a batch runner together.
///
/// The runner is injected, so the same service drives the worker pool or the
/// sequential runner.
pub struct CatalogService<S, Q, B>
where
  S: CandidateScanner,
  Q: QueryBuilder,
  B: BatchRunner,
{
  scanner: S,
  queries: Q,
  runner: B,
}

impl<S, Q, B> CatalogService<S, Q, B>
where
  S: CandidateScanner,
  Q: QueryBuilder,
  B: BatchRunner,
{
  pub fn new(scanner: S, queries: Q, runner: B) -> Self {
    Self { scanner, queries, runner }
  }

  /// Scans the library (cached after the first call) and logs skipped paths.
  pub async fn candidates(&self) -> Result<(Vec<MediaCandidate>, Vec<ScanIssue>), CoreError> {
    info!("Starting local directory parsing...");
    let outcome = self.scanner.scan().await.map_err(|e| CoreError::Scan(e.to_string()))?;

    for issue in &outcome.issues {
      warn!(path = %issue.path.display(), "skipped during scan: {}", issue.message);
    }
    info!(candidates = outcome.candidates.len(), "Finished local directory parsing...");

    Ok((outcome.candidates, outcome.issues))
  }

  pub fn plan(&self, candidates: &[MediaCandidate]) -> Vec<FetchRequest> {
    candidates.iter().map(|c| self.queries.build(c)).collect()
  }

  /// Scan, build one request per candidate and run the batch.
  ///
  /// Returns early with partial records when `cancel` fires.
  pub async fn fetch_all(&self, cancel: CancellationToken) -> Result<CatalogReport, CoreError> {
    let started = Instant::now();
    let (candidates, issues) = self.candidates().await?;

    if candidates.is_empty() {
      info!("No movies to fetch");
      return Ok(CatalogReport {
        candidates: 0,
        issues,
        outcome: BatchOutcome { records: Vec::new(), completed: true },
        elapsed: started.elapsed(),
      });
    }

    let requests = self.plan(&candidates);
    let outcome = self.runner.run_batch(requests, cancel).await;

    if outcome.completed && outcome.records.len() != candidates.len() {
      error!(
        candidates = candidates.len(),
        records = outcome.records.len(),
        "record count does not match candidate count"
      );
    }

    let elapsed = started.elapsed();
    info!("All data fetched in {:.3} s", elapsed.as_secs_f64());

    Ok(CatalogReport { candidates: candidates.len(), issues, outcome, elapsed })
  }
}
