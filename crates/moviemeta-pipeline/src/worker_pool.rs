use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use moviemeta_core::domain::{FetchRequest, MetadataRecord};
use moviemeta_core::ports::{BatchOutcome, BatchRunner, RequestProcessor};

use crate::aggregator::Aggregator;
use crate::guard::process_guarded;
use crate::queue::{QueueError, WorkQueue};

pub const DEFAULT_WORKERS: usize = 5;

/// Pool sizing. The queue always holds twice as many requests as there are
/// workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
  workers: usize,
}

impl PoolConfig {
  /// `workers` is clamped to at least 1.
  pub fn new(workers: usize) -> Self {
    Self { workers: workers.max(1) }
  }

  pub fn workers(&self) -> usize {
    self.workers
  }

  pub fn queue_capacity(&self) -> usize {
    self.workers * 2
  }
}

impl Default for PoolConfig {
  fn default() -> Self {
    Self::new(DEFAULT_WORKERS)
  }
}

/// Bounded-concurrency batch runner.
///
/// Each `run` spawns its own workers, feeds them through a bounded
/// `WorkQueue`, joins, then cancels and awaits the workers. Nothing outlives
/// the call.
pub struct WorkerPool<P> {
  processor: Arc<P>,
  config: PoolConfig,
}

impl<P> WorkerPool<P>
where
  P: RequestProcessor + 'static,
{
  pub fn new(processor: P, config: PoolConfig) -> Self {
    Self::from_arc(Arc::new(processor), config)
  }

  pub fn from_arc(processor: Arc<P>, config: PoolConfig) -> Self {
    Self { processor, config }
  }

  pub fn config(&self) -> PoolConfig {
    self.config
  }

  /// Processes every request and returns one record per request.
  ///
  /// Requests are pulled from `requests` only as queue space frees up. When
  /// `cancel` fires, in-flight work is aborted and the records aggregated so
  /// far come back with `completed = false`.
  pub async fn run<I>(&self, requests: I, cancel: &CancellationToken) -> BatchOutcome
  where
    I: IntoIterator<Item = FetchRequest>,
    I::IntoIter: Send,
  {
    let started = Instant::now();
    let queue = WorkQueue::bounded(self.config.queue_capacity());
    let aggregator = Aggregator::new();
    let group = cancel.child_token();

    let mut workers = JoinSet::new();
    for id in 0..self.config.workers() {
      workers.spawn(worker_loop(
        id,
        queue.clone(),
        Arc::clone(&self.processor),
        aggregator.clone(),
        group.clone(),
      ));
    }
    debug!(workers = self.config.workers(), capacity = queue.capacity(), "worker pool started");

    let completed = tokio::select! {
      biased;
      _ = cancel.cancelled() => false,
      fed = feed_and_join(&queue, requests.into_iter()) => match fed {
        Ok(submitted) => {
          debug!(submitted, "all requests processed");
          true
        }
        Err(e) => {
          error!("failed to enqueue request: {e}");
          false
        }
      },
    };

    group.cancel();

    if completed {
      // Workers are idle in `get`; the token makes them return.
      while let Some(res) = workers.join_next().await {
        if let Err(e) = res {
          error!("worker task failed: {e}");
        }
      }
    } else {
      workers.shutdown().await;
      warn!(gathered = aggregator.len(), "worker pool cancelled");
    }

    let records = aggregator.all();
    info!(records = records.len(), "Pool finished in {:.3} s", started.elapsed().as_secs_f64());

    BatchOutcome { records, completed }
  }

  pub async fn run_to_completion<I>(&self, requests: I) -> Vec<MetadataRecord>
  where
    I: IntoIterator<Item = FetchRequest>,
    I::IntoIter: Send,
  {
    self.run(requests, &CancellationToken::new()).await.records
  }
}

async fn feed_and_join<I>(queue: &WorkQueue<FetchRequest>, requests: I) -> Result<usize, QueueError>
where
  I: Iterator<Item = FetchRequest>,
{
  let mut submitted = 0;
  for request in requests {
    queue.put(request).await?;
    submitted += 1;
  }

  queue.join().await;
  Ok(submitted)
}

async fn worker_loop<P>(
  id: usize,
  queue: WorkQueue<FetchRequest>,
  processor: Arc<P>,
  aggregator: Aggregator,
  cancel: CancellationToken,
) where
  P: RequestProcessor + ?Sized,
{
  loop {
    let request = tokio::select! {
      _ = cancel.cancelled() => break,
      next = queue.get() => match next {
        Some(request) => request,
        None => break,
      },
    };

    let record = process_guarded(processor.as_ref(), request).await;

    if let Err(e) = aggregator.append(record) {
      error!(worker = id, "dropping record: {e}");
    }
    queue.task_done();
  }

  debug!(worker = id, "worker stopped");
}

#[async_trait]
impl<P> BatchRunner for WorkerPool<P>
where
  P: RequestProcessor + 'static,
{
  async fn run_batch(&self, requests: Vec<FetchRequest>, cancel: CancellationToken) -> BatchOutcome {
    self.run(requests, &cancel).await
  }
}
