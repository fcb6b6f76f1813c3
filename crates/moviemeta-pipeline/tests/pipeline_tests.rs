//! Worker pool and sequential runner behaviour with in-memory processors.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use moviemeta_core::domain::{FetchErrorKind, FetchRequest, MetadataRecord, MovieMetadata};
use moviemeta_core::ports::{BatchRunner, RequestProcessor};
use moviemeta_pipeline::{PoolConfig, SequentialRunner, WorkerPool};
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

fn requests(titles: &[Option<&str>]) -> Vec<FetchRequest> {
  titles
    .iter()
    .map(|t| {
      let url = t.map(|t| format!("http://test/?t={t}")).unwrap_or_default();
      FetchRequest::new(t.map(String::from), None, url)
    })
    .collect()
}

fn numbered(n: usize) -> Vec<FetchRequest> {
  (0..n).map(|i| FetchRequest::new(Some(format!("movie-{i}")), None, format!("http://test/?t=movie-{i}"))).collect()
}

fn sorted(mut records: Vec<MetadataRecord>) -> Vec<MetadataRecord> {
  records.sort();
  records
}

/// Deterministic: no title is a request error, titles starting with "bad"
/// time out, everything else resolves to an empty record after a short,
/// title-dependent delay so completions interleave.
struct Echo;

#[async_trait]
impl RequestProcessor for Echo {
  async fn process(&self, request: FetchRequest) -> MetadataRecord {
    let Some(title) = request.title.clone() else {
      return MetadataRecord::failed(FetchErrorKind::Request);
    };

    tokio::time::sleep(Duration::from_millis((title.len() % 4) as u64)).await;

    if title.starts_with("bad") {
      MetadataRecord::failed(FetchErrorKind::Timeout)
    } else {
      MovieMetadata::empty(title).into()
    }
  }
}

/// Blocks every request until the test hands out a permit. Each request
/// consumes one.
struct Gate {
  open: Arc<Semaphore>,
  started: Arc<AtomicUsize>,
}

#[async_trait]
impl RequestProcessor for Gate {
  async fn process(&self, request: FetchRequest) -> MetadataRecord {
    self.started.fetch_add(1, Ordering::SeqCst);
    self.open.acquire().await.unwrap().forget();
    MovieMetadata::empty(request.display_title()).into()
  }
}

/// Counts how many items the driver pulled from the input.
struct Counting<I> {
  inner: I,
  pulled: Arc<AtomicUsize>,
}

impl<I: Iterator> Iterator for Counting<I> {
  type Item = I::Item;

  fn next(&mut self) -> Option<Self::Item> {
    let item = self.inner.next();
    if item.is_some() {
      self.pulled.fetch_add(1, Ordering::SeqCst);
    }
    item
  }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn pool_matches_sequential_as_multisets() {
  let input = requests(&[Some("Heat"), Some("Alien"), None, Some("bad-one"), Some("The Matrix"), Some("Heat"), None]);

  let pool = WorkerPool::new(Echo, PoolConfig::new(3)).run_to_completion(input.clone()).await;
  let sequential = SequentialRunner::new(Echo).run_to_completion(input.clone()).await;

  assert_eq!(pool.len(), input.len());
  assert_eq!(sorted(pool), sorted(sequential));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn one_record_per_request_even_when_most_fail() {
  let titles: Vec<Option<String>> =
    (0..40).map(|i| if i % 3 == 0 { None } else if i % 3 == 1 { Some(format!("bad-{i}")) } else { Some(format!("ok-{i}")) }).collect();
  let input = requests(&titles.iter().map(|t| t.as_deref()).collect::<Vec<_>>());

  let outcome = WorkerPool::new(Echo, PoolConfig::new(5)).run(input, &CancellationToken::new()).await;

  assert!(outcome.completed);
  assert_eq!(outcome.records.len(), 40);
  let failures = outcome.records.iter().filter(|r| !r.is_success()).count();
  assert_eq!(failures, 27);
}

#[tokio::test]
async fn empty_batch_completes() {
  let outcome = WorkerPool::new(Echo, PoolConfig::default()).run(Vec::new(), &CancellationToken::new()).await;

  assert!(outcome.completed);
  assert!(outcome.records.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn single_worker_pool_processes_everything() {
  let outcome = WorkerPool::new(Echo, PoolConfig::new(1)).run(numbered(12), &CancellationToken::new()).await;

  assert!(outcome.completed);
  assert_eq!(outcome.records.len(), 12);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn stalled_pool_limits_how_much_input_is_pulled() {
  const WORKERS: usize = 2;
  const TOTAL: usize = 50;

  let open = Arc::new(Semaphore::new(0));
  let started = Arc::new(AtomicUsize::new(0));
  let pulled = Arc::new(AtomicUsize::new(0));

  let pool = WorkerPool::new(
    Gate { open: Arc::clone(&open), started: Arc::clone(&started) },
    PoolConfig::new(WORKERS),
  );
  let input = Counting { inner: numbered(TOTAL).into_iter(), pulled: Arc::clone(&pulled) };

  let run = tokio::spawn(async move { pool.run(input, &CancellationToken::new()).await });

  // Let the workers pick up their first request and the queue fill up.
  tokio::time::sleep(Duration::from_millis(200)).await;

  assert_eq!(started.load(Ordering::SeqCst), WORKERS);
  // Workers hold one each; the feeder blocks on the one past a full queue.
  assert_eq!(pulled.load(Ordering::SeqCst), WORKERS + 2 * WORKERS + 1);

  open.add_permits(TOTAL);
  let outcome = timeout(Duration::from_secs(5), run).await.unwrap().unwrap();

  assert!(outcome.completed);
  assert_eq!(outcome.records.len(), TOTAL);
  assert_eq!(pulled.load(Ordering::SeqCst), TOTAL);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn cancelling_a_stalled_pool_returns_partial_records() {
  let open = Arc::new(Semaphore::new(3));
  let pool = WorkerPool::new(Gate { open, started: Arc::new(AtomicUsize::new(0)) }, PoolConfig::new(2));
  let cancel = CancellationToken::new();

  let trigger = cancel.clone();
  tokio::spawn(async move {
    tokio::time::sleep(Duration::from_millis(200)).await;
    trigger.cancel();
  });

  let outcome = timeout(Duration::from_secs(5), pool.run(numbered(20), &cancel)).await.unwrap();

  assert!(!outcome.completed);
  // Only 3 permits were ever handed out.
  assert!(outcome.records.len() <= 3);
  assert!(outcome.records.iter().all(MetadataRecord::is_success));
}

#[tokio::test]
async fn cancelled_before_start_returns_nothing() {
  let cancel = CancellationToken::new();
  cancel.cancel();

  let pool = WorkerPool::new(Echo, PoolConfig::new(2)).run(numbered(5), &cancel).await;
  let sequential = SequentialRunner::new(Echo).run(numbered(5), &cancel).await;

  assert!(!pool.completed && pool.records.is_empty());
  assert!(!sequential.completed && sequential.records.is_empty());
}

struct Explosive;

#[async_trait]
impl RequestProcessor for Explosive {
  async fn process(&self, request: FetchRequest) -> MetadataRecord {
    if request.display_title() == "boom" {
      panic!("processor bug");
    }
    MovieMetadata::empty(request.display_title()).into()
  }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn panicking_processor_still_yields_one_record() {
  let input = requests(&[Some("Heat"), Some("boom"), Some("Alien"), Some("boom")]);

  let pool = WorkerPool::new(Explosive, PoolConfig::new(2)).run_to_completion(input.clone()).await;
  let sequential = SequentialRunner::new(Explosive).run_to_completion(input).await;

  for records in [&pool, &sequential] {
    assert_eq!(records.len(), 4);
    assert_eq!(records.iter().filter(|r| r.failure() == Some(FetchErrorKind::Internal)).count(), 2);
  }
}

#[tokio::test]
async fn sequential_keeps_input_order() {
  let input = requests(&[Some("c"), None, Some("a"), Some("b")]);

  let records = SequentialRunner::new(Echo).run_to_completion(input).await;

  assert_eq!(records[0].movie().map(|m| m.title.as_str()), Some("c"));
  assert_eq!(records[1].failure(), Some(FetchErrorKind::Request));
  assert_eq!(records[2].movie().map(|m| m.title.as_str()), Some("a"));
  assert_eq!(records[3].movie().map(|m| m.title.as_str()), Some("b"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn runners_are_interchangeable_behind_the_port() {
  let runners: Vec<Box<dyn BatchRunner>> =
    vec![Box::new(WorkerPool::new(Echo, PoolConfig::new(4))), Box::new(SequentialRunner::new(Echo))];

  for runner in runners {
    let outcome = runner.run_batch(numbered(9), CancellationToken::new()).await;
    assert!(outcome.completed);
    assert_eq!(outcome.records.len(), 9);
  }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn shared_processor_is_reused_across_runs() {
  let calls = Arc::new(AtomicUsize::new(0));

  struct Counted(Arc<AtomicUsize>);

  #[async_trait]
  impl RequestProcessor for Counted {
    async fn process(&self, request: FetchRequest) -> MetadataRecord {
      self.0.fetch_add(1, Ordering::SeqCst);
      MovieMetadata::empty(request.display_title()).into()
    }
  }

  let processor = Arc::new(Counted(Arc::clone(&calls)));
  let pool = WorkerPool::from_arc(Arc::clone(&processor), PoolConfig::new(3));

  pool.run_to_completion(numbered(7)).await;
  pool.run_to_completion(numbered(5)).await;

  assert_eq!(calls.load(Ordering::SeqCst), 12);
}
