use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::{FetchRequest, MetadataRecord};

/// Records gathered by a runner.
///
/// `completed` is false when the run was cancelled; `records` then holds only
/// what had been aggregated at that point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
  pub records: Vec<MetadataRecord>,
  pub completed: bool,
}

/// Drives a batch of requests through a `RequestProcessor`.
#[async_trait]
pub trait BatchRunner: Send + Sync {
  async fn run_batch(&self, requests: Vec<FetchRequest>, cancel: CancellationToken) -> BatchOutcome;
}

#[async_trait]
impl<T: BatchRunner + ?Sized> BatchRunner for Box<T> {
  async fn run_batch(&self, requests: Vec<FetchRequest>, cancel: CancellationToken) -> BatchOutcome {
    (**self).run_batch(requests, cancel).await
  }
}
