use std::time::Instant;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use moviemeta_core::domain::{FetchRequest, MetadataRecord};
use moviemeta_core::ports::{BatchOutcome, BatchRunner, RequestProcessor};

use crate::guard::process_guarded;

/// One request at a time, records in input order.
pub struct SequentialRunner<P> {
  processor: P,
}

impl<P: RequestProcessor> SequentialRunner<P> {
  pub fn new(processor: P) -> Self {
    Self { processor }
  }

  pub async fn run<I>(&self, requests: I, cancel: &CancellationToken) -> BatchOutcome
  where
    I: IntoIterator<Item = FetchRequest>,
  {
    let started = Instant::now();
    let mut records = Vec::new();
    let mut completed = true;

    for request in requests {
      let record = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
          completed = false;
          break;
        }
        record = process_guarded(&self.processor, request) => record,
      };
      records.push(record);
    }

    if !completed {
      warn!(gathered = records.len(), "sequential run cancelled");
    }
    info!(records = records.len(), "Sequential run finished in {:.3} s", started.elapsed().as_secs_f64());

    BatchOutcome { records, completed }
  }

  pub async fn run_to_completion<I>(&self, requests: I) -> Vec<MetadataRecord>
  where
    I: IntoIterator<Item = FetchRequest>,
  {
    self.run(requests, &CancellationToken::new()).await.records
  }
}

#[async_trait]
impl<P: RequestProcessor> BatchRunner for SequentialRunner<P> {
  async fn run_batch(&self, requests: Vec<FetchRequest>, cancel: CancellationToken) -> BatchOutcome {
    self.run(requests, &cancel).await
  }
}
