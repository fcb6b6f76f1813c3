use async_trait::async_trait;

use crate::domain::{FetchRequest, MediaCandidate, MetadataRecord};

/// Builds the query for a candidate. Pure and deterministic.
pub trait QueryBuilder: Send + Sync {
  fn build(&self, candidate: &MediaCandidate) -> FetchRequest;
}

/// Capability injected into the runners: turn one request into one record.
///
/// Implementations never fail: every transport or decoding problem must come
/// back as a `MetadataRecord::Failed`.
#[async_trait]
pub trait RequestProcessor: Send + Sync {
  async fn process(&self, request: FetchRequest) -> MetadataRecord;
}

#[async_trait]
impl<T: RequestProcessor + ?Sized> RequestProcessor for std::sync::Arc<T> {
  async fn process(&self, request: FetchRequest) -> MetadataRecord {
    (**self).process(request).await
  }
}
