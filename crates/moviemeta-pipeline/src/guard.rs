use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tracing::error;

use moviemeta_core::domain::{FetchErrorKind, FetchRequest, MetadataRecord};
use moviemeta_core::ports::RequestProcessor;

/// Runs the processor and turns a panic into an `err_internal` record, so a
/// bug in one request still yields exactly one record.
pub(crate) async fn process_guarded<P>(processor: &P, request: FetchRequest) -> MetadataRecord
where
  P: RequestProcessor + ?Sized,
{
  let title = request.display_title().to_string();

  match AssertUnwindSafe(processor.process(request)).catch_unwind().await {
    Ok(record) => record,
    Err(_) => {
      error!(title, "processor panicked");
      MetadataRecord::failed(FetchErrorKind::Internal)
    }
  }
}
