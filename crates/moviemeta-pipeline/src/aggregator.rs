use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

use moviemeta_core::domain::MetadataRecord;

#[derive(Debug, Error)]
pub enum AggregateError {
  #[error("aggregator lock poisoned")]
  Poisoned,

  #[error("serialization failed: {0}")]
  Serialize(#[from] serde_json::Error),
}

/// Append-only sink shared by the workers of one batch.
///
/// Clones share the same collection. Readers are expected to wait for the
/// batch to be joined first; nothing here orders appends.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
  records: Arc<Mutex<Vec<MetadataRecord>>>,
}

impl Aggregator {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn append(&self, record: MetadataRecord) -> Result<(), AggregateError> {
    let mut records = self.records.lock().map_err(|_| AggregateError::Poisoned)?;
    records.push(record);
    Ok(())
  }

  /// Snapshot of everything appended so far.
  pub fn all(&self) -> Vec<MetadataRecord> {
    // A writer that panicked mid-push left the Vec intact; keep what is there.
    self.records.lock().unwrap_or_else(PoisonError::into_inner).clone()
  }

  pub fn len(&self) -> usize {
    self.records.lock().unwrap_or_else(PoisonError::into_inner).len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// JSON array of the records, in append order.
  pub fn serialize(&self) -> Result<String, AggregateError> {
    let records = self.records.lock().map_err(|_| AggregateError::Poisoned)?;
    Ok(serde_json::to_string(&*records)?)
  }
}
