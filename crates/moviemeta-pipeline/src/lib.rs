pub mod aggregator;
mod guard;
pub mod queue;
pub mod sequential;
pub mod worker_pool;

pub use aggregator::{AggregateError, Aggregator};
pub use queue::{QueueError, WorkQueue};
pub use sequential::SequentialRunner;
pub use worker_pool::{DEFAULT_WORKERS, PoolConfig, WorkerPool};
