//! Task queue seam used by the worker loop.
//!
//! The loop only needs one operation: lease and execute a single ready task, then say whether
//! there was one. Storage, scheduling, leasing and per-task retries all live behind this trait.
mod error;
pub use error::{QueueError, TaskError};

mod memory;
pub use memory::MemoryQueue;

use async_trait::async_trait;
use drainer_model::QueueFilter;

/// A shared queue a worker drains one task at a time.
///
/// Implementations must be safe to call repeatedly and from several workers (or processes)
/// at once; handing each ready task to exactly one caller is the implementation's job.
#[async_trait]
pub trait TaskQueue: Send + Sync {
    /// Queue backend name used in logs.
    fn name(&self) -> &'static str;

    /// Try to lease and run one ready task whose queue matches `filter`.
    ///
    /// Returns `Ok(true)` if a task was found and executed (whatever its outcome),
    /// `Ok(false)` if nothing was ready. An `Err` means the queue itself is broken:
    /// the worker loop does not retry it and stops with that error.
    async fn run_next_task(&self, filter: &QueueFilter) -> Result<bool, QueueError>;
}
