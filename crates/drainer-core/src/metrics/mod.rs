//! Metrics collection abstraction for the worker loop.
//!
//! Backends (prometheus, statsd, ...) implement [`MetricsBackend`] and are handed to
//! [`crate::WorkerLoop::with_metrics`]. Without one, [`NoOpMetrics`] is used.
mod backend;
pub use backend::{MetricsBackend, MetricsHandle, WaitKind};

mod noop;
pub use noop::NoOpMetrics;

use std::sync::Arc;

/// Create a no-op metrics handle.
#[inline]
pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}
