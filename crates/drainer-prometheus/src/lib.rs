//! Prometheus metrics backend for the drainer worker loop.
//!
//! This crate provides [`PrometheusMetrics`], an implementation of
//! [`drainer_core::MetricsBackend`] that exposes loop activity in Prometheus format.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use drainer_core::{MemoryQueue, ShutdownSignal, WorkerLoop};
//! use drainer_model::LoopConfig;
//! use drainer_prometheus::PrometheusMetrics;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusMetrics::new()?;
//! let worker = WorkerLoop::new(
//!     LoopConfig::default(),
//!     Arc::new(MemoryQueue::new()),
//!     ShutdownSignal::default(),
//! )
//! .with_metrics(Arc::new(metrics.clone()));
//! # drop(worker);
//!
//! // Later, from your HTTP handler:
//! let text = metrics.render()?;
//! # let _ = text;
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `drainer_polls_total{result}` - Counter (`found` / `empty`)
//! - `drainer_wait_seconds{kind}` - Histogram of planned waits (`idle` / `jitter`)
//! - `drainer_stops_total{reason}` - Counter (`shutdown` / `duration_elapsed`)
//!
//! ## HTTP Server
//! This crate does NOT serve `/metrics`; wire [`PrometheusMetrics::render`] or
//! [`PrometheusMetrics::gather`] into whatever HTTP stack the process already runs.

mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};
