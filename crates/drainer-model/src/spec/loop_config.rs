use serde::{Deserialize, Serialize};

use crate::{
    domain::QueueFilter,
    error::ModelResult,
    strategy::{DurationBound, IdleBackoffStrategy},
};

/// Declarative configuration of a single worker loop.
///
/// `LoopConfig` describes *how long* a worker keeps draining, *how* it paces itself
/// while the queue is empty and *which* queues it takes work from.
///
/// The post-success jitter window is intentionally not part of this type:
/// it travels with the shutdown signal and is tuned independently of the idle backoff.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoopConfig {
    /// Total run time; values `<= 0` mean "run until shutdown".
    pub duration: DurationBound,
    /// Wait applied between empty polls.
    pub backoff: IdleBackoffStrategy,
    /// Queues to drain; empty means all of them.
    #[serde(skip_serializing_if = "QueueFilter::is_all")]
    pub queues: QueueFilter,
}

impl LoopConfig {
    /// Check the backoff invariant (`max >= base > 0`).
    pub fn validate(&self) -> ModelResult<()> {
        self.backoff.validate()
    }

    /// Builder-style helper to restrict the loop to the given queues.
    ///
    /// ```rust
    /// # use drainer_model::{LoopConfig, QueueFilter};
    /// let cfg = LoopConfig::default().with_queues("mail,reports".parse().unwrap());
    /// assert!(cfg.queues.matches("mail"));
    /// assert!(!cfg.queues.matches("default"));
    /// ```
    pub fn with_queues(mut self, queues: QueueFilter) -> Self {
        self.queues = queues;
        self
    }

    /// Builder-style helper to bound the total run time.
    pub fn with_duration(mut self, duration: DurationBound) -> Self {
        self.duration = duration;
        self
    }

    /// Builder-style helper to replace the idle backoff.
    pub fn with_backoff(mut self, backoff: IdleBackoffStrategy) -> Self {
        self.backoff = backoff;
        self
    }
}
