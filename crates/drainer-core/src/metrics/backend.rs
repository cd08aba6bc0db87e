use std::sync::Arc;

use crate::worker::StopReason;

/// Which of the two loop suspensions a wait belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitKind {
    /// Backoff after an empty poll.
    Idle,
    /// Randomized pause after a poll that ran a task.
    Jitter,
}

impl WaitKind {
    /// Label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            WaitKind::Idle => "idle",
            WaitKind::Jitter => "jitter",
        }
    }
}

/// Backend metrics collection interface.
pub trait MetricsBackend: Send + Sync + 'static {
    /// Record one poll and whether it found work.
    fn record_poll(&self, found: bool);
    /// Record a planned wait before the next poll.
    ///
    /// # Arguments
    /// - `kind`: idle backoff or post-success jitter
    /// - `duration_ms`: planned wait; a shutdown may cut it short
    fn record_wait(&self, kind: WaitKind, duration_ms: u64);
    /// Record how a loop run ended.
    fn record_stop(&self, reason: StopReason);
}

/// Shared handle to a metrics backend.
pub type MetricsHandle = Arc<dyn MetricsBackend>;
