use crate::metrics::backend::{MetricsBackend, WaitKind};
use crate::worker::StopReason;

/// Metrics backend that records nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {
    #[inline(always)]
    fn record_poll(&self, _: bool) {}

    #[inline(always)]
    fn record_wait(&self, _: WaitKind, _: u64) {}

    #[inline(always)]
    fn record_stop(&self, _: StopReason) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_metrics_is_zero_size() {
        assert_eq!(std::mem::size_of::<NoOpMetrics>(), 0);
    }

    #[test]
    fn wait_kind_labels() {
        assert_eq!(WaitKind::Idle.as_label(), "idle");
        assert_eq!(WaitKind::Jitter.as_label(), "jitter");
    }
}
