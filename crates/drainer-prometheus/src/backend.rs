use std::sync::Arc;

use prometheus::{CounterVec, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder, proto::MetricFamily};

use drainer_core::{MetricsBackend, StopReason, WaitKind};

const NAMESPACE: &str = "drainer";

/// Prometheus metrics backend for the worker loop.
///
/// ## Label cardinality
/// All labels are bounded:
/// - `result`: "found", "empty"
/// - `kind`: "idle", "jitter"
/// - `reason`: "shutdown", "duration_elapsed"
#[derive(Clone)]
pub struct PrometheusMetrics {
    polls: CounterVec,
    waits: HistogramVec,
    stops: CounterVec,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    /// Create a backend registering into `registry`.
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let polls = CounterVec::new(
            Opts::new("polls_total", "Queue polls by result").namespace(NAMESPACE),
            &["result"],
        )?;
        registry.register(Box::new(polls.clone()))?;

        let waits = HistogramVec::new(
            HistogramOpts::new("wait_seconds", "Planned wait before the next poll")
                .namespace(NAMESPACE)
                .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 5.0, 10.0, 20.0, 40.0, 80.0, 120.0]),
            &["kind"],
        )?;
        registry.register(Box::new(waits.clone()))?;

        let stops = CounterVec::new(
            Opts::new("stops_total", "Worker loop stops by reason").namespace(NAMESPACE),
            &["reason"],
        )?;
        registry.register(Box::new(stops.clone()))?;

        Ok(Self {
            polls,
            waits,
            stops,
            registry,
        })
    }

    /// Create a backend with its own registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    /// Gather all metric families for exposition.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Render the registry in the Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        TextEncoder::new().encode_to_string(&self.gather())
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_poll(&self, found: bool) {
        let result = if found { "found" } else { "empty" };
        self.polls.with_label_values(&[result]).inc();
    }

    fn record_wait(&self, kind: WaitKind, duration_ms: u64) {
        self.waits
            .with_label_values(&[kind.as_label()])
            .observe(duration_ms as f64 / 1000.0);
    }

    fn record_stop(&self, reason: StopReason) {
        self.stops.with_label_values(&[reason.as_label()]).inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_create_prometheus_metrics() {
        let _metrics = PrometheusMetrics::new().expect("failed to create metrics");
    }

    #[test]
    fn polls_are_split_by_result() {
        let metrics = PrometheusMetrics::new().unwrap();

        metrics.record_poll(true);
        metrics.record_poll(true);
        metrics.record_poll(false);

        let text = metrics.render().unwrap();
        assert!(text.contains(r#"drainer_polls_total{result="found"} 2"#), "{text}");
        assert!(text.contains(r#"drainer_polls_total{result="empty"} 1"#), "{text}");
    }

    #[test]
    fn waits_land_in_histogram_by_kind() {
        let metrics = PrometheusMetrics::new().unwrap();

        metrics.record_wait(WaitKind::Idle, 5_000);
        metrics.record_wait(WaitKind::Idle, 10_000);
        metrics.record_wait(WaitKind::Jitter, 250);

        let families = metrics.gather();
        let waits = families
            .iter()
            .find(|f| f.name() == "drainer_wait_seconds")
            .expect("wait histogram not found");
        assert_eq!(waits.get_metric().len(), 2);

        let text = metrics.render().unwrap();
        assert!(text.contains(r#"drainer_wait_seconds_count{kind="idle"} 2"#), "{text}");
        assert!(text.contains(r#"drainer_wait_seconds_sum{kind="idle"} 15"#), "{text}");
    }

    #[test]
    fn stops_are_counted_by_reason() {
        let metrics = PrometheusMetrics::new().unwrap();

        metrics.record_stop(StopReason::Shutdown);
        metrics.record_stop(StopReason::DurationElapsed);

        let text = metrics.render().unwrap();
        assert!(text.contains(r#"drainer_stops_total{reason="shutdown"} 1"#), "{text}");
        assert!(text.contains(r#"drainer_stops_total{reason="duration_elapsed"} 1"#), "{text}");
    }

    #[test]
    fn can_use_custom_registry() {
        let registry = Arc::new(Registry::new());
        let metrics = PrometheusMetrics::new_with_registry(registry.clone()).unwrap();

        metrics.record_poll(false);
        assert!(!registry.gather().is_empty());
    }

    #[test]
    fn second_backend_on_same_registry_is_rejected() {
        let registry = Arc::new(Registry::new());
        let _first = PrometheusMetrics::new_with_registry(registry.clone()).unwrap();
        assert!(PrometheusMetrics::new_with_registry(registry).is_err());
    }
}
