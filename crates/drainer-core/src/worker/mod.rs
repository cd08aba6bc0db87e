//! Adaptive polling worker loop.
//!
//! One loop instance polls its queue strictly sequentially: poll, react, wait, repeat.
//!
//! - Empty poll: run the idle hook, wait the current idle delay, double it (capped).
//! - Poll that ran a task: reset the idle delay, wait a random pause from the jitter window.
//! - Stop at the top of an iteration once shutdown was requested or the run time elapsed.
//!
//! Waits are cut short by a shutdown request; the loop then stops without polling again.
mod backoff;
pub use backoff::{IdleBackoff, LoopPhase};

mod report;
pub use report::{LoopReport, StopReason};


use std::{fmt, sync::Arc, time::Duration};

use tokio::time::Instant;
use tracing::{debug, info, instrument, trace, warn};

use drainer_model::LoopConfig;

use crate::{
    error::CoreError,
    hooks::{Bootstrap, IdleHook},
    jitter::{JitterSource, UniformJitter},
    metrics::{MetricsHandle, WaitKind, noop_metrics},
    queue::TaskQueue,
    shutdown::ShutdownSignal,
};

/// Per-run mutable state, owned by the running future.
struct LoopState {
    backoff: IdleBackoff,
    started_at: Instant,
    polls: u64,
    tasks_run: u64,
}

impl LoopState {
    fn report(&self, reason: StopReason) -> LoopReport {
        LoopReport {
            polls: self.polls,
            tasks_run: self.tasks_run,
            empty_polls: self.polls - self.tasks_run,
            elapsed: self.started_at.elapsed(),
            reason,
        }
    }
}

/// Worker that drains a [`TaskQueue`] until shutdown or until its run time is used up.
pub struct WorkerLoop {
    config: LoopConfig,
    queue: Arc<dyn TaskQueue>,
    shutdown: ShutdownSignal,
    idle_hook: Option<Arc<dyn IdleHook>>,
    bootstrap: Option<Arc<dyn Bootstrap>>,
    jitter: Arc<dyn JitterSource>,
    metrics: MetricsHandle,
}

impl WorkerLoop {
    pub fn new(config: LoopConfig, queue: Arc<dyn TaskQueue>, shutdown: ShutdownSignal) -> Self {
        Self {
            config,
            queue,
            shutdown,
            idle_hook: None,
            bootstrap: None,
            jitter: Arc::new(UniformJitter),
            metrics: noop_metrics(),
        }
    }

    /// Hook run after every empty poll, before the idle wait.
    pub fn with_idle_hook(mut self, hook: Arc<dyn IdleHook>) -> Self {
        self.idle_hook = Some(hook);
        self
    }

    /// Hook run once before the first poll.
    pub fn with_bootstrap(mut self, bootstrap: Arc<dyn Bootstrap>) -> Self {
        self.bootstrap = Some(bootstrap);
        self
    }

    /// Replace the random source for the post-success pause.
    pub fn with_jitter(mut self, jitter: Arc<dyn JitterSource>) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    /// Run the loop to completion.
    ///
    /// Returns a [`LoopReport`] on a clean stop (shutdown or run time elapsed).
    /// Errors come only from invalid configuration, a failed bootstrap, or the queue
    /// failing a poll; none of them is retried.
    #[instrument(
        level = "debug",
        skip(self),
        fields(queue = self.queue.name(), queues = %self.config.queues)
    )]
    pub async fn run(self) -> Result<LoopReport, CoreError> {
        self.config.validate()?;
        self.shutdown.jitter().validate()?;

        if let Some(bootstrap) = &self.bootstrap {
            debug!(hook = bootstrap.name(), "running bootstrap");
            bootstrap.bootstrap().await.map_err(CoreError::Bootstrap)?;
        }

        let mut state = LoopState {
            backoff: IdleBackoff::new(&self.config.backoff),
            started_at: Instant::now(),
            polls: 0,
            tasks_run: 0,
        };
        info!(
            duration = %self.config.duration,
            base_idle_ms = self.config.backoff.base_ms,
            max_idle_ms = self.config.backoff.max_ms,
            "worker loop started"
        );

        let reason = loop {
            if let Some(reason) = self.stop_reason(&state) {
                break reason;
            }

            let found = self.queue.run_next_task(&self.config.queues).await?;
            state.polls += 1;
            self.metrics.record_poll(found);
            trace!(poll = state.polls, found, "poll finished");

            if found {
                state.tasks_run += 1;
                state.backoff.on_found();
                let pause = self.jitter.sample(&self.shutdown.jitter());
                self.pause(WaitKind::Jitter, pause).await;
            } else {
                self.recycle_idle().await;
                let wait = state.backoff.on_empty();
                debug!(delay_ms = millis(wait), "waiting for tasks");
                self.pause(WaitKind::Idle, wait).await;
            }
        };

        state.backoff.stop();
        self.metrics.record_stop(reason);
        let report = state.report(reason);
        info!(
            reason = %report.reason,
            polls = report.polls,
            tasks_run = report.tasks_run,
            elapsed_ms = millis(report.elapsed),
            "worker loop stopped"
        );
        Ok(report)
    }

    /// Shutdown wins over an elapsed run time when both hold.
    fn stop_reason(&self, state: &LoopState) -> Option<StopReason> {
        if self.shutdown.is_requested() {
            return Some(StopReason::Shutdown);
        }
        if self.config.duration.is_expired(state.started_at.elapsed()) {
            return Some(StopReason::DurationElapsed);
        }
        None
    }

    async fn recycle_idle(&self) {
        let Some(hook) = &self.idle_hook else {
            return;
        };
        if let Err(e) = hook.on_idle().await {
            warn!(hook = hook.name(), error = %e, "idle hook failed");
        }
    }

    async fn pause(&self, kind: WaitKind, duration: Duration) {
        self.metrics.record_wait(kind, millis(duration));
        if duration.is_zero() {
            tokio::task::yield_now().await;
            return;
        }
        tokio::select! {
            _ = tokio::time::sleep(duration) => {}
            _ = self.shutdown.requested() => {
                trace!(kind = kind.as_label(), "wait cut short by shutdown");
            }
        }
    }
}

impl fmt::Debug for WorkerLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerLoop")
            .field("config", &self.config)
            .field("queue", &self.queue.name())
            .field("shutdown", &self.shutdown)
            .field("idle_hook", &self.idle_hook.as_ref().map(|h| h.name()))
            .field("bootstrap", &self.bootstrap.as_ref().map(|b| b.name()))
            .finish()
    }
}

#[inline]
fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
