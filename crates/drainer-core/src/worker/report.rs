use std::{fmt, time::Duration};

/// Why a worker loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The shutdown flag was observed.
    Shutdown,
    /// The configured run time elapsed.
    DurationElapsed,
}

impl StopReason {
    /// Label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            StopReason::Shutdown => "shutdown",
            StopReason::DurationElapsed => "duration_elapsed",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Summary of a finished loop run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopReport {
    pub polls: u64,
    pub tasks_run: u64,
    pub empty_polls: u64,
    pub elapsed: Duration,
    pub reason: StopReason,
}

impl fmt::Display for LoopReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LoopReport(reason={}, polls={}, tasks_run={}, empty_polls={}, elapsed_ms={})",
            self.reason,
            self.polls,
            self.tasks_run,
            self.empty_polls,
            self.elapsed.as_millis()
        )
    }
}
