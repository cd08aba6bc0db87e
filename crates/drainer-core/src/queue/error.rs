use thiserror::Error;

/// Failure of the queue backend itself.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue backend unavailable: {0}")]
    Unavailable(String),

    #[error("task '{task}' failed fatally: {reason}")]
    TaskFatal { task: String, reason: String },

    #[error("internal queue error: {0}")]
    Internal(String),
}

/// Outcome of a single task body.
///
/// `Fail` is contained by the queue (logged, counted, the poll still counts as work done).
/// `Fatal` escalates into [`QueueError::TaskFatal`] and stops the worker.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("task failed: {reason}")]
    Fail { reason: String },

    #[error("task failed fatally: {reason}")]
    Fatal { reason: String },
}

impl TaskError {
    pub fn fail(reason: impl Into<String>) -> Self {
        TaskError::Fail {
            reason: reason.into(),
        }
    }

    pub fn fatal(reason: impl Into<String>) -> Self {
        TaskError::Fatal {
            reason: reason.into(),
        }
    }
}
