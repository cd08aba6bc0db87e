mod constants;
pub use constants::{
    DEFAULT_BASE_IDLE_MS, DEFAULT_JITTER_MAX_MS, DEFAULT_JITTER_MIN_MS, DEFAULT_MAX_IDLE_MS,
};

mod queues;
pub use queues::QueueFilter;

/// Name of a queue a task is bound to.
pub type QueueName = String;

/// Duration value in milliseconds.
///
/// Used by every pacing knob of the worker loop.
pub type DurationMs = u64;
