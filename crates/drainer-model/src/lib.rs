mod domain;
pub use domain::{DEFAULT_BASE_IDLE_MS, DEFAULT_JITTER_MAX_MS, DEFAULT_JITTER_MIN_MS, DEFAULT_MAX_IDLE_MS};
pub use domain::{DurationMs, QueueFilter, QueueName};

mod error;
pub use error::{ModelError, ModelResult};

mod spec;
pub use spec::LoopConfig;

mod strategy;
pub use strategy::{DurationBound, IdleBackoffStrategy, JitterWindow};
