mod backoff;
pub use backoff::IdleBackoffStrategy;

mod bound;
pub use bound::DurationBound;

mod jitter;
pub use jitter::JitterWindow;
