//! Default pacing values for the worker loop.
//!
//! These mirror the defaults of the command-line surface so that configs built
//! in code and configs parsed from flags start from the same place.

/// Wait after the first empty poll (5 seconds).
pub const DEFAULT_BASE_IDLE_MS: u64 = 5_000;

/// Upper bound for the idle wait (120 seconds).
pub const DEFAULT_MAX_IDLE_MS: u64 = 120_000;

/// Lower edge of the pause taken after a successful poll.
pub const DEFAULT_JITTER_MIN_MS: u64 = 100;

/// Upper edge of the pause taken after a successful poll.
pub const DEFAULT_JITTER_MAX_MS: u64 = 500;
