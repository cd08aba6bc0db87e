use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Upper bound on the total run time of a worker loop.
///
/// Stored as signed milliseconds: any value `<= 0` means the loop runs until shutdown.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DurationBound(i64);

impl DurationBound {
    /// No time limit.
    pub const fn unbounded() -> Self {
        Self(0)
    }

    pub const fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    pub const fn from_secs(secs: i64) -> Self {
        Self(secs.saturating_mul(1000))
    }

    #[inline]
    pub const fn is_bounded(&self) -> bool {
        self.0 > 0
    }

    /// Returns the limit, or `None` when unbounded.
    pub fn limit(&self) -> Option<Duration> {
        self.is_bounded().then(|| Duration::from_millis(self.0 as u64))
    }

    /// Returns `true` once `elapsed` has reached the bound.
    ///
    /// Always `false` for an unbounded value.
    pub fn is_expired(&self, elapsed: Duration) -> bool {
        self.limit().is_some_and(|limit| elapsed >= limit)
    }
}

impl fmt::Display for DurationBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.limit() {
            Some(limit) => write!(f, "{}ms", limit.as_millis()),
            None => f.write_str("unbounded"),
        }
    }
}
