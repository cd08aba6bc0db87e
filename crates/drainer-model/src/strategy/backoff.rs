use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{DEFAULT_BASE_IDLE_MS, DEFAULT_MAX_IDLE_MS, DurationMs};
use crate::error::{ModelError, ModelResult};
use crate::strategy::jitter::secs_to_ms;

/// Exponential wait applied after consecutive empty polls.
///
/// The first empty poll waits `base_ms`, every further empty poll doubles the wait
/// until it reaches `max_ms`. A successful poll resets the wait back to `base_ms`.
///
/// Invariant: `max_ms >= base_ms > 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdleBackoffStrategy {
    pub base_ms: DurationMs,
    pub max_ms: DurationMs,
}

impl IdleBackoffStrategy {
    pub fn new(base_ms: DurationMs, max_ms: DurationMs) -> ModelResult<Self> {
        let s = Self { base_ms, max_ms };
        s.validate()?;
        Ok(s)
    }

    /// Build a strategy from fractional seconds, as accepted on the command line.
    pub fn from_secs_f64(base: f64, max: f64) -> ModelResult<Self> {
        Self::new(secs_to_ms(base)?, secs_to_ms(max)?)
    }

    pub fn validate(&self) -> ModelResult<()> {
        if self.base_ms == 0 {
            return Err(ModelError::Invalid("idle backoff base must be positive".into()));
        }
        if self.max_ms < self.base_ms {
            return Err(ModelError::Invalid(format!(
                "idle backoff max ({}ms) is below base ({}ms)",
                self.max_ms, self.base_ms
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn base(&self) -> Duration {
        Duration::from_millis(self.base_ms)
    }

    #[inline]
    pub fn max(&self) -> Duration {
        Duration::from_millis(self.max_ms)
    }
}

impl Default for IdleBackoffStrategy {
    fn default() -> Self {
        Self {
            base_ms: DEFAULT_BASE_IDLE_MS,
            max_ms: DEFAULT_MAX_IDLE_MS,
        }
    }
}
