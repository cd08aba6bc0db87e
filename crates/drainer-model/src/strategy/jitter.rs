use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{DEFAULT_JITTER_MAX_MS, DEFAULT_JITTER_MIN_MS, DurationMs};
use crate::error::{ModelError, ModelResult};

/// Window the post-success pause is drawn from.
///
/// After a poll that found work, the worker waits a duration sampled uniformly from
/// `[min_ms, max_ms]` before polling again. This is independent of the idle backoff:
/// a busy queue is drained with short randomized pauses, an empty one with growing waits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JitterWindow {
    pub min_ms: DurationMs,
    pub max_ms: DurationMs,
}

impl JitterWindow {
    pub fn new(min_ms: DurationMs, max_ms: DurationMs) -> ModelResult<Self> {
        let w = Self { min_ms, max_ms };
        w.validate()?;
        Ok(w)
    }

    /// Build a window from fractional seconds, as accepted on the command line.
    pub fn from_secs_f64(min: f64, max: f64) -> ModelResult<Self> {
        Self::new(secs_to_ms(min)?, secs_to_ms(max)?)
    }

    pub fn validate(&self) -> ModelResult<()> {
        if self.min_ms > self.max_ms {
            return Err(ModelError::Invalid(format!(
                "jitter window min ({}ms) exceeds max ({}ms)",
                self.min_ms, self.max_ms
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn min(&self) -> Duration {
        Duration::from_millis(self.min_ms)
    }

    #[inline]
    pub fn max(&self) -> Duration {
        Duration::from_millis(self.max_ms)
    }

    /// Returns `true` if the window always yields the same duration.
    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.min_ms == self.max_ms
    }
}

impl Default for JitterWindow {
    fn default() -> Self {
        Self {
            min_ms: DEFAULT_JITTER_MIN_MS,
            max_ms: DEFAULT_JITTER_MAX_MS,
        }
    }
}

/// Convert non-negative fractional seconds into whole milliseconds.
///
/// A positive value that rounds to zero is rejected: durations have 1ms resolution.
pub(crate) fn secs_to_ms(secs: f64) -> ModelResult<DurationMs> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(ModelError::InvalidDuration(format!("{secs}s")));
    }
    let ms = (secs * 1000.0).round() as DurationMs;
    if ms == 0 && secs > 0.0 {
        return Err(ModelError::InvalidDuration(format!(
            "{secs}s is below the 1ms resolution"
        )));
    }
    Ok(ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_valid() {
        let w = JitterWindow::default();
        assert!(w.validate().is_ok());
        assert!(w.min() <= w.max());
    }

    #[test]
    fn rejects_inverted_window() {
        assert!(JitterWindow::new(300, 100).is_err());
    }

    #[test]
    fn parses_fractional_seconds() {
        let w = JitterWindow::from_secs_f64(0.1, 0.3).unwrap();
        assert_eq!(w.min_ms, 100);
        assert_eq!(w.max_ms, 300);
        assert!(!w.is_fixed());
    }

    #[test]
    fn sub_millisecond_seconds_are_rejected_not_zeroed() {
        let err = secs_to_ms(0.0004).unwrap_err();
        assert!(matches!(err, ModelError::InvalidDuration(ref msg) if msg.contains("1ms")));

        assert_eq!(secs_to_ms(0.0).unwrap(), 0);
        assert_eq!(secs_to_ms(0.0006).unwrap(), 1);
    }

    #[test]
    fn rejects_negative_or_nan_seconds() {
        assert!(JitterWindow::from_secs_f64(-0.1, 0.3).is_err());
        assert!(JitterWindow::from_secs_f64(0.1, f64::NAN).is_err());
    }
}
