//! Random pause drawn after a successful poll.
use std::time::Duration;

use rand::Rng;

use drainer_model::JitterWindow;

/// Source of the post-success pause.
///
/// Injected into the worker loop so tests can swap the random draw for a fixed value.
pub trait JitterSource: Send + Sync {
    fn sample(&self, window: &JitterWindow) -> Duration;
}

/// Uniform draw over `[min, max]` with microsecond resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformJitter;

impl JitterSource for UniformJitter {
    fn sample(&self, window: &JitterWindow) -> Duration {
        if window.is_fixed() {
            return window.min();
        }
        let lo = window.min_ms.saturating_mul(1_000);
        let hi = window.max_ms.saturating_mul(1_000).max(lo);
        Duration::from_micros(rand::thread_rng().gen_range(lo..=hi))
    }
}
