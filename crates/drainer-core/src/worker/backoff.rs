use std::{fmt, time::Duration};

use drainer_model::IdleBackoffStrategy;

/// Logical state of a worker loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    /// Last poll found work (also the initial state); idle delay sits at its base.
    Draining,
    /// One or more consecutive empty polls; idle delay is growing.
    IdleBackoff,
    /// Terminal: shutdown observed or run time exhausted.
    Stopped,
}

impl fmt::Display for LoopPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LoopPhase::Draining => "draining",
            LoopPhase::IdleBackoff => "idle-backoff",
            LoopPhase::Stopped => "stopped",
        })
    }
}

/// Idle delay state machine.
///
/// Invariant: `base <= current <= max` at all times.
#[derive(Debug, Clone)]
pub struct IdleBackoff {
    base: Duration,
    max: Duration,
    current: Duration,
    phase: LoopPhase,
}

impl IdleBackoff {
    /// Start in [`LoopPhase::Draining`] with the delay at `base`.
    ///
    /// The strategy is expected to be validated; a `max` below `base` is clamped up to `base`.
    pub fn new(strategy: &IdleBackoffStrategy) -> Self {
        let base = strategy.base();
        Self {
            base,
            max: strategy.max().max(base),
            current: base,
            phase: LoopPhase::Draining,
        }
    }

    /// Delay the next empty poll would wait.
    #[inline]
    pub fn current(&self) -> Duration {
        self.current
    }

    #[inline]
    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    /// Register an empty poll.
    ///
    /// Returns the delay to wait now and doubles the stored delay (capped at `max`)
    /// for the following empty poll.
    pub fn on_empty(&mut self) -> Duration {
        let wait = self.current;
        self.current = self
            .current
            .checked_mul(2)
            .map_or(self.max, |doubled| doubled.min(self.max));
        self.phase = LoopPhase::IdleBackoff;
        wait
    }

    /// Register a poll that ran a task: the delay snaps back to `base`.
    pub fn on_found(&mut self) {
        self.current = self.base;
        self.phase = LoopPhase::Draining;
    }

    /// Enter the terminal phase.
    pub fn stop(&mut self) {
        self.phase = LoopPhase::Stopped;
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng, rngs::StdRng};

    use super::*;

    fn backoff(base_ms: u64, max_ms: u64) -> IdleBackoff {
        IdleBackoff::new(&IdleBackoffStrategy::new(base_ms, max_ms).unwrap())
    }

    #[test]
    fn starts_draining_at_base() {
        let b = backoff(5_000, 120_000);
        assert_eq!(b.phase(), LoopPhase::Draining);
        assert_eq!(b.current(), Duration::from_secs(5));
    }

    #[test]
    fn k_empty_polls_reach_base_times_two_pow_k_capped() {
        let base = 5_000u64;
        let max = 120_000u64;
        let mut b = backoff(base, max);

        for k in 1..=10u32 {
            b.on_empty();
            let expected = (base * 2u64.pow(k)).min(max);
            assert_eq!(b.current(), Duration::from_millis(expected), "after {k} empty polls");
        }
        assert_eq!(b.phase(), LoopPhase::IdleBackoff);
    }

    #[test]
    fn on_empty_returns_delay_before_doubling() {
        let mut b = backoff(5_000, 20_000);
        let waits: Vec<u64> = (0..4).map(|_| b.on_empty().as_secs()).collect();
        assert_eq!(waits, vec![5, 10, 20, 20]);
    }

    #[test]
    fn found_resets_to_base() {
        let mut b = backoff(5_000, 20_000);
        b.on_empty();
        b.on_empty();
        b.on_found();

        assert_eq!(b.phase(), LoopPhase::Draining);
        assert_eq!(b.on_empty(), Duration::from_secs(5));
    }

    #[test]
    fn delay_stays_within_bounds_for_any_sequence() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let base = rng.gen_range(1..10_000u64);
            let max = base + rng.gen_range(0..1_000_000u64);
            let mut b = backoff(base, max);

            for _ in 0..200 {
                if rng.gen_bool(0.3) {
                    b.on_found();
                } else {
                    let wait = b.on_empty();
                    assert!(wait >= Duration::from_millis(base));
                    assert!(wait <= Duration::from_millis(max));
                }
                assert!(b.current() >= Duration::from_millis(base));
                assert!(b.current() <= Duration::from_millis(max));
            }
        }
    }

    #[test]
    fn huge_max_does_not_overflow() {
        let mut b = backoff(1, u64::MAX);
        for _ in 0..200 {
            b.on_empty();
        }
        assert!(b.current() <= Duration::from_millis(u64::MAX));
    }

    #[test]
    fn stop_is_terminal_phase() {
        let mut b = backoff(1_000, 1_000);
        b.stop();
        assert_eq!(b.phase(), LoopPhase::Stopped);
        assert_eq!(b.phase().to_string(), "stopped");
    }
}
