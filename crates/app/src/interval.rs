//! Interval policies: how long the scheduler sleeps between ticks.
//!
//! The policy is injected into the scheduler so the step machine itself
//! stays deterministic.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chooses the delay before the next tick. Called once after every tick.
pub trait IntervalPolicy: Send {
    fn next_interval(&mut self) -> Duration;
}

/// The same delay after every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedInterval(pub Duration);

impl Default for FixedInterval {
    fn default() -> Self {
        Self(Duration::from_millis(500))
    }
}

impl IntervalPolicy for FixedInterval {
    fn next_interval(&mut self) -> Duration {
        self.0
    }
}

/// `base` plus a uniformly random extra in `[0, jitter)`, redrawn after
/// every tick so polling does not lock onto the host's own refresh cadence.
#[derive(Debug, Clone)]
pub struct JitteredInterval {
    base: Duration,
    jitter: Duration,
    rng: StdRng,
}

impl JitteredInterval {
    /// Jittered policy seeded from OS entropy.
    #[must_use]
    pub fn new(base: Duration, jitter: Duration) -> Self {
        Self {
            base,
            jitter,
            rng: StdRng::from_entropy(),
        }
    }

    /// Jittered policy with a fixed seed, for reproducible runs.
    #[must_use]
    pub fn seeded(base: Duration, jitter: Duration, seed: u64) -> Self {
        Self {
            base,
            jitter,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for JitteredInterval {
    fn default() -> Self {
        Self::new(Duration::from_millis(3000), Duration::from_millis(2000))
    }
}

impl IntervalPolicy for JitteredInterval {
    fn next_interval(&mut self) -> Duration {
        if self.jitter.is_zero() {
            return self.base;
        }
        self.base + self.rng.gen_range(Duration::ZERO..self.jitter)
    }
}

impl<P: IntervalPolicy + ?Sized> IntervalPolicy for Box<P> {
    fn next_interval(&mut self) -> Duration {
        (**self).next_interval()
    }
}
