//! Wall-clock deadlines for search.
//!
//! A `Deadline` is a plain `Copy` value passed explicitly into every
//! recursive search call; there is no shared clock state. Searches check it
//! at each node entry and unwind as soon as it has passed.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    start: Instant,
    /// None = no time limit
    stop_at: Option<Instant>,
}

impl Deadline {
    /// A deadline `budget` from now.
    pub fn after(budget: Duration) -> Self {
        let start = Instant::now();
        Self {
            start,
            stop_at: start.checked_add(budget),
        }
    }

    /// A deadline `ms` milliseconds from now.
    pub fn after_millis(ms: u64) -> Self {
        Self::after(Duration::from_millis(ms))
    }

    /// Never expires.
    pub fn unbounded() -> Self {
        Self {
            start: Instant::now(),
            stop_at: None,
        }
    }

    /// Already expired. Useful for exercising cancellation paths.
    pub fn expired() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            stop_at: Some(now),
        }
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        match self.stop_at {
            Some(at) => Instant::now() >= at,
            None => false,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Get remaining time (None if no limit).
    pub fn remaining(&self) -> Option<Duration> {
        self.stop_at
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    /// The same start instant with the total budget scaled by `factor`.
    pub fn rescaled(&self, factor: f64) -> Self {
        match self.stop_at {
            Some(at) => {
                let budget = at.saturating_duration_since(self.start).mul_f64(factor.max(0.0));
                Self {
                    start: self.start,
                    stop_at: self.start.checked_add(budget),
                }
            }
            None => *self,
        }
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[cfg(test)]
#[path = "deadline_tests.rs"]
mod deadline_tests;
