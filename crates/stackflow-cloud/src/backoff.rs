//! Exponential backoff policy shared by every poll site

use std::time::Duration;

/// Backoff configuration for visibility polling
///
/// The poller sleeps `initial_delay`, then `initial_delay * multiplier`, and
/// so on, as long as the next delay is below `max_wait`. `max_wait` is also
/// the wall-clock budget of a whole poll.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    /// First delay (the seed)
    pub initial_delay: Duration,

    /// Backoff multiplier
    pub multiplier: f64,

    /// Ceiling for a single delay and for the total wait
    pub max_wait: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            multiplier: 2.0,
            max_wait: Duration::from_secs(100),
        }
    }
}

impl BackoffPolicy {
    pub fn new(initial_delay: Duration, max_wait: Duration) -> Self {
        Self {
            initial_delay,
            max_wait,
            ..Default::default()
        }
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Delay before the given attempt (0-based)
    ///
    /// Saturates at `Duration::MAX` instead of overflowing.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.powi(attempt.min(i32::MAX as u32) as i32);
        Duration::try_from_secs_f64(self.initial_delay.as_secs_f64() * factor)
            .unwrap_or(Duration::MAX)
    }

    /// Delays of the whole schedule, in order
    pub fn delays(&self) -> Delays<'_> {
        Delays {
            policy: self,
            attempt: 0,
        }
    }

    /// Number of attempts the schedule allows
    pub fn max_attempts(&self) -> u32 {
        self.delays().count() as u32
    }
}

/// Iterator over the delays of a [`BackoffPolicy`]
#[derive(Debug)]
pub struct Delays<'a> {
    policy: &'a BackoffPolicy,
    attempt: u32,
}

impl Iterator for Delays<'_> {
    type Item = Duration;

    fn next(&mut self) -> Option<Self::Item> {
        // a zero seed or a non-growing delay would never reach the ceiling
        if self.policy.initial_delay.is_zero() {
            return None;
        }
        if self.attempt > 0 && self.policy.multiplier <= 1.0 {
            return None;
        }
        let delay = self.policy.delay_for_attempt(self.attempt);
        if delay >= self.policy.max_wait {
            return None;
        }
        self.attempt += 1;
        Some(delay)
    }
}
