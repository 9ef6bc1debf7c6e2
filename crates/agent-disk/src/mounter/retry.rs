//! Bounded retry loop for flaky commands.

use crate::clock::Clock;
use crate::config::{DEFAULT_MAX_RETRY_WINDOW, DEFAULT_MAX_UNMOUNT_ATTEMPTS};
use crate::DiskError;
use std::time::Duration;

/// How long and how often to retry.
///
/// Retrying stops at whichever comes first: `max_attempts` attempts, or the
/// first failure observed once `max_window` has elapsed since attempt one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    interval: Duration,
    max_window: Duration,
    max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_RETRY_INTERVAL)
    }
}

impl RetryPolicy {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            max_window: DEFAULT_MAX_RETRY_WINDOW,
            max_attempts: DEFAULT_MAX_UNMOUNT_ATTEMPTS,
        }
    }

    pub fn max_window(mut self, window: Duration) -> Self {
        self.max_window = window;
        self
    }

    /// Values below 1 are treated as 1.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn window(&self) -> Duration {
        self.max_window
    }

    pub fn attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `op` until it succeeds or the budget is spent.
    ///
    /// `op` receives the 1-based attempt number. On exhaustion the last
    /// error is returned together with the number of attempts made.
    pub fn retry<T, C, F>(&self, clock: &C, mut op: F) -> Result<T, (u32, DiskError)>
    where
        C: Clock + ?Sized,
        F: FnMut(u32) -> Result<T, DiskError>,
    {
        let start = clock.now();
        let mut attempt = 0;
        loop {
            attempt += 1;
            let err = match op(attempt) {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            let elapsed = clock.now().saturating_duration_since(start);
            if attempt >= self.max_attempts || elapsed >= self.max_window {
                return Err((attempt, err));
            }

            log::warn!(
                "attempt {} failed ({}), retrying in {:?}",
                attempt,
                err,
                self.interval
            );
            clock.sleep(self.interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FakeClock;

    fn busy() -> DiskError {
        DiskError::CommandFailed {
            program: "umount".to_string(),
            code: Some(32),
            stderr: "target is busy".to_string(),
        }
    }

    #[test]
    fn succeeds_first_time_without_sleeping() {
        let clock = FakeClock::new();
        let policy = RetryPolicy::new(Duration::from_secs(1));

        let out = policy.retry(&clock, |_| Ok::<_, DiskError>(7)).unwrap();

        assert_eq!(out, 7);
        assert!(clock.sleeps().is_empty());
    }

    #[test]
    fn retries_until_success() {
        let clock = FakeClock::new();
        let policy = RetryPolicy::new(Duration::from_millis(10));
        let mut seen = Vec::new();

        let out = policy.retry(&clock, |attempt| {
            seen.push(attempt);
            if attempt < 3 {
                Err(busy())
            } else {
                Ok(attempt)
            }
        });

        assert_eq!(out.unwrap(), 3);
        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(clock.sleeps(), vec![Duration::from_millis(10); 2]);
    }

    #[test]
    fn stops_when_window_elapses() {
        let clock = FakeClock::new();
        let policy = RetryPolicy::new(Duration::from_secs(1))
            .max_window(Duration::from_secs(10))
            .max_attempts(u32::MAX);

        let (attempts, err) = policy.retry(&clock, |_| Err::<(), _>(busy())).unwrap_err();

        // Attempts at t=0..=10s; the one at t=10s observes the spent window.
        assert_eq!(attempts, 11);
        assert_eq!(clock.sleeps().len(), 10);
        assert!(matches!(err, DiskError::CommandFailed { .. }));
    }

    #[test]
    fn stops_at_attempt_cap() {
        let clock = FakeClock::new();
        let policy = RetryPolicy::new(Duration::from_millis(1))
            .max_window(Duration::from_secs(3600))
            .max_attempts(5);

        let (attempts, _) = policy.retry(&clock, |_| Err::<(), _>(busy())).unwrap_err();

        assert_eq!(attempts, 5);
        assert_eq!(clock.sleeps().len(), 4);
    }

    #[test]
    fn zero_attempts_means_one() {
        let policy = RetryPolicy::new(Duration::from_millis(1)).max_attempts(0);
        assert_eq!(policy.attempts(), 1);
    }
}
