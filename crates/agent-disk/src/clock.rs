//! Time source used by the unmount retry loop.
//!
//! Sleeping is the only place a mounter call blocks beyond a single command,
//! so it goes through this trait and tests can swap in virtual time.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[derive(Debug)]
struct FakeClockState {
    now: Instant,
    sleeps: Vec<Duration>,
}

/// Virtual clock: `sleep` returns immediately and advances `now`.
///
/// Clones share the same timeline.
#[derive(Debug, Clone)]
pub struct FakeClock {
    state: Arc<Mutex<FakeClockState>>,
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeClockState {
                now: Instant::now(),
                sleeps: Vec::new(),
            })),
        }
    }

    /// Move time forward without recording a sleep.
    pub fn advance(&self, duration: Duration) {
        self.lock().now += duration;
    }

    /// Every duration passed to `sleep`, in call order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.lock().sleeps.clone()
    }

    fn lock(&self) -> MutexGuard<'_, FakeClockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.lock().now
    }

    fn sleep(&self, duration: Duration) {
        let mut state = self.lock();
        state.now += duration;
        state.sleeps.push(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_clock_sleep_advances_time() {
        let clock = FakeClock::new();
        let start = clock.now();

        clock.sleep(Duration::from_secs(2));
        clock.sleep(Duration::from_millis(500));

        assert_eq!(clock.now() - start, Duration::from_millis(2500));
        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_secs(2), Duration::from_millis(500)]
        );
    }

    #[test]
    fn fake_clock_clones_share_timeline() {
        let clock = FakeClock::new();
        let other = clock.clone();
        let start = clock.now();

        other.advance(Duration::from_secs(5));

        assert_eq!(clock.now() - start, Duration::from_secs(5));
        assert!(clock.sleeps().is_empty());
    }
}
