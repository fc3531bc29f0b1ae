use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::CancelToken;

/// Longest uninterrupted sleep in [`MonotonicClock::wait`]; bounds how late a cancellation is seen.
pub const WAIT_SLICE: Duration = Duration::from_millis(5);

/// Monotonic time source injected into nodes and the executor.
///
/// `now` is measured from an arbitrary, clock-specific origin and never decreases. Deadlines are
/// expressed in the same unit, so they only make sense against the clock that produced them.
pub trait Clock: Send + Sync {
    fn now(&self) -> Duration;
}

/// A [`Clock`] the executor can also wait on between ticks.
///
/// Nodes only ever receive the [`Clock`] half, so they have no way to block through it.
pub trait Pacer: Clock {
    fn as_clock(&self) -> &dyn Clock;

    /// Wait for `duration`, returning early once `cancel` is set.
    fn wait(&self, duration: Duration, cancel: &CancelToken);
}

pub type SharedClock = Arc<dyn Pacer>;

/// Wall clock backed by `Instant`.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub fn shared() -> SharedClock {
        Arc::new(Self::new())
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

impl Pacer for MonotonicClock {
    fn as_clock(&self) -> &dyn Clock {
        self
    }

    /// Sleeps in slices of at most [`WAIT_SLICE`], checking `cancel` between them.
    fn wait(&self, duration: Duration, cancel: &CancelToken) {
        let start = Instant::now();
        while !cancel.is_cancelled() {
            let elapsed = start.elapsed();
            if elapsed >= duration {
                return;
            }
            std::thread::sleep((duration - elapsed).min(WAIT_SLICE));
        }
    }
}

/// Simulated clock. Time only moves when `advance`/`set` is called, or when the executor waits.
///
/// Clones share the same reading, so a test can keep one handle and give another to the executor.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(start: Duration) -> Self {
        let clock = Self::new();
        clock.set(start);
        clock
    }

    pub fn shared(&self) -> SharedClock {
        Arc::new(self.clone())
    }

    /// Move the clock forward by `by`, saturating at the largest representable reading.
    pub fn advance(&self, by: Duration) {
        let by = to_nanos(by);
        let _ = self
            .nanos
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                Some(n.saturating_add(by))
            });
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    /// Move the clock to `to`. Readings are monotonic, so earlier targets are ignored.
    pub fn set(&self, to: Duration) {
        self.nanos.fetch_max(to_nanos(to), Ordering::AcqRel);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::Acquire))
    }
}

impl Pacer for ManualClock {
    fn as_clock(&self) -> &dyn Clock {
        self
    }

    /// Jumps the whole `duration` at once, unless cancellation was already requested.
    fn wait(&self, duration: Duration, cancel: &CancelToken) {
        if !cancel.is_cancelled() {
            self.advance(duration);
        }
    }
}

fn to_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_only_moves_forward() {
        let clock = ManualClock::new();
        clock.advance_ms(25);
        assert_eq!(clock.now(), Duration::from_millis(25));

        clock.set(Duration::from_millis(10));
        assert_eq!(clock.now(), Duration::from_millis(25));

        clock.set(Duration::from_millis(40));
        assert_eq!(clock.now(), Duration::from_millis(40));
    }

    #[test]
    fn manual_clock_advance_saturates_instead_of_wrapping() {
        let clock = ManualClock::starting_at(Duration::from_secs(1));
        clock.advance(Duration::MAX);
        assert_eq!(clock.now(), Duration::from_nanos(u64::MAX));

        clock.advance_ms(1);
        assert_eq!(clock.now(), Duration::from_nanos(u64::MAX));
    }

    #[test]
    fn manual_clock_wait_advances_shared_reading() {
        let clock = ManualClock::starting_at(Duration::from_secs(1));
        let shared = clock.shared();
        let cancel = CancelToken::new();
        shared.wait(Duration::from_millis(5), &cancel);
        assert_eq!(clock.now(), Duration::from_millis(1005));

        cancel.cancel();
        shared.wait(Duration::from_millis(5), &cancel);
        assert_eq!(clock.now(), Duration::from_millis(1005));
    }

    #[test]
    fn monotonic_wait_returns_early_on_cancel() {
        let clock = MonotonicClock::new();
        let cancel = CancelToken::new();
        let remote = cancel.clone();
        let canceller = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            remote.cancel();
        });

        let start = Instant::now();
        clock.wait(Duration::from_secs(60), &cancel);
        assert!(start.elapsed() < Duration::from_secs(10));
        canceller.join().unwrap();
    }

    #[test]
    fn monotonic_clock_does_not_go_backwards() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
