//! Clock seam for identifier generation
//!
//! Generators never read ambient time directly; they consume a [`Clock`] so
//! that ordering-sensitive behavior stays deterministic under test.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Supplies a consistent, UTC-normalized "now".
pub trait Clock: Send + Sync {
    /// The current instant
    fn now(&self) -> DateTime<Utc>;

    /// A coarse, monotonically non-decreasing tick count in milliseconds.
    ///
    /// Used to seed per-key identifier counters so values stay roughly
    /// increasing across process restarts. Best-effort only.
    fn ticks(&self) -> i64 {
        self.now().timestamp_millis()
    }

    /// The offset of "now" from a base timestamp
    fn now_offset(&self, base: DateTime<Utc>) -> Duration {
        self.now() - base
    }
}

/// The wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A deterministic clock for tests: every read advances by a fixed step,
/// so sequential reads never observe the same instant.
#[derive(Debug)]
pub struct FixedClock {
    base: DateTime<Utc>,
    step_millis: i64,
    reads: AtomicI64,
}

impl FixedClock {
    /// Create a clock starting at `base`, advancing `step_millis` per read
    pub fn new(base: DateTime<Utc>, step_millis: i64) -> Self {
        Self {
            base,
            step_millis,
            reads: AtomicI64::new(0),
        }
    }

    /// A clock frozen at `base` (zero step)
    pub fn frozen(base: DateTime<Utc>) -> Self {
        Self::new(base, 0)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        let read = self.reads.fetch_add(1, Ordering::SeqCst);
        self.base + Duration::milliseconds(read * self.step_millis)
    }
}

/// A shareable clock handle, used as the registration kind when a clock is
/// stored in an [`OptionsRegistry`](crate::options::OptionsRegistry).
#[derive(Clone)]
pub struct ClockHandle(pub Arc<dyn Clock>);

impl ClockHandle {
    /// Wrap a clock implementation
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self(Arc::new(clock))
    }

    /// The wall clock
    pub fn system() -> Self {
        Self::new(SystemClock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_system_clock_is_utc_and_moves_forward() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
        assert!(clock.ticks() > 0);
    }

    #[test]
    fn test_fixed_clock_steps_per_read() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let clock = FixedClock::new(base, 10);
        assert_eq!(clock.now(), base);
        assert_eq!(clock.now(), base + Duration::milliseconds(10));
        assert_eq!(clock.now(), base + Duration::milliseconds(20));
    }

    #[test]
    fn test_frozen_clock_never_moves() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let clock = FixedClock::frozen(base);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn test_now_offset() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let clock = FixedClock::frozen(base + Duration::seconds(5));
        assert_eq!(clock.now_offset(base), Duration::seconds(5));
    }
}
