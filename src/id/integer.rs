//! 64-bit integer identifier domain

use crate::core::clock::Clock;
use crate::core::error::IdentifierError;
use crate::id::{IdentifierGenerator, KeyedCounters, SeedMode};
use std::sync::Arc;

/// Generates monotonically increasing 64-bit identifiers per key.
///
/// Each key owns one atomic counter, seeded at first use from the clock's
/// tick count (or a fixed value), then advanced with an atomic
/// compare-and-swap. Sequential calls for one key strictly increase;
/// concurrent calls never observe the same value; distinct keys never
/// contend.
pub struct IntegerGenerator {
    clock: Arc<dyn Clock>,
    seed: SeedMode,
    counters: KeyedCounters,
}

impl IntegerGenerator {
    /// Create a generator seeding each key from the clock
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_seed(clock, SeedMode::Clock)
    }

    /// Create a generator with an explicit seed mode
    pub fn with_seed(clock: Arc<dyn Clock>, seed: SeedMode) -> Self {
        Self {
            clock,
            seed,
            counters: KeyedCounters::new(),
        }
    }

    fn seed_value(&self) -> i64 {
        match self.seed {
            SeedMode::Clock => self.clock.ticks(),
            SeedMode::Fixed(value) => value,
        }
    }
}

impl IdentifierGenerator<i64> for IntegerGenerator {
    fn generate(&self, key: &str) -> Result<i64, IdentifierError> {
        self.counters.next(key, || self.seed_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::{FixedClock, SystemClock};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_fixed_seed_sequence() {
        let generator =
            IntegerGenerator::with_seed(Arc::new(SystemClock), SeedMode::Fixed(1000));
        assert_eq!(generator.generate("ArticleId").unwrap(), 1001);
        assert_eq!(generator.generate("ArticleId").unwrap(), 1002);
    }

    #[test]
    fn test_restart_with_same_seed_source_resumes_at_or_after() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let clock = Arc::new(FixedClock::new(base, 1));

        let generator = IntegerGenerator::new(clock.clone());
        generator.generate("ArticleId").unwrap();
        let last = generator.generate("ArticleId").unwrap();

        // Simulated restart: a fresh generator over the same seed source,
        // which has moved forward in the meantime
        let restarted = IntegerGenerator::new(clock);
        assert!(restarted.generate("ArticleId").unwrap() >= last);
    }

    #[test]
    fn test_sequential_values_strictly_increase() {
        let generator = IntegerGenerator::new(Arc::new(SystemClock));
        let mut last = generator.generate("OrderId").unwrap();
        for _ in 0..1000 {
            let next = generator.generate("OrderId").unwrap();
            assert!(next > last);
            last = next;
        }
    }

    #[test]
    fn test_keys_have_independent_streams() {
        let generator =
            IntegerGenerator::with_seed(Arc::new(SystemClock), SeedMode::Fixed(0));
        assert_eq!(generator.generate("ArticleId").unwrap(), 1);
        assert_eq!(generator.generate("CategoryId").unwrap(), 1);
        assert_eq!(generator.generate("ArticleId").unwrap(), 2);
    }

    #[test]
    fn test_clock_seed_tracks_ticks() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let clock = Arc::new(FixedClock::frozen(base));
        let generator = IntegerGenerator::new(clock.clone());
        let expected = base.timestamp_millis() + 1;
        assert_eq!(generator.generate("ArticleId").unwrap(), expected);
    }
}
