//! String identifier domain

use crate::core::clock::Clock;
use crate::core::error::IdentifierError;
use crate::id::{IdentifierGenerator, KeyedCounters, SeedMode};
use std::sync::Arc;

/// Hex digits in the time prefix: 12 digits of milliseconds stay sortable
/// until the year 10889.
const PREFIX_WIDTH: usize = 12;

/// Generates readable, time-ordered string identifiers per key.
///
/// A value is the lowercase-hex concatenation of the clock's millisecond
/// tick count (zero-padded to 12 digits) and a per-key counter drawn from
/// the integer domain's stream. The counter makes values collision-free
/// under concurrency; the prefix makes lexicographic order track
/// generation order.
pub struct StringGenerator {
    clock: Arc<dyn Clock>,
    seed: SeedMode,
    suffix_width: usize,
    counters: KeyedCounters,
}

impl StringGenerator {
    /// Create a generator.
    ///
    /// `suffix_width` is the minimum hex width of the counter suffix; wider
    /// counter values render at their full width, so uniqueness never
    /// depends on the configured width.
    pub fn new(clock: Arc<dyn Clock>, seed: SeedMode, suffix_width: usize) -> Self {
        Self {
            clock,
            seed,
            suffix_width,
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

impl IdentifierGenerator<String> for StringGenerator {
    fn generate(&self, key: &str) -> Result<String, IdentifierError> {
        let sequence = self.counters.next(key, || self.seed_value())?;
        let millis = self.clock.ticks().max(0) as u64;
        Ok(format!(
            "{:0prefix$x}{:0suffix$x}",
            millis,
            sequence as u64,
            prefix = PREFIX_WIDTH,
            suffix = self.suffix_width,
        ))
    }
}
