//! Identifier generation
//!
//! Three identifier domains (GUID, 64-bit integer, string) share one
//! contract: [`IdentifierGenerator::generate`] produces a value unique for
//! the caller-supplied logical key. The key string is the unit of
//! isolation: streams for `"ArticleId"` and `"CategoryId"` never interact,
//! and a key's strategy is fixed for the process once first used.
//!
//! None of the generators suspend in their own right; the async entry point
//! exists for call sites that carry a cancellation token. Cancellation is
//! advisory: observed before the atomic step it consumes nothing from the
//! stream, observed after it changes nothing.

pub mod guid;
pub mod integer;
pub mod string;

pub use guid::GuidGenerator;
pub use integer::IntegerGenerator;
pub use string::StringGenerator;

use crate::config::{IdentifierConfig, WeaveConfig};
use crate::core::clock::{Clock, ClockHandle};
use crate::core::error::IdentifierError;
use crate::options::OptionsRegistry;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};
use tokio_util::sync::CancellationToken;

/// Common contract for the three identifier domains.
///
/// `generate` is synchronous and lock-free on the hot path;
/// `generate_async` adds advisory cancellation with identical semantics
/// otherwise.
#[async_trait]
pub trait IdentifierGenerator<I>: Send + Sync
where
    I: Send + 'static,
{
    /// Produce the next identifier for the given logical key
    fn generate(&self, key: &str) -> Result<I, IdentifierError>;

    /// Async variant honoring a cancellation token.
    ///
    /// When the token is cancelled before the atomic step, no value is
    /// consumed from the key's stream and [`IdentifierError::Cancelled`]
    /// is returned. Once a value has been produced it is returned
    /// regardless of the token.
    async fn generate_async(
        &self,
        key: &str,
        cancel: &CancellationToken,
    ) -> Result<I, IdentifierError> {
        // Biased: an already-cancelled token always wins before the
        // generation branch can consume from the stream.
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(IdentifierError::Cancelled {
                key: key.to_string(),
            }),
            result = async { self.generate(key) } => result,
        }
    }
}

/// How a per-key counter stream obtains its first value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedMode {
    /// Seed from the clock's millisecond tick count at first use.
    ///
    /// Keeps values roughly increasing across process restarts;
    /// best-effort, not a strict guarantee.
    Clock,
    /// Seed every key from a fixed value
    Fixed(i64),
}

/// Per-key atomic counters shared by the integer and string domains.
///
/// The lock guards only the key table; increments are atomic operations on
/// the per-key counter, so generation for distinct keys never contends.
pub(crate) struct KeyedCounters {
    counters: RwLock<HashMap<String, Arc<AtomicI64>>>,
}

impl KeyedCounters {
    pub(crate) fn new() -> Self {
        Self {
            counters: RwLock::new(HashMap::new()),
        }
    }

    fn counter(
        &self,
        key: &str,
        seed: impl FnOnce() -> i64,
    ) -> Result<Arc<AtomicI64>, IdentifierError> {
        {
            let counters = self.counters.read().map_err(|e| {
                IdentifierError::OperationFailed {
                    key: key.to_string(),
                    message: format!("failed to acquire read lock: {}", e),
                }
            })?;
            if let Some(counter) = counters.get(key) {
                return Ok(Arc::clone(counter));
            }
        }

        let mut counters = self.counters.write().map_err(|e| {
            IdentifierError::OperationFailed {
                key: key.to_string(),
                message: format!("failed to acquire write lock: {}", e),
            }
        })?;
        let counter = counters.entry(key.to_string()).or_insert_with(|| {
            let seed = seed();
            tracing::debug!(key = %key, seed, "seeded identifier stream");
            Arc::new(AtomicI64::new(seed))
        });
        Ok(Arc::clone(counter))
    }

    /// Atomically advance the counter for `key`, seeding it on first use.
    ///
    /// The increment is a compare-and-swap loop: no two callers ever
    /// observe the same pre-increment value. Overflow is fatal for the key,
    /// never a silent wrap.
    pub(crate) fn next(
        &self,
        key: &str,
        seed: impl FnOnce() -> i64,
    ) -> Result<i64, IdentifierError> {
        let counter = self.counter(key, seed)?;
        match counter.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |value| {
            value.checked_add(1)
        }) {
            Ok(previous) => Ok(previous + 1),
            Err(_) => Err(IdentifierError::CounterOverflow {
                key: key.to_string(),
            }),
        }
    }

    #[cfg(test)]
    pub(crate) fn set(&self, key: &str, value: i64) {
        if let Ok(mut counters) = self.counters.write() {
            counters.insert(key.to_string(), Arc::new(AtomicI64::new(value)));
        }
    }
}

/// Owns the three per-domain generators behind one clock.
///
/// Obtainable directly from configuration or by dependency lookup through
/// an [`OptionsRegistry`].
pub struct IdentifierHub {
    guid: Arc<GuidGenerator>,
    integer: Arc<IntegerGenerator>,
    string: Arc<StringGenerator>,
}

impl std::fmt::Debug for IdentifierHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentifierHub").finish_non_exhaustive()
    }
}

impl IdentifierHub {
    /// Create a hub from configuration and a clock
    pub fn new(config: &IdentifierConfig, clock: Arc<dyn Clock>) -> Self {
        let seed = match config.integer_seed {
            Some(value) => SeedMode::Fixed(value),
            None => SeedMode::Clock,
        };

        Self {
            guid: Arc::new(GuidGenerator::with_mode(Arc::clone(&clock), config.guid_mode)),
            integer: Arc::new(IntegerGenerator::with_seed(Arc::clone(&clock), seed)),
            string: Arc::new(StringGenerator::new(
                clock,
                seed,
                config.string_suffix_width,
            )),
        }
    }

    /// Create a hub by dependency lookup.
    ///
    /// Requires a [`ClockHandle`] in the registry; fails with
    /// [`IdentifierError::MissingCollaborator`] otherwise. A memoized
    /// [`WeaveConfig`] is honored when present.
    pub fn from_options(options: &OptionsRegistry) -> Result<Self, IdentifierError> {
        let clock = options
            .try_get::<ClockHandle>()
            .ok_or_else(|| IdentifierError::MissingCollaborator {
                collaborator: "Clock".to_string(),
            })?;
        let config = options
            .try_get::<WeaveConfig>()
            .map(|config| config.identifier.clone())
            .unwrap_or_default();
        Ok(Self::new(&config, Arc::clone(&clock.0)))
    }

    /// The GUID-domain generator
    pub fn guid(&self) -> Arc<GuidGenerator> {
        Arc::clone(&self.guid)
    }

    /// The integer-domain generator
    pub fn integer(&self) -> Arc<IntegerGenerator> {
        Arc::clone(&self.integer)
    }

    /// The string-domain generator
    pub fn string(&self) -> Arc<StringGenerator> {
        Arc::clone(&self.string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::SystemClock;

    #[test]
    fn test_keyed_counters_seed_once() {
        let counters = KeyedCounters::new();
        assert_eq!(counters.next("a", || 100).unwrap(), 101);
        // Seed closure is ignored after first use
        assert_eq!(counters.next("a", || 500).unwrap(), 102);
    }

    #[test]
    fn test_keyed_counters_keys_are_independent() {
        let counters = KeyedCounters::new();
        assert_eq!(counters.next("a", || 0).unwrap(), 1);
        assert_eq!(counters.next("b", || 1000).unwrap(), 1001);
        assert_eq!(counters.next("a", || 0).unwrap(), 2);
    }

    #[test]
    fn test_keyed_counters_overflow_is_fatal() {
        let counters = KeyedCounters::new();
        counters.set("full", i64::MAX);
        let err = counters.next("full", || 0).unwrap_err();
        assert!(matches!(err, IdentifierError::CounterOverflow { .. }));
        // The stream stays failed rather than wrapping
        let err = counters.next("full", || 0).unwrap_err();
        assert!(matches!(err, IdentifierError::CounterOverflow { .. }));
    }

    #[test]
    fn test_hub_from_options_requires_clock() {
        let options = OptionsRegistry::new();
        let err = IdentifierHub::from_options(&options).unwrap_err();
        assert!(matches!(err, IdentifierError::MissingCollaborator { .. }));
    }

    #[test]
    fn test_hub_from_options_with_clock() {
        let options = OptionsRegistry::new();
        options.add_or_update(ClockHandle::new(SystemClock));
        let hub = IdentifierHub::from_options(&options).unwrap();
        assert!(hub.integer().generate("OrderId").is_ok());
    }

    #[test]
    fn test_hub_honors_memoized_config() {
        let options = OptionsRegistry::new();
        options.add_or_update(ClockHandle::new(SystemClock));
        options.add_or_update(WeaveConfig::default_config());

        let hub = IdentifierHub::from_options(&options).unwrap();
        // default_config pins the integer seed at 1000
        assert_eq!(hub.integer().generate("ArticleId").unwrap(), 1001);
    }
}
