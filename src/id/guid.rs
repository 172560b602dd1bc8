//! GUID identifier domain

use crate::config::GuidMode;
use crate::core::clock::Clock;
use crate::core::error::IdentifierError;
use crate::id::IdentifierGenerator;
use std::sync::Arc;
use uuid::{Timestamp, Uuid};

/// Generates GUID identifiers.
///
/// The domain is stateless: no per-key counters exist, every call draws
/// from the cryptographic random source. Collision probability is the
/// birthday bound of the 128-bit space and is treated as negligible, not
/// handled as an error case.
pub struct GuidGenerator {
    clock: Arc<dyn Clock>,
    mode: GuidMode,
}

impl GuidGenerator {
    /// Create a generator producing random (v4) GUIDs
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_mode(clock, GuidMode::Random)
    }

    /// Create a generator with an explicit mode
    pub fn with_mode(clock: Arc<dyn Clock>, mode: GuidMode) -> Self {
        Self { clock, mode }
    }

    /// The configured mode
    pub fn mode(&self) -> GuidMode {
        self.mode
    }
}

impl IdentifierGenerator<Uuid> for GuidGenerator {
    fn generate(&self, _key: &str) -> Result<Uuid, IdentifierError> {
        match self.mode {
            GuidMode::Random => Ok(Uuid::new_v4()),
            GuidMode::TimeOrdered => {
                // v7 timestamps come from the injected clock, not ambient time
                let now = self.clock.now();
                let ts = Timestamp::from_unix(
                    uuid::NoContext,
                    now.timestamp().max(0) as u64,
                    now.timestamp_subsec_nanos(),
                );
                Ok(Uuid::new_v7(ts))
            }
        }
    }
}
