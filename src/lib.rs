//! # Weave Framework
//!
//! The composition core of a generic data-access framework: closing open
//! generic service shapes against slot-to-type descriptors, and generating
//! collision-free ordered identifiers per logical key.
//!
//! ## Features
//!
//! - **Slot-Typed Composition**: Service and implementation shapes declare
//!   named slots (`GenId`, `CreatedBy`, ...) as a closed enum; the composer
//!   resolves them against one descriptor and produces type-consistent
//!   closed pairings
//! - **Subset Arities**: A 2-slot service closes against a 9-slot
//!   implementation without positional-index bugs, because resolution is by
//!   slot, never by parameter position
//! - **Enumerable Bindings**: Multiple implementations can close against one
//!   service shape and resolve as a collection
//! - **Identifier Domains**: GUID, 64-bit integer, and string generators
//!   with per-key isolation, strict monotonicity, and overflow detection
//! - **Options Memoization**: One live instance per options kind, shared
//!   across all composer invocations, torn down explicitly
//! - **Fail Fast**: Every slot, arity, and configuration error surfaces at
//!   registration time, before any service resolves
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use weave::prelude::*;
//!
//! let descriptor = MappingDescriptor::builder()
//!     .subject::<ArticleAccessor>()
//!     .bind::<Uuid>(Slot::GenId)
//!     .bind::<i64>(Slot::IncremId)
//!     .bind::<String>(Slot::CreatedBy)
//!     .bind::<DateTime<Utc>>(Slot::CreatedTime)
//!     .build()?;
//!
//! let registry = ComposerBuilder::new()
//!     .with_descriptor(descriptor)
//!     .register(ReadService::shape(), FullStore::shape())
//!     .build()?;
//!
//! let hub = IdentifierHub::new(&config.identifier, Arc::new(SystemClock));
//! let article_id = hub.integer().generate("ArticleId")?;
//! ```

pub mod compose;
pub mod config;
pub mod core;
pub mod id;
pub mod options;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Types ===
    pub use crate::core::{
        clock::{Clock, ClockHandle, FixedClock, SystemClock},
        descriptor::{DescriptorBuilder, MappingDescriptor},
        error::{CompositionError, ConfigError, IdentifierError, WeaveError, WeaveResult},
        shape::{Shape, SlotShape},
        slot::{Slot, SlotMapping, TypeHandle},
    };

    // === Composition ===
    pub use crate::compose::{
        builder::ComposerBuilder,
        composer::{ClosedPair, ClosedShape, ComposeOptions, GenericComposer},
        registry::CompositionRegistry,
    };

    // === Identifiers ===
    pub use crate::id::{
        GuidGenerator, IdentifierGenerator, IdentifierHub, IntegerGenerator, SeedMode,
        StringGenerator,
    };

    // === Options ===
    pub use crate::options::OptionsRegistry;

    // === Config ===
    pub use crate::config::{
        DuplicatePolicy, GuidMode, IdentifierConfig, RegistryConfig, WeaveConfig,
    };

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use tokio_util::sync::CancellationToken;
    pub use uuid::Uuid;
}
