//! Composition of open service shapes into closed, registered bindings

pub mod builder;
pub mod composer;
pub mod registry;

pub use builder::ComposerBuilder;
pub use composer::{ClosedPair, ClosedShape, ComposeOptions, GenericComposer, PopulateFn};
pub use registry::CompositionRegistry;
