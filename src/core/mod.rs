//! Core module containing fundamental traits and types for the framework

pub mod clock;
pub mod descriptor;
pub mod error;
pub mod shape;
pub mod slot;

pub use clock::{Clock, ClockHandle, FixedClock, SystemClock};
pub use descriptor::{DescriptorBuilder, MappingDescriptor};
pub use error::{
    CompositionError, ConfigError, ErrorReport, IdentifierError, WeaveError, WeaveResult,
};
pub use shape::{Shape, SlotShape};
pub use slot::{Slot, SlotMapping, TypeHandle};
