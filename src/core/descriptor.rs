//! Mapping descriptors: the resolved slot-to-type bindings for one accessor
//! configuration
//!
//! A descriptor is a pure data holder. It is constructed once per accessor
//! configuration, shared behind an `Arc`, and typically memoized in the
//! [`OptionsRegistry`](crate::options::OptionsRegistry) so every composer
//! invocation observes the same instance.

use crate::core::error::CompositionError;
use crate::core::slot::{Slot, SlotMapping, TypeHandle};
use indexmap::IndexMap;
use std::fmt;

/// An ordered collection of slot mappings plus one distinguished subject
/// type (the accessor's own closing type).
///
/// Lookup is by [`Slot`], never by generic-parameter position: an abstract
/// service shape and a concrete implementation shape can each reference a
/// different, non-contiguous subset of slots, so positional resolution would
/// mis-bind whenever arities differ.
#[derive(Debug, Clone)]
pub struct MappingDescriptor {
    subject: TypeHandle,
    slots: IndexMap<Slot, SlotMapping>,
}

impl MappingDescriptor {
    /// Start building a descriptor
    pub fn builder() -> DescriptorBuilder {
        DescriptorBuilder::new()
    }

    /// The subject type this descriptor closes for
    pub fn subject(&self) -> TypeHandle {
        self.subject
    }

    /// Look up the mapping for a slot.
    ///
    /// Absence is a defined state, not an error: not every service uses
    /// every slot. Repeated lookups for the same slot always return the
    /// same mapping.
    pub fn get(&self, slot: Slot) -> Option<&SlotMapping> {
        self.slots.get(&slot)
    }

    /// Whether the descriptor binds the given slot
    pub fn contains(&self, slot: Slot) -> bool {
        self.slots.contains_key(&slot)
    }

    /// Number of bound slots (the subject is not counted)
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slots are bound
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate over the bound mappings in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &SlotMapping> {
        self.slots.values()
    }
}

impl fmt::Display for MappingDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "descriptor for {} ({} slots)", self.subject, self.len())
    }
}

/// Builder for [`MappingDescriptor`]
///
/// # Example
///
/// ```ignore
/// let descriptor = MappingDescriptor::builder()
///     .subject::<ArticleAccessor>()
///     .bind::<Uuid>(Slot::GenId)
///     .bind::<i64>(Slot::IncremId)
///     .bind::<String>(Slot::CreatedBy)
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct DescriptorBuilder {
    subject: Option<TypeHandle>,
    slots: IndexMap<Slot, SlotMapping>,
}

impl DescriptorBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self {
            subject: None,
            slots: IndexMap::new(),
        }
    }

    /// Set the subject type (required)
    pub fn subject<T: 'static>(self) -> Self {
        self.subject_handle(TypeHandle::of::<T>())
    }

    /// Set the subject from an existing handle
    pub fn subject_handle(mut self, ty: TypeHandle) -> Self {
        self.subject = Some(ty);
        self
    }

    /// Bind a slot to the type `T`.
    ///
    /// Rebinding a slot replaces the previous mapping.
    pub fn bind<T: 'static>(self, slot: Slot) -> Self {
        self.bind_handle(slot, TypeHandle::of::<T>())
    }

    /// Bind a slot from an existing handle
    pub fn bind_handle(mut self, slot: Slot, ty: TypeHandle) -> Self {
        self.slots.insert(slot, SlotMapping::new(slot, ty));
        self
    }

    /// Finish the descriptor.
    ///
    /// Fails with [`CompositionError::InvalidConfiguration`] when no subject
    /// was set.
    pub fn build(self) -> Result<MappingDescriptor, CompositionError> {
        let subject = self
            .subject
            .ok_or_else(|| CompositionError::InvalidConfiguration {
                message: "descriptor requires a subject type".to_string(),
            })?;

        Ok(MappingDescriptor {
            subject,
            slots: self.slots,
        })
    }
}
