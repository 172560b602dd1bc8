//! Closing open shapes against a mapping descriptor
//!
//! The composer takes an abstract service shape and a concrete
//! implementation shape, resolves every slot each declares against one
//! [`MappingDescriptor`], and produces the closed, type-consistent pairing
//! used for registration. The service may declare a strict subset of the
//! implementation's slots; resolution is by slot, so differing arities and
//! orders never mis-bind.

use crate::core::descriptor::MappingDescriptor;
use crate::core::error::CompositionError;
use crate::core::shape::Shape;
use crate::core::slot::{Slot, SlotMapping};
use std::fmt;
use std::sync::Arc;

/// A caller-supplied transform that selects or reorders which resolved
/// mappings close a shape, for cases where the generic arity or order
/// differs from the descriptor's natural order.
pub type PopulateFn = Box<dyn Fn(&MappingDescriptor) -> Vec<SlotMapping> + Send + Sync>;

/// Per-registration composition options
#[derive(Default)]
pub struct ComposeOptions {
    /// Transform applied to the service shape's arguments
    pub service_populate: Option<PopulateFn>,

    /// Transform applied to the implementation shape's arguments
    pub implementation_populate: Option<PopulateFn>,

    /// Register as one of many implementations of the service shape,
    /// resolvable as a collection
    pub enumerable: bool,

    /// Close against this descriptor instead of the composer's own
    pub descriptor: Option<Arc<MappingDescriptor>>,
}

impl ComposeOptions {
    /// Default options: no transforms, single binding
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable enumerable registration
    pub fn enumerable(mut self) -> Self {
        self.enumerable = true;
        self
    }

    /// Set the service populate transform
    pub fn service_populate(
        mut self,
        populate: impl Fn(&MappingDescriptor) -> Vec<SlotMapping> + Send + Sync + 'static,
    ) -> Self {
        self.service_populate = Some(Box::new(populate));
        self
    }

    /// Set the implementation populate transform
    pub fn implementation_populate(
        mut self,
        populate: impl Fn(&MappingDescriptor) -> Vec<SlotMapping> + Send + Sync + 'static,
    ) -> Self {
        self.implementation_populate = Some(Box::new(populate));
        self
    }

    /// Close against an explicit descriptor
    pub fn descriptor(mut self, descriptor: Arc<MappingDescriptor>) -> Self {
        self.descriptor = Some(descriptor);
        self
    }
}

impl fmt::Debug for ComposeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposeOptions")
            .field("service_populate", &self.service_populate.is_some())
            .field(
                "implementation_populate",
                &self.implementation_populate.is_some(),
            )
            .field("enumerable", &self.enumerable)
            .field("descriptor", &self.descriptor.is_some())
            .finish()
    }
}

/// An open shape bound to concrete types: the shape name plus the ordered
/// type arguments it was closed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedShape {
    name: String,
    arguments: Vec<SlotMapping>,
}

impl ClosedShape {
    /// The shape name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bound type arguments, in closing order
    pub fn arguments(&self) -> &[SlotMapping] {
        &self.arguments
    }

    /// The argument bound for a slot, if the shape closed over it
    pub fn argument(&self, slot: Slot) -> Option<&SlotMapping> {
        self.arguments.iter().find(|m| m.slot() == slot)
    }
}

impl fmt::Display for ClosedShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self.arguments.iter().map(|m| m.ty().to_string()).collect();
        write!(f, "{}<{}>", self.name, args.join(", "))
    }
}

/// The closed service/implementation pairing produced by composition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedPair {
    service: ClosedShape,
    implementation: ClosedShape,
}

impl ClosedPair {
    /// The closed service shape
    pub fn service(&self) -> &ClosedShape {
        &self.service
    }

    /// The closed implementation shape
    pub fn implementation(&self) -> &ClosedShape {
        &self.implementation
    }
}

/// Closes service and implementation shapes against one descriptor.
#[derive(Clone)]
pub struct GenericComposer {
    descriptor: Arc<MappingDescriptor>,
}

impl GenericComposer {
    /// Create a composer over a shared descriptor
    pub fn new(descriptor: Arc<MappingDescriptor>) -> Self {
        Self { descriptor }
    }

    /// The composer's descriptor
    pub fn descriptor(&self) -> &Arc<MappingDescriptor> {
        &self.descriptor
    }

    /// Close a service shape and an implementation shape into a registered
    /// pairing.
    ///
    /// The implementation's slots resolve first; any miss fails the whole
    /// composition with [`CompositionError::UnresolvedSlot`] before anything
    /// is produced. The service may declare a subset of the implementation's
    /// slots; an opaque (non-generic) service skips resolution entirely.
    /// Model slots (`Entity`, `Audit`, `AuditProperty`, `Migration`,
    /// `Tenant`) bind from the descriptor whenever a shape declares them;
    /// the caller never names them at the registration site.
    pub fn compose(
        &self,
        service: &Shape,
        implementation: &Shape,
        opts: &ComposeOptions,
    ) -> Result<ClosedPair, CompositionError> {
        let descriptor = opts.descriptor.as_deref().unwrap_or(&self.descriptor);

        let implementation_closed = Self::close_shape(
            descriptor,
            implementation,
            opts.implementation_populate.as_ref(),
        )?;
        let service_closed =
            Self::close_shape(descriptor, service, opts.service_populate.as_ref())?;

        // A populate transform can select arbitrary mappings; the pairing is
        // only valid if the service's view agrees with the implementation's.
        for argument in service_closed.arguments() {
            if let Some(bound) = implementation_closed.argument(argument.slot()) {
                if bound.ty() != argument.ty() {
                    return Err(CompositionError::InvalidConfiguration {
                        message: format!(
                            "slot '{}' closes as '{}' for service '{}' but '{}' for implementation '{}'",
                            argument.slot(),
                            argument.ty(),
                            service_closed.name(),
                            bound.ty(),
                            implementation_closed.name(),
                        ),
                    });
                }
            }
        }

        tracing::debug!(
            service = %service_closed,
            implementation = %implementation_closed,
            "composed closed pair"
        );

        Ok(ClosedPair {
            service: service_closed,
            implementation: implementation_closed,
        })
    }

    fn close_shape(
        descriptor: &MappingDescriptor,
        shape: &Shape,
        populate: Option<&PopulateFn>,
    ) -> Result<ClosedShape, CompositionError> {
        if !shape.is_configurable() {
            return Err(CompositionError::UnsupportedConfiguration {
                shape: shape.name().to_string(),
            });
        }

        // Resolve every declared slot before any transform runs, so a
        // missing mapping always surfaces as UnresolvedSlot.
        let resolved: Vec<SlotMapping> = shape
            .declared()
            .iter()
            .map(|&slot| {
                descriptor
                    .get(slot)
                    .copied()
                    .ok_or(CompositionError::UnresolvedSlot {
                        slot,
                        shape: shape.name().to_string(),
                    })
            })
            .collect::<Result<_, _>>()?;

        let arguments = match populate {
            Some(populate) => {
                let produced = populate(descriptor);
                if produced.len() != shape.arity() {
                    return Err(CompositionError::ArityMismatch {
                        shape: shape.name().to_string(),
                        expected: shape.arity(),
                        actual: produced.len(),
                    });
                }
                produced
            }
            None => resolved,
        };

        Ok(ClosedShape {
            name: shape.name().to_string(),
            arguments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    struct Accessor;

    fn full_descriptor() -> Arc<MappingDescriptor> {
        Arc::new(
            MappingDescriptor::builder()
                .subject::<Accessor>()
                .bind::<Uuid>(Slot::GenId)
                .bind::<i64>(Slot::IncremId)
                .bind::<String>(Slot::CreatedBy)
                .bind::<DateTime<Utc>>(Slot::CreatedTime)
                .bind::<u8>(Slot::Audit)
                .bind::<u16>(Slot::AuditProperty)
                .bind::<u32>(Slot::Entity)
                .bind::<u64>(Slot::Migration)
                .bind::<u128>(Slot::Tenant)
                .build()
                .unwrap(),
        )
    }

    fn nine_slot_implementation() -> Shape {
        Shape::new("full_store", Slot::ALL.to_vec())
    }

    #[test]
    fn test_subset_service_composes_in_declared_order() {
        let composer = GenericComposer::new(full_descriptor());
        let service = Shape::new("read_service", vec![Slot::GenId, Slot::CreatedBy]);

        let pair = composer
            .compose(&service, &nine_slot_implementation(), &ComposeOptions::new())
            .unwrap();

        let args = pair.service().arguments();
        assert_eq!(args.len(), 2);
        assert!(args[0].ty().is::<Uuid>());
        assert!(args[1].ty().is::<String>());
        assert_eq!(pair.implementation().arguments().len(), 9);
    }

    #[test]
    fn test_opaque_service_skips_resolution() {
        let composer = GenericComposer::new(full_descriptor());
        let service = Shape::opaque("marker_service");

        let pair = composer
            .compose(&service, &nine_slot_implementation(), &ComposeOptions::new())
            .unwrap();
        assert!(pair.service().arguments().is_empty());
    }

    #[test]
    fn test_missing_slot_fails_unresolved() {
        let descriptor = Arc::new(
            MappingDescriptor::builder()
                .subject::<Accessor>()
                .bind::<Uuid>(Slot::GenId)
                .build()
                .unwrap(),
        );
        let composer = GenericComposer::new(descriptor);
        let service = Shape::new("read_service", vec![Slot::GenId]);
        let implementation = Shape::new("full_store", vec![Slot::GenId, Slot::Tenant]);

        let err = composer
            .compose(&service, &implementation, &ComposeOptions::new())
            .unwrap_err();
        assert!(matches!(
            err,
            CompositionError::UnresolvedSlot {
                slot: Slot::Tenant,
                ..
            }
        ));
    }

    #[test]
    fn test_populate_reorders_arguments() {
        let composer = GenericComposer::new(full_descriptor());
        let service = Shape::new("swapped_service", vec![Slot::CreatedBy, Slot::GenId]);

        let opts = ComposeOptions::new().service_populate(|descriptor| {
            vec![
                *descriptor.get(Slot::CreatedBy).unwrap(),
                *descriptor.get(Slot::GenId).unwrap(),
            ]
        });

        let pair = composer
            .compose(&service, &nine_slot_implementation(), &opts)
            .unwrap();
        assert!(pair.service().arguments()[0].ty().is::<String>());
        assert!(pair.service().arguments()[1].ty().is::<Uuid>());
    }

    #[test]
    fn test_populate_wrong_count_fails_arity() {
        let composer = GenericComposer::new(full_descriptor());
        let service = Shape::new("read_service", vec![Slot::GenId, Slot::CreatedBy]);

        let opts = ComposeOptions::new()
            .service_populate(|descriptor| vec![*descriptor.get(Slot::GenId).unwrap()]);

        let err = composer
            .compose(&service, &nine_slot_implementation(), &opts)
            .unwrap_err();
        assert!(matches!(
            err,
            CompositionError::ArityMismatch {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_sealed_shape_fails_unsupported() {
        let composer = GenericComposer::new(full_descriptor());
        let service = Shape::opaque("dependency_options").sealed();

        let err = composer
            .compose(&service, &nine_slot_implementation(), &ComposeOptions::new())
            .unwrap_err();
        assert!(matches!(
            err,
            CompositionError::UnsupportedConfiguration { .. }
        ));
    }

    #[test]
    fn test_descriptor_override() {
        let composer = GenericComposer::new(full_descriptor());
        let other = Arc::new(
            MappingDescriptor::builder()
                .subject::<Accessor>()
                .bind::<i32>(Slot::GenId)
                .build()
                .unwrap(),
        );

        let service = Shape::new("read_service", vec![Slot::GenId]);
        let implementation = Shape::new("store", vec![Slot::GenId]);
        let opts = ComposeOptions::new().descriptor(other);

        let pair = composer.compose(&service, &implementation, &opts).unwrap();
        assert!(pair.service().arguments()[0].ty().is::<i32>());
    }

    #[test]
    fn test_closed_shape_display() {
        let composer = GenericComposer::new(full_descriptor());
        let service = Shape::new("read_service", vec![Slot::GenId]);
        let pair = composer
            .compose(&service, &nine_slot_implementation(), &ComposeOptions::new())
            .unwrap();
        let rendered = pair.service().to_string();
        assert!(rendered.starts_with("read_service<"));
        assert!(rendered.contains("Uuid"));
    }
}
