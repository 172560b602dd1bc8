//! ComposerBuilder for fluent registration of composed services
//!
//! The builder is the registration surface of the framework: it collects
//! shape pairs, memoizes the canonical descriptor through an
//! [`OptionsRegistry`], and closes everything in one pass so a failing
//! registration leaves no partial state behind.

use crate::compose::composer::{ClosedPair, ComposeOptions, GenericComposer};
use crate::compose::registry::CompositionRegistry;
use crate::config::{RegistryConfig, WeaveConfig};
use crate::core::descriptor::MappingDescriptor;
use crate::core::shape::Shape;
use crate::options::OptionsRegistry;
use anyhow::Result;

struct Registration {
    service: Shape,
    implementation: Shape,
    opts: ComposeOptions,
}

/// Builder for creating a [`CompositionRegistry`] with closed bindings
///
/// # Example
///
/// ```ignore
/// let registry = ComposerBuilder::new()
///     .with_descriptor(descriptor)
///     .register(ReadService::shape(), FullStore::shape())
///     .register_with(
///         Migrator::shape(),
///         SchemaMigrator::shape(),
///         ComposeOptions::new().enumerable(),
///     )
///     .build()?;
/// ```
pub struct ComposerBuilder {
    options: OptionsRegistry,
    registry_config: RegistryConfig,
    registrations: Vec<Registration>,
}

impl ComposerBuilder {
    /// Create a new ComposerBuilder with its own options registry
    pub fn new() -> Self {
        Self {
            options: OptionsRegistry::new(),
            registry_config: RegistryConfig::default(),
            registrations: Vec::new(),
        }
    }

    /// Share an existing options registry.
    ///
    /// A descriptor already memoized in it becomes the canonical descriptor
    /// for this builder.
    pub fn with_options(mut self, options: OptionsRegistry) -> Self {
        self.options = options;
        self
    }

    /// Apply framework configuration
    pub fn with_config(mut self, config: &WeaveConfig) -> Self {
        self.registry_config = config.registry.clone();
        self
    }

    /// Set the canonical descriptor (required unless the options registry
    /// already holds one).
    ///
    /// The descriptor is memoized through the options registry, so every
    /// composer sharing that registry observes this instance.
    pub fn with_descriptor(self, descriptor: MappingDescriptor) -> Self {
        self.options.add_or_update(descriptor);
        self
    }

    /// Queue a single-binding registration
    pub fn register(self, service: Shape, implementation: Shape) -> Self {
        self.register_with(service, implementation, ComposeOptions::new())
    }

    /// Queue a registration with explicit composition options
    pub fn register_with(
        mut self,
        service: Shape,
        implementation: Shape,
        opts: ComposeOptions,
    ) -> Self {
        self.registrations.push(Registration {
            service,
            implementation,
            opts,
        });
        self
    }

    /// The options registry backing this builder
    pub fn options(&self) -> &OptionsRegistry {
        &self.options
    }

    /// Close every queued registration and build the registry.
    ///
    /// Composition runs for all registrations before anything is inserted,
    /// so a failure performs no partial registration.
    pub fn build(self) -> Result<CompositionRegistry> {
        let descriptor = self
            .options
            .try_get::<MappingDescriptor>()
            .ok_or_else(|| {
                anyhow::anyhow!("MappingDescriptor is required. Call .with_descriptor()")
            })?;

        let composer = GenericComposer::new(descriptor);

        let mut closed: Vec<(ClosedPair, bool)> = Vec::with_capacity(self.registrations.len());
        for registration in &self.registrations {
            let pair = composer.compose(
                &registration.service,
                &registration.implementation,
                &registration.opts,
            )?;
            closed.push((pair, registration.opts.enumerable));
        }

        let mut registry =
            CompositionRegistry::with_policy(self.registry_config.duplicate_policy);
        for (pair, enumerable) in closed {
            if enumerable {
                registry.insert_enumerable(pair);
            } else {
                registry.insert(pair)?;
            }
        }

        tracing::info!(
            bindings = registry.len(),
            services = registry.service_names().len(),
            "composition registry built"
        );

        Ok(registry)
    }
}

impl Default for ComposerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
