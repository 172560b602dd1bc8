//! Registry for closed service bindings
//!
//! The registry collects [`ClosedPair`]s keyed by service shape name. A
//! service either has a single binding (replace or reject on duplicates,
//! per configuration) or an enumerable set of bindings that resolve as a
//! collection.

use crate::compose::composer::ClosedPair;
use crate::config::DuplicatePolicy;
use crate::core::error::CompositionError;
use std::collections::HashMap;

/// Registry for all composed service bindings
#[derive(Debug, Default)]
pub struct CompositionRegistry {
    bindings: HashMap<String, Vec<ClosedPair>>,
    duplicate_policy: DuplicatePolicy,
}

impl CompositionRegistry {
    /// Create a new empty registry with the default duplicate policy
    pub fn new() -> Self {
        Self::with_policy(DuplicatePolicy::default())
    }

    /// Create a registry with an explicit duplicate policy
    pub fn with_policy(duplicate_policy: DuplicatePolicy) -> Self {
        Self {
            bindings: HashMap::new(),
            duplicate_policy,
        }
    }

    /// Register a single (non-enumerable) binding.
    ///
    /// An existing binding for the same service shape is replaced or
    /// rejected according to the registry's [`DuplicatePolicy`].
    pub fn insert(&mut self, pair: ClosedPair) -> Result<(), CompositionError> {
        let service = pair.service().name().to_string();

        if self.bindings.contains_key(&service)
            && self.duplicate_policy == DuplicatePolicy::Reject
        {
            return Err(CompositionError::DuplicateBinding { service });
        }

        self.bindings.insert(service, vec![pair]);
        Ok(())
    }

    /// Register one of many bindings for a service shape.
    ///
    /// All enumerable bindings remain resolvable via [`resolve_all`].
    ///
    /// [`resolve_all`]: CompositionRegistry::resolve_all
    pub fn insert_enumerable(&mut self, pair: ClosedPair) {
        let service = pair.service().name().to_string();
        self.bindings.entry(service).or_default().push(pair);
    }

    /// Resolve the binding for a service shape (the first, when enumerable)
    pub fn resolve(&self, service: &str) -> Option<&ClosedPair> {
        self.bindings.get(service).and_then(|pairs| pairs.first())
    }

    /// Resolve every binding for a service shape
    pub fn resolve_all(&self, service: &str) -> &[ClosedPair] {
        self.bindings
            .get(service)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All registered service shape names
    pub fn service_names(&self) -> Vec<&str> {
        self.bindings.keys().map(String::as_str).collect()
    }

    /// Total number of bindings across all services
    pub fn len(&self) -> usize {
        self.bindings.values().map(Vec::len).sum()
    }

    /// Whether the registry holds no bindings
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Render the current bindings as JSON for introspection
    pub fn snapshot(&self) -> serde_json::Value {
        let services: serde_json::Map<String, serde_json::Value> = self
            .bindings
            .iter()
            .map(|(service, pairs)| {
                let entries: Vec<serde_json::Value> = pairs
                    .iter()
                    .map(|pair| {
                        serde_json::json!({
                            "service": pair.service().to_string(),
                            "implementation": pair.implementation().to_string(),
                        })
                    })
                    .collect();
                (service.clone(), serde_json::Value::Array(entries))
            })
            .collect();
        serde_json::Value::Object(services)
    }
}
