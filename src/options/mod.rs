//! Keyed options memoization
//!
//! The [`OptionsRegistry`] maps an options kind (a Rust type) to exactly one
//! live instance. It is the mechanism that keeps one canonical
//! [`MappingDescriptor`](crate::core::MappingDescriptor) (and other
//! configuration objects) shared across all composer invocations without
//! explicit wiring at every call site.
//!
//! The registry is an explicitly constructed value, not process-wide state:
//! clone the handle to share it, call [`OptionsRegistry::clear`] to tear it
//! down.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

type Entry = Arc<dyn Any + Send + Sync>;

/// A process-shared cache holding one live instance per options kind.
///
/// All operations synchronize internally; callers never see a locking
/// primitive. Cloning the registry clones the handle, not the entries.
///
/// # Example
///
/// ```ignore
/// let options = OptionsRegistry::new();
/// let descriptor = options.get_or_add(|| build_descriptor());
/// assert!(options.try_get::<MappingDescriptor>().is_some());
/// ```
#[derive(Clone, Default)]
pub struct OptionsRegistry {
    entries: Arc<RwLock<HashMap<TypeId, Entry>>>,
}

impl OptionsRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert or replace the instance for kind `T`, returning the stored
    /// instance
    pub fn add_or_update<T: Send + Sync + 'static>(&self, instance: T) -> Arc<T> {
        let stored = Arc::new(instance);
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(TypeId::of::<T>(), stored.clone());
        }
        stored
    }

    /// Get the instance for kind `T`, creating it with `factory` when
    /// absent.
    ///
    /// Race-free per kind: two concurrent calls for a previously-absent
    /// kind observe exactly one surviving instance. The factory may run
    /// more than once under contention, but only one result is kept.
    pub fn get_or_add<T: Send + Sync + 'static>(&self, factory: impl FnOnce() -> T) -> Arc<T> {
        if let Some(existing) = self.try_get::<T>() {
            return existing;
        }

        // Run the factory outside the lock, then let the first writer win.
        let fresh = Arc::new(factory());
        let candidate: Entry = fresh.clone();
        match self.entries.write() {
            Ok(mut entries) => {
                let entry = entries.entry(TypeId::of::<T>()).or_insert(candidate);
                Arc::clone(entry).downcast::<T>().unwrap_or(fresh)
            }
            Err(_) => fresh,
        }
    }

    /// Get the instance for kind `T`, if present
    pub fn try_get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(&TypeId::of::<T>())?;
        Arc::clone(entry).downcast::<T>().ok()
    }

    /// Remove and return the instance for kind `T`, if present
    pub fn try_remove<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        let mut entries = self.entries.write().ok()?;
        let entry = entries.remove(&TypeId::of::<T>())?;
        entry.downcast::<T>().ok()
    }

    /// Drop every entry
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }

    /// Number of live kinds
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether the registry holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
