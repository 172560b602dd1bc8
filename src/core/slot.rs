//! Slot identifiers and type mappings
//!
//! A slot is a named generic type parameter position in the data-access
//! domain model (e.g. `GenId`, `CreatedBy`). Slots are a closed enum so that
//! a mistyped slot is a compile error, not a runtime resolution failure.

use serde::{Deserialize, Serialize};
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// The closed set of generic slots a service or implementation shape can
/// declare.
///
/// The order of [`Slot::ALL`] is the canonical descriptor order: identifier
/// slots first, then audit and model slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// Generated entity identifier (typically a GUID)
    GenId,
    /// Incremental entity identifier (typically a 64-bit integer)
    IncremId,
    /// The principal that created an entity
    CreatedBy,
    /// The timestamp type used for creation times
    CreatedTime,
    /// Audit model type
    Audit,
    /// Audit property model type
    AuditProperty,
    /// Entity metadata model type
    Entity,
    /// Migration model type
    Migration,
    /// Tenant model type
    Tenant,
}

impl Slot {
    /// All slots in canonical descriptor order
    pub const ALL: [Slot; 9] = [
        Slot::GenId,
        Slot::IncremId,
        Slot::CreatedBy,
        Slot::CreatedTime,
        Slot::Audit,
        Slot::AuditProperty,
        Slot::Entity,
        Slot::Migration,
        Slot::Tenant,
    ];

    /// The canonical name of the slot
    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::GenId => "GenId",
            Slot::IncremId => "IncremId",
            Slot::CreatedBy => "CreatedBy",
            Slot::CreatedTime => "CreatedTime",
            Slot::Audit => "Audit",
            Slot::AuditProperty => "AuditProperty",
            Slot::Entity => "Entity",
            Slot::Migration => "Migration",
            Slot::Tenant => "Tenant",
        }
    }

    /// Whether this slot is a descriptor-level default: a model slot that
    /// binds from the descriptor without the caller naming it, whenever a
    /// shape declares it.
    pub fn is_model_default(&self) -> bool {
        matches!(
            self,
            Slot::Audit | Slot::AuditProperty | Slot::Entity | Slot::Migration | Slot::Tenant
        )
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A handle to a concrete Rust type: its `TypeId` plus a diagnostic name.
///
/// Equality and hashing use only the `TypeId`; the name exists for error
/// messages and registry snapshots.
#[derive(Debug, Clone, Copy)]
pub struct TypeHandle {
    id: TypeId,
    name: &'static str,
}

impl TypeHandle {
    /// Create a handle for the type `T`
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The underlying `TypeId`
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The diagnostic type name (e.g. `uuid::Uuid`)
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Check whether this handle refers to the type `T`
    pub fn is<T: 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeHandle {}

impl Hash for TypeHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// An immutable association between a slot and a concrete type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotMapping {
    slot: Slot,
    ty: TypeHandle,
}

impl SlotMapping {
    /// Create a mapping from an existing handle
    pub fn new(slot: Slot, ty: TypeHandle) -> Self {
        Self { slot, ty }
    }

    /// Create a mapping binding `slot` to the type `T`
    pub fn of<T: 'static>(slot: Slot) -> Self {
        Self::new(slot, TypeHandle::of::<T>())
    }

    /// The slot this mapping binds
    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// The bound type
    pub fn ty(&self) -> TypeHandle {
        self.ty
    }
}

impl fmt::Display for SlotMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.slot, self.ty)
    }
}
