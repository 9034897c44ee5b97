//! Explicit registry of element type metadata.
//!
//! Components that need to look up the layout or class of an element type by its
//! `TypeId` (for example, loaders that validate a byte image before rebuilding an
//! array) receive an `ElementRegistry` handle from their owner. There is no
//! process-wide instance, so initialization order is whatever the owner decides.

use std::any::TypeId;

use crate::class::ElementInfo;

#[derive(Debug, Clone, Default)]
pub struct ElementRegistry {
    entries: ahash::HashMap<TypeId, ElementInfo>,
}

impl ElementRegistry {
    pub fn new() -> ElementRegistry {
        ElementRegistry::default()
    }

    /// Registers `T` and returns its metadata. Registering the same type again
    /// returns the existing entry.
    pub fn register<T: 'static>(&mut self) -> ElementInfo {
        *self
            .entries
            .entry(TypeId::of::<T>())
            .or_insert_with(ElementInfo::of::<T>)
    }

    pub fn get<T: 'static>(&self) -> Option<&ElementInfo> {
        self.get_by_id(TypeId::of::<T>())
    }

    pub fn get_by_id(&self, type_id: TypeId) -> Option<&ElementInfo> {
        self.entries.get(&type_id)
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ElementInfo> {
        self.entries.values()
    }
}
