//! Component Storage
//!
//! Components are plain data attached to entities. This module provides
//! `ComponentStorage<T>` - an ordered map from entity id to component
//! data - and `ComponentRegistry`, which holds one storage per component
//! type, keyed by `TypeId`.
//!
//! Stores live behind a `RefCell` each, so a system can hold the Transform
//! store mutably while reading the Input store. Borrowing the same store
//! twice at once is a bug in the calling system and panics like any other
//! `RefCell` misuse.
//!
//! A store that was never registered is simply absent: systems run against
//! worlds that haven't touched every component type yet and treat that as
//! "nothing to do".

use std::any::{Any, TypeId};
use std::cell::{Ref, RefCell, RefMut};
use std::collections::{BTreeMap, HashMap};

use super::entity::EntityId;

/// Storage for a single component type, keyed by entity id.
///
/// Entity ids are never reused, so the map only ever holds live entries;
/// removing an entity's component frees its slot. Iteration is in id order.
pub struct ComponentStorage<T> {
    data: BTreeMap<EntityId, T>,
}

impl<T> ComponentStorage<T> {
    /// Create empty storage.
    pub fn new() -> Self {
        Self {
            data: BTreeMap::new(),
        }
    }

    /// Insert a component for an entity.
    /// Replaces any existing component (upsert).
    pub fn insert(&mut self, entity: EntityId, component: T) {
        self.data.insert(entity, component);
    }

    /// Remove a component from an entity.
    /// Returns the removed component if it existed.
    pub fn remove(&mut self, entity: EntityId) -> Option<T> {
        self.data.remove(&entity)
    }

    /// Get a reference to an entity's component.
    pub fn get(&self, entity: EntityId) -> Option<&T> {
        self.data.get(&entity)
    }

    /// Get a mutable reference to an entity's component.
    pub fn get_mut(&mut self, entity: EntityId) -> Option<&mut T> {
        self.data.get_mut(&entity)
    }

    /// Check if an entity has this component.
    pub fn contains(&self, entity: EntityId) -> bool {
        self.data.contains_key(&entity)
    }

    /// Snapshot of the ids that currently have this component.
    ///
    /// Returned as an owned list so callers can mutate this or other stores
    /// while walking it.
    pub fn ids(&self) -> Vec<EntityId> {
        self.data.keys().copied().collect()
    }

    /// Iterate over all (id, component) pairs.
    /// Note: liveness/activity must be checked against the entity registry.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.data.iter().map(|(id, c)| (*id, c))
    }

    /// Iterate mutably over all (id, component) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.data.iter_mut().map(|(id, c)| (*id, c))
    }

    /// Clear all components.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get the number of entities that have this component.
    pub fn count(&self) -> usize {
        self.data.len()
    }
}

impl<T> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased view of a `ComponentStorage<T>`.
///
/// Lets the registry clear an entity from every store without knowing the
/// concrete types, and recover the typed store through a checked downcast.
pub trait Store: Any {
    /// Drop the entity's component, if any. Returns true if one was removed.
    fn remove_entity(&mut self, entity: EntityId) -> bool;
    fn len(&self) -> usize;
    fn type_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: 'static> Store for ComponentStorage<T> {
    fn remove_entity(&mut self, entity: EntityId) -> bool {
        self.remove(entity).is_some()
    }

    fn len(&self) -> usize {
        self.count()
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// One store per component type, created on first registration.
#[derive(Default)]
pub struct ComponentRegistry {
    stores: HashMap<TypeId, RefCell<Box<dyn Store>>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self {
            stores: HashMap::new(),
        }
    }

    /// Return the store for `T`, creating it on first use.
    pub fn register<T: 'static>(&mut self) -> &mut ComponentStorage<T> {
        let cell = self
            .stores
            .entry(TypeId::of::<T>())
            .or_insert_with(|| RefCell::new(Box::new(ComponentStorage::<T>::new())));

        match cell.get_mut().as_any_mut().downcast_mut::<ComponentStorage<T>>() {
            Some(store) => store,
            // Stores are only ever inserted under their own TypeId.
            None => unreachable!("component store registered under a foreign TypeId"),
        }
    }

    /// True once `register::<T>()` has been called.
    pub fn is_registered<T: 'static>(&self) -> bool {
        self.stores.contains_key(&TypeId::of::<T>())
    }

    /// Shared access to the store for `T`, or None if it was never registered.
    pub fn store<T: 'static>(&self) -> Option<Ref<'_, ComponentStorage<T>>> {
        let cell = self.stores.get(&TypeId::of::<T>())?;
        Ref::filter_map(cell.borrow(), |store| {
            store.as_any().downcast_ref::<ComponentStorage<T>>()
        })
        .ok()
    }

    /// Exclusive access to the store for `T`, or None if it was never registered.
    pub fn store_mut<T: 'static>(&self) -> Option<RefMut<'_, ComponentStorage<T>>> {
        let cell = self.stores.get(&TypeId::of::<T>())?;
        RefMut::filter_map(cell.borrow_mut(), |store| {
            store.as_any_mut().downcast_mut::<ComponentStorage<T>>()
        })
        .ok()
    }

    /// Upsert a component, registering its store if needed.
    pub fn insert<T: 'static>(&mut self, entity: EntityId, component: T) {
        self.register::<T>().insert(entity, component);
    }

    /// Copy of an entity's component, if the store exists and holds one.
    pub fn get_cloned<T: Clone + 'static>(&self, entity: EntityId) -> Option<T> {
        self.store::<T>()?.get(entity).cloned()
    }

    /// True if the store for `T` exists and holds a component for `entity`.
    pub fn has<T: 'static>(&self, entity: EntityId) -> bool {
        self.store::<T>().map(|s| s.contains(entity)).unwrap_or(false)
    }

    /// Remove `entity` from every registered store.
    /// Returns how many components were dropped.
    pub fn remove_entity(&mut self, entity: EntityId) -> usize {
        self.stores
            .values_mut()
            .map(|cell| cell.get_mut().remove_entity(entity))
            .filter(|removed| *removed)
            .count()
    }

    /// Number of registered stores.
    pub fn store_count(&self) -> usize {
        self.stores.len()
    }

    /// Type names of registered stores with their sizes (for debug overlays).
    pub fn summary(&self) -> Vec<(&'static str, usize)> {
        let mut summary: Vec<_> = self
            .stores
            .values()
            .map(|cell| {
                let store = cell.borrow();
                (store.type_name(), store.len())
            })
            .collect();
        summary.sort();
        summary
    }
}
