//! Game World
//!
//! The World is the central container for all game state:
//! - Entity records (ids, active flags, tags)
//! - Component stores, one per component type, keyed by `TypeId`
//! - The event bus
//! - The ordered list of systems run each frame
//!
//! Systems run strictly in the order they were added. A system sees every
//! write made by earlier systems in the same frame and nothing from later
//! ones.

use super::component::ComponentRegistry;
use super::entity::{Entity, EntityId, EntityRegistry};
use super::event::EventBus;

/// A unit of per-frame game logic.
///
/// Systems get the whole world mutably; they fetch the stores they need
/// through `world.components` and skip quietly when a store is absent.
pub trait System {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    fn update(&mut self, world: &mut World, dt: f32);
}

/// The game world containing all entities, their components and the systems
/// that act on them.
pub struct World {
    pub entities: EntityRegistry,
    pub components: ComponentRegistry,
    pub events: EventBus,
    systems: Vec<Box<dyn System>>,
}

impl World {
    /// Create a new empty world.
    pub fn new() -> Self {
        Self {
            entities: EntityRegistry::new(),
            components: ComponentRegistry::new(),
            events: EventBus::new(),
            systems: Vec::new(),
        }
    }

    // =========================================================================
    // Systems
    // =========================================================================

    /// Append a system. Order of registration is order of execution.
    pub fn add_system(&mut self, system: Box<dyn System>) {
        log::debug!("registered system #{} '{}'", self.systems.len(), system.name());
        self.systems.push(system);
    }

    /// Names of registered systems, in run order.
    pub fn system_names(&self) -> Vec<&'static str> {
        self.systems.iter().map(|s| s.name()).collect()
    }

    /// Run every system once, in registration order.
    pub fn update(&mut self, dt: f32) {
        // Systems need `&mut World`, so take the list out while they run.
        let mut systems = std::mem::take(&mut self.systems);
        for system in systems.iter_mut() {
            system.update(self, dt);
        }
        // Anything registered during the frame runs from the next frame on.
        let added = std::mem::replace(&mut self.systems, systems);
        self.systems.extend(added);
    }

    // =========================================================================
    // Entity Management
    // =========================================================================

    /// Create a new active entity with the given tags.
    pub fn create_entity(&mut self, tags: &[&str]) -> EntityId {
        let id = self.entities.create(tags);
        log::debug!("created entity {} {:?}", id, tags);
        id
    }

    /// Remove an entity and every component attached to it.
    /// Returns false if the entity didn't exist.
    pub fn remove_entity(&mut self, id: EntityId) -> bool {
        if self.entities.remove(id).is_none() {
            return false;
        }
        let dropped = self.components.remove_entity(id);
        log::debug!("removed entity {} ({} components)", id, dropped);
        true
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// True if the entity exists and is active.
    pub fn is_active(&self, id: EntityId) -> bool {
        self.entities.is_active(id)
    }

    /// Number of entity records, active or not.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
