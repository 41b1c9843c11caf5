//! Entity Registry
//!
//! Entities are plain numeric ids plus a little bookkeeping: an active flag
//! and a list of string tags ("player", "enemy", "tile", ...). Tags are for
//! coarse queries only; all real state lives in component stores.
//!
//! Ids start at 1 and only ever grow. A removed id is never handed out again
//! within a session, so a stale id can't accidentally match a newer entity.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier for a game entity.
///
/// Zero is never allocated and is used as "no entity" (e.g. an AI without a
/// target).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// The "no entity" id.
    pub const NONE: EntityId = EntityId(0);

    /// Check if this is the "no entity" id.
    pub fn is_none(&self) -> bool {
        self.0 == 0
    }

    /// Slot index for sparse component storage.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Entity record: id, active flag and membership tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub id: EntityId,
    pub active: bool,
    pub tags: Vec<String>,
}

impl Entity {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Add a tag unless it is already present.
    pub fn add_tag(&mut self, tag: &str) {
        if !self.has_tag(tag) {
            self.tags.push(tag.to_string());
        }
    }

    /// Remove a tag. Returns true if it was present.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        match self.tags.iter().position(|t| t == tag) {
            Some(idx) => {
                self.tags.remove(idx);
                true
            }
            None => false,
        }
    }
}

/// Allocates entity ids and tracks entity records.
///
/// Records are kept in id order, so `all()` and `with_tag()` are stable
/// between mutations.
pub struct EntityRegistry {
    next_id: u32,
    entities: BTreeMap<EntityId, Entity>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            entities: BTreeMap::new(),
        }
    }

    /// Create a new active entity with the given tags.
    pub fn create(&mut self, tags: &[&str]) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;

        let mut entity = Entity {
            id,
            active: true,
            tags: Vec::with_capacity(tags.len()),
        };
        for tag in tags {
            entity.add_tag(tag);
        }
        self.entities.insert(id, entity);
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Drop the entity record. Only `World::remove_entity` calls this, so
    /// an entity never disappears while its components stay behind.
    pub(super) fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    /// True if the entity exists and is active.
    pub fn is_active(&self, id: EntityId) -> bool {
        self.entities.get(&id).map(|e| e.active).unwrap_or(false)
    }

    /// Mark an entity active or inactive. Returns false if it doesn't exist.
    pub fn set_active(&mut self, id: EntityId, active: bool) -> bool {
        match self.entities.get_mut(&id) {
            Some(entity) => {
                entity.active = active;
                true
            }
            None => false,
        }
    }

    /// All active entities.
    pub fn all(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values().filter(|e| e.active)
    }

    /// Active entities carrying `tag`.
    pub fn with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Entity> + 'a {
        self.entities.values().filter(move |e| e.active && e.has_tag(tag))
    }

    /// Ids of every entity record, active or not, in id order.
    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }

    /// Number of entity records, active or not.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}
