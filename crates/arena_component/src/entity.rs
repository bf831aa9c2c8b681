//! Entity type and lifecycle management.
//!
//! An [`Entity`] is a generation-counted slot index with no inherent data.
//! The [`EntityStore`] is the single source of truth for which entities are
//! alive, and owns the deferred-destruction queue that is flushed once per
//! tick.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::error::EcsError;

/// A unique entity identifier.
///
/// Entities are pure identifiers; they carry no data of their own. Components
/// are attached to entities to give them meaning.
///
/// A slot index may be reused after its entity is destroyed, but the
/// generation changes on every reuse, so a stale handle never aliases the new
/// occupant of the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    /// The null / invalid entity sentinel.
    pub const INVALID: Entity = Entity {
        index: u32::MAX,
        generation: u32::MAX,
    };

    /// Create an entity handle from its raw parts.
    #[must_use]
    pub const fn from_parts(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Returns the slot index of this entity.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Returns the generation counter of this entity.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    /// Packs the handle into a single `u64` (generation in the high half).
    #[must_use]
    pub const fn to_bits(self) -> u64 {
        ((self.generation as u64) << 32) | self.index as u64
    }

    /// Returns `true` if this is not the [`Entity::INVALID`] sentinel.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        !(self.index == u32::MAX && self.generation == u32::MAX)
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({}v{})", self.index, self.generation)
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    generation: u32,
    alive: bool,
}

/// Allocates entity handles and tracks their lifecycle.
///
/// Destruction is deferred: [`EntityStore::destroy`] only queues the entity,
/// and it stays alive until [`EntityStore::take_pending`] hands the queue to
/// the world's flush at the end of the tick.
#[derive(Debug, Default)]
pub struct EntityStore {
    slots: Vec<Slot>,
    free: Vec<u32>,
    pending: Vec<Entity>,
    pending_set: HashSet<Entity>,
    alive_count: usize,
}

impl EntityStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh entity. O(1).
    pub fn create(&mut self) -> Entity {
        let entity = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.alive = true;
                Entity::from_parts(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    alive: true,
                });
                Entity::from_parts(index, 0)
            }
        };
        self.alive_count += 1;
        trace!(%entity, "entity created");
        entity
    }

    /// Returns `true` if `entity` refers to a live slot of the same generation.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.slots
            .get(entity.index as usize)
            .is_some_and(|slot| slot.alive && slot.generation == entity.generation)
    }

    /// Queues `entity` for destruction at the end of the tick.
    ///
    /// Queuing the same entity twice is accepted; it is flushed once.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnknownEntity`] if the entity is not alive.
    pub fn destroy(&mut self, entity: Entity) -> Result<(), EcsError> {
        if !self.is_alive(entity) {
            return Err(EcsError::UnknownEntity(entity));
        }
        if self.pending_set.insert(entity) {
            self.pending.push(entity);
            trace!(%entity, "entity marked for destruction");
        }
        Ok(())
    }

    /// Returns `true` if `entity` is queued for destruction this tick.
    #[must_use]
    pub fn is_pending_destroy(&self, entity: Entity) -> bool {
        self.pending_set.contains(&entity)
    }

    /// Returns the number of entities queued for destruction.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Drains the destruction queue in the order entities were marked.
    ///
    /// The returned entities are still alive; the caller strips their
    /// components and then calls [`EntityStore::release`] for each.
    pub fn take_pending(&mut self) -> Vec<Entity> {
        self.pending_set.clear();
        std::mem::take(&mut self.pending)
    }

    /// Invalidates `entity` and returns its slot to the free list.
    ///
    /// A slot whose generation counter is exhausted is retired instead of
    /// reused, so an old handle can never match a later occupant.
    ///
    /// Returns `false` if the entity was already released.
    pub fn release(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        let slot = &mut self.slots[entity.index as usize];
        slot.alive = false;
        match slot.generation.checked_add(1) {
            Some(next) => {
                slot.generation = next;
                self.free.push(entity.index);
            }
            None => debug!(%entity, "entity slot retired"),
        }
        self.alive_count -= 1;
        trace!(%entity, "entity released");
        true
    }

    /// Returns the number of live entities (including those pending destruction).
    #[must_use]
    pub fn len(&self) -> usize {
        self.alive_count
    }

    /// Returns `true` if no entity is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alive_count == 0
    }

    /// Iterates over all live entities in slot order.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.alive
                .then(|| Entity::from_parts(index as u32, slot.generation))
        })
    }
}
