//! Per-type component storage.
//!
//! Each component type gets its own [`ComponentTable`], a sparse set keyed by
//! entity slot index. Values are packed densely for iteration; the sparse
//! array gives O(1) lookup, and the stored [`Entity`] handles reject stale
//! generations.

use std::any::Any;

use crate::component::Component;
use crate::entity::Entity;

/// Storage for statically typed components of one type.
#[derive(Debug)]
pub struct ComponentTable<T> {
    /// Entity slot index -> position in the dense arrays.
    sparse: Vec<Option<usize>>,
    /// Owner of each dense value. `entities[i]` owns `values[i]`.
    entities: Vec<Entity>,
    values: Vec<T>,
}

impl<T> Default for ComponentTable<T> {
    fn default() -> Self {
        Self {
            sparse: Vec::new(),
            entities: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl<T: Component> ComponentTable<T> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn dense_index(&self, entity: Entity) -> Option<usize> {
        let dense = (*self.sparse.get(entity.index() as usize)?)?;
        (self.entities[dense] == entity).then_some(dense)
    }

    /// Returns `true` if `entity` has a value in this table.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.dense_index(entity).is_some()
    }

    /// Attaches `value` to `entity`, returning the previous value if any.
    ///
    /// Crate-private: the world pairs every attach with an index update.
    pub(crate) fn insert(&mut self, entity: Entity, value: T) -> Option<T> {
        if let Some(dense) = self.dense_index(entity) {
            return Some(std::mem::replace(&mut self.values[dense], value));
        }
        let slot = entity.index() as usize;
        if self.sparse.len() <= slot {
            self.sparse.resize(slot + 1, None);
        }
        self.sparse[slot] = Some(self.values.len());
        self.entities.push(entity);
        self.values.push(value);
        None
    }

    /// Detaches and returns the value owned by `entity`.
    pub(crate) fn remove(&mut self, entity: Entity) -> Option<T> {
        let dense = self.dense_index(entity)?;
        self.sparse[entity.index() as usize] = None;
        self.entities.swap_remove(dense);
        let value = self.values.swap_remove(dense);
        if let Some(&moved) = self.entities.get(dense) {
            self.sparse[moved.index() as usize] = Some(dense);
        }
        Some(value)
    }

    /// Retrieves an immutable reference to the value owned by `entity`.
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.dense_index(entity).map(|dense| &self.values[dense])
    }

    /// Retrieves a mutable reference to the value owned by `entity`.
    ///
    /// Editing a value in place never touches the component index.
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.dense_index(entity).map(|dense| &mut self.values[dense])
    }

    /// Returns the number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the table holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(entity, value)` pairs in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.entities.iter().copied().zip(self.values.iter())
    }

    /// Iterates mutably over `(entity, value)` pairs in dense order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.entities.iter().copied().zip(self.values.iter_mut())
    }
}

/// Type-erased view of a [`ComponentTable`], used by the world to strip
/// components from destroyed entities without knowing their types.
pub(crate) trait AnyTable: Send + Sync {
    fn remove_entity(&mut self, entity: Entity) -> bool;
    fn len(&self) -> usize;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> AnyTable for ComponentTable<T> {
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
