//! Reverse index from component types to the entities holding them.
//!
//! The [`ComponentIndex`] is updated only by attach/detach operations, never
//! by edits to component values. Entity sets are ordered, so query results
//! come back in a fixed order for a given world state.

use std::collections::{BTreeSet, HashMap};

use crate::component::ComponentTypeId;
use crate::entity::Entity;
use crate::query::QueryDescriptor;

/// Per-type entity sets plus the inverse per-entity type sets.
#[derive(Debug, Default)]
pub struct ComponentIndex {
    by_type: HashMap<ComponentTypeId, BTreeSet<Entity>>,
    by_entity: HashMap<Entity, BTreeSet<ComponentTypeId>>,
}

impl ComponentIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `entity` holds `type_id`. Returns `false` if it already did.
    pub fn insert(&mut self, entity: Entity, type_id: ComponentTypeId) -> bool {
        let added = self.by_type.entry(type_id).or_default().insert(entity);
        self.by_entity.entry(entity).or_default().insert(type_id);
        added
    }

    /// Records that `entity` no longer holds `type_id`. Returns `false` if it
    /// did not.
    pub fn remove(&mut self, entity: Entity, type_id: ComponentTypeId) -> bool {
        let removed = self
            .by_type
            .get_mut(&type_id)
            .is_some_and(|set| set.remove(&entity));
        if let Some(types) = self.by_entity.get_mut(&entity) {
            types.remove(&type_id);
            if types.is_empty() {
                self.by_entity.remove(&entity);
            }
        }
        removed
    }

    /// Drops every record for `entity`, returning the types it held.
    pub fn remove_entity(&mut self, entity: Entity) -> Vec<ComponentTypeId> {
        let Some(types) = self.by_entity.remove(&entity) else {
            return Vec::new();
        };
        for ty in &types {
            if let Some(set) = self.by_type.get_mut(ty) {
                set.remove(&entity);
            }
        }
        types.into_iter().collect()
    }

    /// Returns `true` if `entity` holds `type_id`.
    #[must_use]
    pub fn contains(&self, entity: Entity, type_id: ComponentTypeId) -> bool {
        self.by_type
            .get(&type_id)
            .is_some_and(|set| set.contains(&entity))
    }

    /// Iterates over the component types held by `entity`.
    pub fn types_of(&self, entity: Entity) -> impl Iterator<Item = ComponentTypeId> + '_ {
        self.by_entity
            .get(&entity)
            .into_iter()
            .flat_map(|types| types.iter().copied())
    }

    /// Returns the number of entities holding `type_id`.
    #[must_use]
    pub fn count(&self, type_id: ComponentTypeId) -> usize {
        self.by_type.get(&type_id).map_or(0, BTreeSet::len)
    }

    /// Returns the entities holding **all** of `types`, in entity order.
    ///
    /// Intersects the per-type sets smallest first. An empty `types` slice
    /// matches every entity that holds at least one component.
    #[must_use]
    pub fn intersect(&self, types: &[ComponentTypeId]) -> Vec<Entity> {
        self.resolve(types, &[])
    }

    /// Resolves a [`QueryDescriptor`] against the index.
    #[must_use]
    pub fn query(&self, query: &QueryDescriptor) -> Vec<Entity> {
        self.resolve(&query.required_types(), &query.excluded_types())
    }

    fn resolve(&self, required: &[ComponentTypeId], excluded: &[ComponentTypeId]) -> Vec<Entity> {
        let keep = |e: &Entity| !excluded.iter().any(|ty| self.contains(*e, *ty));

        if required.is_empty() {
            let mut all: Vec<Entity> = self.by_entity.keys().copied().filter(keep).collect();
            all.sort_unstable();
            return all;
        }

        let mut sets = Vec::with_capacity(required.len());
        for ty in required {
            match self.by_type.get(ty) {
                Some(set) if !set.is_empty() => sets.push(set),
                _ => return Vec::new(),
            }
        }
        sets.sort_by_key(|set| set.len());

        // `required` is non-empty, so `sets` is too.
        let (smallest, rest) = (sets[0], &sets[1..]);
        smallest
            .iter()
            .copied()
            .filter(|e| rest.iter().all(|set| set.contains(e)))
            .filter(keep)
            .collect()
    }
}
