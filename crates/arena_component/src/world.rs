//! World state storage.
//!
//! The [`World`] holds the entity store, one [`ComponentTable`] per component
//! type, the [`ComponentIndex`], unique entity names and the resource map. It is explicitly owned
//! by the host and passed by reference to every system; there is no global
//! registry.

use std::collections::HashMap;

use tracing::debug;

use crate::component::{Component, ComponentTypeId};
use crate::entity::{Entity, EntityStore};
use crate::error::EcsError;
use crate::index::ComponentIndex;
use crate::query::QueryDescriptor;
use crate::resource::Resources;
use crate::storage::{AnyTable, ComponentTable};

/// The simulation's entity and component state.
///
/// Table and index are only ever changed together, so a component value
/// exists for an entity exactly when the index says the entity holds that
/// type.
#[derive(Default)]
pub struct World {
    entities: EntityStore,
    tables: HashMap<ComponentTypeId, Box<dyn AnyTable>>,
    index: ComponentIndex,
    names: HashMap<String, Entity>,
    names_by_entity: HashMap<Entity, String>,
    resources: Resources,
}

impl World {
    /// Create a new empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Entity lifecycle --

    /// Allocate a new entity without any components.
    pub fn create(&mut self) -> Entity {
        self.entities.create()
    }

    /// Mark an entity for destruction at the end of the tick.
    ///
    /// The entity stays alive, and visible to queries, until
    /// [`World::flush_destroyed`] runs.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnknownEntity`] if the entity is not alive.
    pub fn destroy(&mut self, entity: Entity) -> Result<(), EcsError> {
        self.entities.destroy(entity)
    }

    /// Returns `true` if the entity is alive.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Returns `true` if the entity was marked for destruction this tick.
    ///
    /// Queries do not filter these out; systems that must not touch
    /// soon-to-die entities check this themselves.
    #[must_use]
    pub fn is_pending_destroy(&self, entity: Entity) -> bool {
        self.entities.is_pending_destroy(entity)
    }

    /// Remove every entity queued by [`World::destroy`], dropping all of its
    /// components and invalidating its handle.
    ///
    /// Safe to call repeatedly; an empty queue is a no-op. Returns the number
    /// of entities removed.
    pub fn flush_destroyed(&mut self) -> usize {
        let pending = self.entities.take_pending();
        let mut removed = 0;
        for entity in pending {
            for type_id in self.index.remove_entity(entity) {
                if let Some(table) = self.tables.get_mut(&type_id) {
                    table.remove_entity(entity);
                }
            }
            if let Some(name) = self.names_by_entity.remove(&entity) {
                self.names.remove(&name);
            }
            if self.entities.release(entity) {
                removed += 1;
            }
        }
        if removed > 0 {
            debug!(removed, alive = self.entities.len(), "flushed destroyed entities");
        }
        removed
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns the entity store.
    #[must_use]
    pub fn entities(&self) -> &EntityStore {
        &self.entities
    }

    // -- Names --

    /// Give `entity` a unique name, such as `"player"`.
    ///
    /// Any previous name of `entity` is dropped. If another entity held
    /// `name`, it loses it and is returned. Names are released when their
    /// entity is flushed.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotAlive`] if the entity is not alive.
    pub fn set_name(
        &mut self,
        entity: Entity,
        name: impl Into<String>,
    ) -> Result<Option<Entity>, EcsError> {
        if !self.entities.is_alive(entity) {
            return Err(EcsError::EntityNotAlive(entity));
        }
        let name = name.into();
        self.clear_name(entity);
        let previous = self.names.insert(name.clone(), entity);
        if let Some(previous) = previous {
            self.names_by_entity.remove(&previous);
        }
        self.names_by_entity.insert(entity, name);
        Ok(previous)
    }

    /// Remove the name of `entity`, returning it.
    pub fn clear_name(&mut self, entity: Entity) -> Option<String> {
        let name = self.names_by_entity.remove(&entity)?;
        self.names.remove(&name);
        Some(name)
    }

    /// The entity registered under `name`.
    #[must_use]
    pub fn named(&self, name: &str) -> Option<Entity> {
        self.names.get(name).copied()
    }

    /// The name of `entity`, if it has one.
    #[must_use]
    pub fn name_of(&self, entity: Entity) -> Option<&str> {
        self.names_by_entity.get(&entity).map(String::as_str)
    }

    // -- Component operations --

    /// Attach component `value` to `entity`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotAlive`] if the entity is not alive, and
    /// [`EcsError::DuplicateComponent`] if a `T` is already attached; remove
    /// it first to replace it.
    pub fn add<T: Component>(&mut self, entity: Entity, value: T) -> Result<(), EcsError> {
        if !self.entities.is_alive(entity) {
            return Err(EcsError::EntityNotAlive(entity));
        }
        let table = self.table_or_insert::<T>()?;
        if table.contains(entity) {
            return Err(EcsError::DuplicateComponent {
                entity,
                component: T::type_name(),
            });
        }
        table.insert(entity, value);
        self.index.insert(entity, ComponentTypeId::of::<T>());
        Ok(())
    }

    /// Detach and return the `T` attached to `entity`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotAlive`] if the entity is not alive.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Result<Option<T>, EcsError> {
        if !self.entities.is_alive(entity) {
            return Err(EcsError::EntityNotAlive(entity));
        }
        let removed = self.table_mut::<T>().and_then(|table| table.remove(entity));
        if removed.is_some() {
            self.index.remove(entity, ComponentTypeId::of::<T>());
        }
        Ok(removed)
    }

    /// Returns the `T` attached to `entity`.
    #[must_use]
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.table::<T>()?.get(entity)
    }

    /// Returns the `T` attached to `entity` for in-place mutation.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.table_mut::<T>()?.get_mut(entity)
    }

    /// Returns `true` if a `T` is attached to `entity`.
    #[must_use]
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.index.contains(entity, ComponentTypeId::of::<T>())
    }

    /// Returns the table for component type `T`, if any value was ever added.
    #[must_use]
    pub fn table<T: Component>(&self) -> Option<&ComponentTable<T>> {
        self.tables
            .get(&ComponentTypeId::of::<T>())?
            .as_any()
            .downcast_ref()
    }

    /// Returns the table for component type `T` mutably.
    ///
    /// Only values can be edited through it; attaching and detaching goes
    /// through [`World::add`] and [`World::remove`], which keep the index in
    /// step with the table.
    ///
    /// ```compile_fail
    /// use arena_component::{Component, World};
    ///
    /// struct Hp(i32);
    /// impl Component for Hp {}
    ///
    /// let mut world = World::new();
    /// let e = world.create();
    /// world.add(e, Hp(1)).unwrap();
    /// world.table_mut::<Hp>().unwrap().remove(e);
    /// ```
    pub fn table_mut<T: Component>(&mut self) -> Option<&mut ComponentTable<T>> {
        self.tables
            .get_mut(&ComponentTypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut()
    }

    fn table_or_insert<T: Component>(&mut self) -> Result<&mut ComponentTable<T>, EcsError> {
        let id = ComponentTypeId::of::<T>();
        self.tables
            .entry(id)
            .or_insert_with(|| Box::new(ComponentTable::<T>::new()) as Box<dyn AnyTable>)
            .as_any_mut()
            .downcast_mut()
            .ok_or(EcsError::TableTypeMismatch {
                component: T::type_name(),
            })
    }

    /// Returns the component index.
    #[must_use]
    pub fn index(&self) -> &ComponentIndex {
        &self.index
    }

    // -- Queries --

    /// Returns the live entities holding **all** of `types`.
    ///
    /// An empty slice matches every live entity. The order is fixed for a
    /// given world state.
    #[must_use]
    pub fn entities_with(&self, types: &[ComponentTypeId]) -> Vec<Entity> {
        if types.is_empty() {
            return self.entities.iter().collect();
        }
        self.index.intersect(types)
    }

    /// Resolves a [`QueryDescriptor`].
    #[must_use]
    pub fn query(&self, query: &QueryDescriptor) -> Vec<Entity> {
        if query.required_types().is_empty() {
            let excluded = query.excluded_types();
            return self
                .entities
                .iter()
                .filter(|e| !excluded.iter().any(|ty| self.index.contains(*e, *ty)))
                .collect();
        }
        self.index.query(query)
    }

    // -- Resources --

    /// Insert a resource, returning the previous value of the same type.
    pub fn insert_resource<R: Send + Sync + 'static>(&mut self, value: R) -> Option<R> {
        self.resources.insert(value)
    }

    /// Remove and return a resource.
    pub fn remove_resource<R: Send + Sync + 'static>(&mut self) -> Option<R> {
        self.resources.remove()
    }

    /// Returns a resource.
    #[must_use]
    pub fn resource<R: Send + Sync + 'static>(&self) -> Option<&R> {
        self.resources.get()
    }

    /// Returns a resource mutably.
    pub fn resource_mut<R: Send + Sync + 'static>(&mut self) -> Option<&mut R> {
        self.resources.get_mut()
    }

    /// Insert `R::default()` unless the resource is already present.
    ///
    /// Returns `true` if a value was inserted.
    pub fn init_resource<R: Default + Send + Sync + 'static>(&mut self) -> bool {
        self.resources.init::<R>()
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("entities", &self.entities.len())
            .field("component_types", &self.tables.len())
            .field("resources", &self.resources)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Position(f32, f32);
    impl Component for Position {}

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Health(i32);
    impl Component for Health {}

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Enemy;
    impl Component for Enemy {}

    #[test]
    fn test_add_then_get() {
        let mut world = World::new();
        let e = world.create();
        world.add(e, Position(1.0, 2.0)).unwrap();
        assert_eq!(world.get::<Position>(e), Some(&Position(1.0, 2.0)));
        assert!(world.has::<Position>(e));
        assert!(!world.has::<Health>(e));
    }

    #[test]
    fn test_duplicate_add_is_rejected() {
        let mut world = World::new();
        let e = world.create();
        world.add(e, Health(10)).unwrap();
        let err = world.add(e, Health(20)).unwrap_err();
        assert!(matches!(err, EcsError::DuplicateComponent { entity, .. } if entity == e));
        assert_eq!(world.get::<Health>(e), Some(&Health(10)));
    }

    #[test]
    fn test_add_to_dead_entity_fails() {
        let mut world = World::new();
        let e = world.create();
        world.destroy(e).unwrap();
        world.flush_destroyed();
        assert_eq!(world.add(e, Health(1)), Err(EcsError::EntityNotAlive(e)));
        assert_eq!(
            world.remove::<Health>(e),
            Err(EcsError::EntityNotAlive(e))
        );
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut world = World::new();
        let e = world.create();
        assert_eq!(world.remove::<Health>(e), Ok(None));
        world.add(e, Health(3)).unwrap();
        assert_eq!(world.remove::<Health>(e), Ok(Some(Health(3))));
        assert!(world.entities_with(&[ComponentTypeId::of::<Health>()]).is_empty());
    }

    #[test]
    fn test_mutation_does_not_touch_index() {
        let mut world = World::new();
        let e = world.create();
        world.add(e, Health(10)).unwrap();
        world.get_mut::<Health>(e).unwrap().0 = 0;
        assert_eq!(world.get::<Health>(e), Some(&Health(0)));
        assert_eq!(
            world.entities_with(&[ComponentTypeId::of::<Health>()]),
            vec![e]
        );
    }

    #[test]
    fn test_destroyed_entity_visible_until_flush() {
        let mut world = World::new();
        let e = world.create();
        world.add(e, Health(1)).unwrap();
        world.destroy(e).unwrap();

        assert!(world.is_alive(e));
        assert!(world.is_pending_destroy(e));
        assert_eq!(world.entities_with(&[ComponentTypeId::of::<Health>()]), vec![e]);

        assert_eq!(world.flush_destroyed(), 1);
        assert!(!world.is_alive(e));
        assert!(world.get::<Health>(e).is_none());
        assert!(world.entities_with(&[ComponentTypeId::of::<Health>()]).is_empty());
        assert_eq!(world.flush_destroyed(), 0);
    }

    #[test]
    fn test_flush_of_double_destroy() {
        let mut world = World::new();
        let e = world.create();
        world.add(e, Position(0.0, 0.0)).unwrap();
        world.destroy(e).unwrap();
        world.destroy(e).unwrap();
        assert_eq!(world.flush_destroyed(), 1);
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn test_hundred_created_forty_destroyed() {
        let mut world = World::new();
        let all: Vec<_> = (0..100)
            .map(|i| {
                let e = world.create();
                world.add(e, Health(i)).unwrap();
                e
            })
            .collect();
        for e in all.iter().take(40) {
            world.destroy(*e).unwrap();
        }
        world.flush_destroyed();

        assert_eq!(world.entity_count(), 60);
        let live = world.entities_with(&[ComponentTypeId::of::<Health>()]);
        assert_eq!(live.len(), 60);
        assert!(live.iter().all(|e| world.is_alive(*e)));
        assert_eq!(world.entities_with(&[]).len(), 60);
    }

    #[test]
    fn test_query_descriptor_without() {
        let mut world = World::new();
        let player = world.create();
        world.add(player, Position(0.0, 0.0)).unwrap();
        let enemy = world.create();
        world.add(enemy, Position(1.0, 0.0)).unwrap();
        world.add(enemy, Enemy).unwrap();

        let q = QueryDescriptor::new().with::<Position>().without::<Enemy>();
        assert_eq!(world.query(&q), vec![player]);

        let q = QueryDescriptor::new().without::<Enemy>();
        assert_eq!(world.query(&q), vec![player]);
    }

    #[test]
    fn test_stale_handle_does_not_alias_reused_slot() {
        let mut world = World::new();
        let old = world.create();
        world.add(old, Health(1)).unwrap();
        world.destroy(old).unwrap();
        world.flush_destroyed();

        let new = world.create();
        world.add(new, Health(2)).unwrap();
        assert_eq!(new.index(), old.index());
        assert!(world.get::<Health>(old).is_none());
        assert_eq!(world.get::<Health>(new), Some(&Health(2)));
    }

    #[test]
    fn test_resources_roundtrip() {
        let mut world = World::new();
        world.insert_resource(Health(5));
        world.resource_mut::<Health>().unwrap().0 += 1;
        assert_eq!(world.resource::<Health>(), Some(&Health(6)));
        assert!(world.init_resource::<Vec<u32>>());
        world.resource_mut::<Vec<u32>>().unwrap().push(1);
        assert!(!world.init_resource::<Vec<u32>>());
        assert_eq!(world.resource::<Vec<u32>>(), Some(&vec![1]));
    }

    #[test]
    fn test_table_mut_edits_keep_index_in_step() {
        let mut world = World::new();
        let a = world.create();
        let b = world.create();
        world.add(a, Health(1)).unwrap();
        world.add(b, Health(2)).unwrap();

        for (_, health) in world.table_mut::<Health>().unwrap().iter_mut() {
            health.0 *= 10;
        }
        assert_eq!(world.get::<Health>(a), Some(&Health(10)));
        assert!(world.has::<Health>(b));
        assert_eq!(world.query(&QueryDescriptor::new().with::<Health>()), vec![a, b]);
    }

    #[test]
    fn test_types_sharing_a_name_stay_separate() {
        #[derive(Debug, PartialEq)]
        struct Shield(i32);
        impl Component for Shield {
            fn type_name() -> &'static str {
                "Shared"
            }
        }
        #[derive(Debug, PartialEq)]
        struct Armor(i32);
        impl Component for Armor {
            fn type_name() -> &'static str {
                "Shared"
            }
        }

        let mut world = World::new();
        let e = world.create();
        world.add(e, Shield(1)).unwrap();
        assert!(!world.has::<Armor>(e));
        assert!(world.get::<Armor>(e).is_none());
        assert!(world.query(&QueryDescriptor::new().with::<Armor>()).is_empty());

        world.add(e, Armor(2)).unwrap();
        assert_eq!(world.get::<Shield>(e), Some(&Shield(1)));
        assert_eq!(world.get::<Armor>(e), Some(&Armor(2)));
        assert_eq!(world.remove::<Shield>(e), Ok(Some(Shield(1))));
        assert!(world.has::<Armor>(e));
        assert!(!world.has::<Shield>(e));
    }

    #[test]
    fn test_named_lookup() {
        let mut world = World::new();
        let player = world.create();
        let decoy = world.create();

        assert_eq!(world.set_name(player, "player"), Ok(None));
        assert_eq!(world.named("player"), Some(player));
        assert_eq!(world.name_of(player), Some("player"));

        // Renaming drops the old name.
        world.set_name(player, "hero").unwrap();
        assert_eq!(world.named("player"), None);

        // Taking a name from another entity.
        assert_eq!(world.set_name(decoy, "hero"), Ok(Some(player)));
        assert_eq!(world.named("hero"), Some(decoy));
        assert_eq!(world.name_of(player), None);

        assert_eq!(world.clear_name(decoy), Some("hero".to_owned()));
        assert_eq!(world.named("hero"), None);
    }

    #[test]
    fn test_name_released_on_flush() {
        let mut world = World::new();
        let boss = world.create();
        world.set_name(boss, "boss").unwrap();
        world.destroy(boss).unwrap();

        assert_eq!(world.named("boss"), Some(boss));
        world.flush_destroyed();
        assert_eq!(world.named("boss"), None);
        assert_eq!(world.name_of(boss), None);
        assert_eq!(
            world.set_name(boss, "boss"),
            Err(EcsError::EntityNotAlive(boss))
        );
    }

    /// Random add/remove/destroy sequences: a two-type query must always be
    /// the intersection of the single-type queries, and table and index must
    /// agree.
    #[test]
    fn test_randomized_query_is_intersection() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let pos = ComponentTypeId::of::<Position>();
        let hp = ComponentTypeId::of::<Health>();

        for _round in 0..20 {
            let mut world = World::new();
            let mut entities = Vec::new();
            for _ in 0..200 {
                match rng.gen_range(0..6) {
                    0 => entities.push(world.create()),
                    1 if !entities.is_empty() => {
                        let e = entities[rng.gen_range(0..entities.len())];
                        let _ = world.add(e, Position(0.0, 0.0));
                    }
                    2 if !entities.is_empty() => {
                        let e = entities[rng.gen_range(0..entities.len())];
                        let _ = world.add(e, Health(1));
                    }
                    3 if !entities.is_empty() => {
                        let e = entities[rng.gen_range(0..entities.len())];
                        let _ = world.remove::<Position>(e);
                    }
                    4 if !entities.is_empty() => {
                        let e = entities[rng.gen_range(0..entities.len())];
                        let _ = world.destroy(e);
                    }
                    5 => {
                        world.flush_destroyed();
                    }
                    _ => {}
                }

                let both = world.entities_with(&[pos, hp]);
                let only_pos = world.entities_with(&[pos]);
                let only_hp = world.entities_with(&[hp]);
                let expected: Vec<_> = only_pos
                    .iter()
                    .copied()
                    .filter(|e| only_hp.contains(e))
                    .collect();
                let mut sorted_both = both.clone();
                sorted_both.sort();
                let mut sorted_expected = expected;
                sorted_expected.sort();
                assert_eq!(sorted_both, sorted_expected);

                for e in &entities {
                    assert_eq!(world.get::<Position>(*e).is_some(), only_pos.contains(e));
                    assert_eq!(world.get::<Health>(*e).is_some(), only_hp.contains(e));
                }
            }
        }
    }
}
