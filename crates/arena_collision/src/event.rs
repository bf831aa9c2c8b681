//! Collision events and per-pass statistics, published as world resources.

use arena_component::{Entity, Events};
use arena_math::Vec2;

/// One colliding unordered pair in one pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// The lower of the two entities.
    pub a: Entity,
    /// The higher of the two entities.
    pub b: Entity,
    /// Unit vector from `a` towards `b`.
    pub normal: Vec2,
    /// Overlap depth along `normal`.
    pub depth: f32,
    /// Contact point, if one is well defined.
    pub contact: Option<Vec2>,
    /// At least one side is a trigger, so no separation was applied.
    pub trigger: bool,
}

impl CollisionEvent {
    /// Returns `true` if `entity` is either side of the pair.
    #[must_use]
    pub fn involves(&self, entity: Entity) -> bool {
        self.a == entity || self.b == entity
    }

    /// The other side of the pair, or `None` if `entity` is not in it.
    #[must_use]
    pub fn other(&self, entity: Entity) -> Option<Entity> {
        if self.a == entity {
            Some(self.b)
        } else if self.b == entity {
            Some(self.a)
        } else {
            None
        }
    }

    /// Normal as seen from `entity`, pointing towards the other side.
    #[must_use]
    pub fn normal_from(&self, entity: Entity) -> Vec2 {
        if entity == self.b {
            -self.normal
        } else {
            self.normal
        }
    }
}

/// This tick's collision events.
///
/// The engine fills it on every pass and empties it at the end of the tick,
/// before destroyed entities are flushed. Systems with a later priority in
/// the same tick see exactly the current tick's contacts; earlier systems
/// always see it empty.
#[derive(Debug, Default)]
pub struct CollisionEvents {
    events: Events<CollisionEvent>,
}

impl CollisionEvents {
    pub(crate) fn clear(&mut self) {
        self.events.clear();
    }

    pub(crate) fn push(&mut self, event: CollisionEvent) {
        self.events.send(event);
    }

    /// All events in emission order.
    pub fn iter(&self) -> std::slice::Iter<'_, CollisionEvent> {
        self.events.iter()
    }

    /// Events involving `entity`.
    pub fn involving(&self, entity: Entity) -> impl Iterator<Item = &CollisionEvent> + '_ {
        self.events.iter().filter(move |ev| ev.involves(entity))
    }

    /// The event for the pair `{a, b}`, in either order.
    #[must_use]
    pub fn between(&self, a: Entity, b: Entity) -> Option<&CollisionEvent> {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        self.events.iter().find(|ev| ev.a == lo && ev.b == hi)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[CollisionEvent] {
        self.events.as_slice()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<'a> IntoIterator for &'a CollisionEvents {
    type Item = &'a CollisionEvent;
    type IntoIter = std::slice::Iter<'a, CollisionEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Counters for the last collision pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionStats {
    /// Entities with both a transform and a collider.
    pub collidables: usize,
    /// Unordered pairs produced by the broad phase.
    pub candidate_pairs: usize,
    /// Pairs that passed layer gating and reached the narrow phase.
    pub narrow_tests: usize,
    /// Pairs found overlapping.
    pub contacts: usize,
}
