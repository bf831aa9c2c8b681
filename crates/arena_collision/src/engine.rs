//! The collision pass, run as a [`System`].
//!
//! Per pass:
//!
//! 1. Snapshot every entity holding a [`Transform2D`] and a [`Collider`],
//!    in entity order.
//! 2. Rebuild the [`SpatialGrid`] from their bounds.
//! 3. For each body `e` and each grid neighbour `n` with `e < n`: gate on
//!    layers, run the narrow phase, and record an event on overlap.
//! 4. For solid pairs, accumulate positional corrections split by inverse
//!    mass, then apply every body's total once at the end.
//!
//! Events replace the previous contents of the [`CollisionEvents`]
//! resource and are discarded again at the end of the tick, before
//! destroyed entities are flushed. Counters go to the [`CollisionStats`]
//! resource and stay until the next pass.

use arena_component::{EcsError, Entity, QueryDescriptor, World};
use arena_math::{Mass, Transform2D, Vec2, Velocity};
use arena_system::{System, priority};
use tracing::{debug, trace};

use crate::collider::Collider;
use crate::config::CollisionConfig;
use crate::event::{CollisionEvent, CollisionEvents, CollisionStats};
use crate::grid::SpatialGrid;
use crate::narrow::{WorldShape, intersect};

/// A collidable entity as seen at the start of the pass.
#[derive(Debug, Clone, Copy)]
struct Body {
    entity: Entity,
    shape: WorldShape,
    collider: Collider,
    inverse_mass: f32,
}

/// Positional fix-up gathered for one body during the pass.
#[derive(Debug, Default)]
struct Correction {
    offset: Vec2,
    /// Directions the body was pushed out of static colliders.
    blocked: Vec<Vec2>,
}

/// Broad phase, narrow phase, events, and overlap resolution.
#[derive(Debug)]
pub struct CollisionEngine {
    config: CollisionConfig,
    grid: SpatialGrid,
    query: QueryDescriptor,
}

impl CollisionEngine {
    #[must_use]
    pub fn new(config: CollisionConfig) -> Self {
        let grid = SpatialGrid::new(config.cell_size);
        Self {
            config,
            grid,
            query: QueryDescriptor::new()
                .with::<Transform2D>()
                .with::<Collider>(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// The grid as of the last pass.
    #[must_use]
    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    /// Run one collision pass over `world`.
    pub fn run_pass(&mut self, world: &mut World) -> CollisionStats {
        let bodies = self.snapshot(world);
        self.grid
            .rebuild(bodies.iter().map(|b| (b.entity, b.shape.bounds())));

        let mut stats = CollisionStats {
            collidables: bodies.len(),
            ..CollisionStats::default()
        };
        let mut events = Vec::new();
        let mut corrections: Vec<Correction> = Vec::new();
        corrections.resize_with(bodies.len(), Correction::default);

        for (i, a) in bodies.iter().enumerate() {
            for other in self.grid.neighbors(a.entity) {
                if other <= a.entity {
                    continue;
                }
                stats.candidate_pairs += 1;

                // Bodies are sorted by entity, and every grid entry is a body.
                let Ok(j) = bodies.binary_search_by_key(&other, |b| b.entity) else {
                    continue;
                };
                let b = &bodies[j];

                if !self.config.gating.allows(
                    a.collider.layer,
                    a.collider.mask,
                    b.collider.layer,
                    b.collider.mask,
                ) {
                    continue;
                }
                stats.narrow_tests += 1;

                let Some(contact) = intersect(&a.shape, &b.shape) else {
                    continue;
                };
                stats.contacts += 1;

                let trigger = a.collider.trigger || b.collider.trigger;
                trace!(a = %a.entity, b = %b.entity, depth = contact.depth, trigger, "contact");
                events.push(CollisionEvent {
                    a: a.entity,
                    b: b.entity,
                    normal: contact.normal,
                    depth: contact.depth,
                    contact: contact.point,
                    trigger,
                });

                if trigger || !self.config.resolve_overlaps {
                    continue;
                }
                let total = a.inverse_mass + b.inverse_mass;
                if total <= 0.0 {
                    continue;
                }
                let push = contact.normal * contact.depth;
                corrections[i].offset -= push * (a.inverse_mass / total);
                corrections[j].offset += push * (b.inverse_mass / total);

                if b.collider.is_static && a.inverse_mass > 0.0 {
                    corrections[i].blocked.push(-contact.normal);
                }
                if a.collider.is_static && b.inverse_mass > 0.0 {
                    corrections[j].blocked.push(contact.normal);
                }
            }
        }

        self.apply(world, &bodies, &corrections);

        let mut published = CollisionEvents::default();
        for event in events {
            published.push(event);
        }
        world.insert_resource(published);
        world.insert_resource(stats);

        debug!(
            collidables = stats.collidables,
            candidate_pairs = stats.candidate_pairs,
            narrow_tests = stats.narrow_tests,
            contacts = stats.contacts,
            "collision pass"
        );
        stats
    }

    fn snapshot(&self, world: &World) -> Vec<Body> {
        let mut bodies: Vec<Body> = world
            .query(&self.query)
            .into_iter()
            .filter_map(|entity| {
                let transform = world.get::<Transform2D>(entity)?;
                let collider = *world.get::<Collider>(entity)?;
                let inverse_mass = if collider.is_static {
                    0.0
                } else {
                    world.get::<Mass>(entity).map_or(1.0, |m| m.inverse())
                };
                Some(Body {
                    entity,
                    shape: collider.world_shape(transform.position),
                    collider,
                    inverse_mass,
                })
            })
            .collect();
        bodies.sort_unstable_by_key(|b| b.entity);
        bodies
    }

    fn apply(&self, world: &mut World, bodies: &[Body], corrections: &[Correction]) {
        for (body, correction) in bodies.iter().zip(corrections) {
            if correction.offset != Vec2::ZERO
                && let Some(transform) = world.get_mut::<Transform2D>(body.entity)
            {
                transform.position += correction.offset;
            }

            if !self.config.cancel_velocity_into_static || correction.blocked.is_empty() {
                continue;
            }
            if let Some(velocity) = world.get_mut::<Velocity>(body.entity) {
                for &out in &correction.blocked {
                    let along = velocity.linear.dot(out);
                    if along < 0.0 {
                        velocity.linear -= out * along;
                    }
                }
            }
        }
    }
}

impl Default for CollisionEngine {
    fn default() -> Self {
        Self::new(CollisionConfig::default())
    }
}

impl System for CollisionEngine {
    fn name(&self) -> &str {
        "collision"
    }

    fn priority(&self) -> i32 {
        priority::COLLISION
    }

    fn update(&mut self, world: &mut World, _dt: f32) -> Result<(), EcsError> {
        self.run_pass(world);
        Ok(())
    }

    fn end_tick(&mut self, world: &mut World) {
        if let Some(events) = world.resource_mut::<CollisionEvents>() {
            events.clear();
        }
    }
}
