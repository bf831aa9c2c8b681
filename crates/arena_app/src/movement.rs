//! Velocity integration.

use std::f32::consts::{PI, TAU};

use arena_component::{EcsError, QueryDescriptor, World};
use arena_math::{Transform2D, Velocity};
use arena_system::{System, priority};

use crate::config::MovementConfig;

/// Moves every entity with a [`Transform2D`] and a [`Velocity`].
///
/// Per body and tick: apply friction, clamp to the speed limit, integrate
/// position and rotation, then clamp into the configured bounds.
#[derive(Debug)]
pub struct MovementSystem {
    config: MovementConfig,
    query: QueryDescriptor,
}

impl MovementSystem {
    #[must_use]
    pub fn new(config: MovementConfig) -> Self {
        Self {
            config,
            query: QueryDescriptor::new()
                .with::<Transform2D>()
                .with::<Velocity>(),
        }
    }
}

impl Default for MovementSystem {
    fn default() -> Self {
        Self::new(MovementConfig::default())
    }
}

impl System for MovementSystem {
    fn name(&self) -> &str {
        "movement"
    }

    fn priority(&self) -> i32 {
        priority::PHYSICS
    }

    fn update(&mut self, world: &mut World, dt: f32) -> Result<(), EcsError> {
        for entity in world.query(&self.query) {
            let Some(velocity) = world.get_mut::<Velocity>(entity) else {
                continue;
            };
            if self.config.friction > 0.0 {
                velocity.linear *= (1.0 - self.config.friction * dt).max(0.0);
            }
            if let Some(max_speed) = self.config.max_speed {
                velocity.clamp_speed(max_speed);
            }
            let step = *velocity;

            let Some(transform) = world.get_mut::<Transform2D>(entity) else {
                continue;
            };
            transform.position += step.linear * dt;
            if step.angular != 0.0 {
                // Keep rotation within [-PI, PI).
                let turned = transform.rotation + step.angular * dt;
                transform.rotation = (turned + PI).rem_euclid(TAU) - PI;
            }

            let Some(bounds) = self.config.bounds else {
                continue;
            };
            let clamped = transform.position.clamp(bounds.min, bounds.max);
            let hit = clamped.cmpne(transform.position);
            transform.position = clamped;

            if hit.any()
                && let Some(velocity) = world.get_mut::<Velocity>(entity)
            {
                if hit.x {
                    velocity.linear.x = 0.0;
                }
                if hit.y {
                    velocity.linear.y = 0.0;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use arena_math::{Aabb, Vec2};

    use super::*;

    fn mover(world: &mut World, position: Vec2, velocity: Velocity) -> arena_component::Entity {
        let e = world.create();
        world.add(e, Transform2D::from_position(position)).unwrap();
        world.add(e, velocity).unwrap();
        e
    }

    #[test]
    fn test_integrates_position_and_rotation() {
        let mut world = World::new();
        let e = mover(
            &mut world,
            Vec2::ZERO,
            Velocity {
                linear: Vec2::new(10.0, -4.0),
                angular: 1.0,
            },
        );

        MovementSystem::default().update(&mut world, 0.5).unwrap();
        let t = world.get::<Transform2D>(e).unwrap();
        assert_eq!(t.position, Vec2::new(5.0, -2.0));
        assert!((t.rotation - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_rotation_wraps() {
        let mut world = World::new();
        let e = mover(
            &mut world,
            Vec2::ZERO,
            Velocity {
                linear: Vec2::ZERO,
                angular: 3.0 * PI,
            },
        );
        MovementSystem::default().update(&mut world, 1.0).unwrap();
        let r = world.get::<Transform2D>(e).unwrap().rotation;
        assert!(r.abs() <= PI + 1e-4);
        assert!((r.abs() - PI).abs() < 1e-4);
    }

    #[test]
    fn test_max_speed_and_friction() {
        let mut world = World::new();
        let e = mover(&mut world, Vec2::ZERO, Velocity::linear(Vec2::new(100.0, 0.0)));

        let mut system = MovementSystem::new(MovementConfig {
            max_speed: Some(20.0),
            friction: 0.5,
            bounds: None,
        });
        system.update(&mut world, 1.0).unwrap();
        // Friction halves to 50, then the limit clamps to 20.
        assert!((world.get::<Velocity>(e).unwrap().speed() - 20.0).abs() < 1e-4);
        assert!((world.get::<Transform2D>(e).unwrap().position.x - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_bounds_clamp_and_stop_blocked_axis() {
        let mut world = World::new();
        let e = mover(
            &mut world,
            Vec2::new(95.0, 50.0),
            Velocity::linear(Vec2::new(20.0, 5.0)),
        );
        let mut system = MovementSystem::new(MovementConfig {
            bounds: Some(Aabb::new(Vec2::ZERO, Vec2::splat(100.0))),
            ..MovementConfig::default()
        });

        system.update(&mut world, 1.0).unwrap();
        assert_eq!(
            world.get::<Transform2D>(e).unwrap().position,
            Vec2::new(100.0, 55.0)
        );
        assert_eq!(world.get::<Velocity>(e).unwrap().linear, Vec2::new(0.0, 5.0));
    }

    #[test]
    fn test_entities_without_velocity_stay_put() {
        let mut world = World::new();
        let e = world.create();
        world.add(e, Transform2D::from_xy(1.0, 1.0)).unwrap();
        MovementSystem::default().update(&mut world, 1.0).unwrap();
        assert_eq!(world.get::<Transform2D>(e).unwrap().position, Vec2::ONE);
    }
}
