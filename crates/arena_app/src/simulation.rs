//! The assembled simulation: world, built-in systems, and tick loop.

use arena_collision::{CollisionEngine, CollisionStats};
use arena_component::World;
use arena_system::{Scheduler, System, TickError, TickLoop, TickSummary};
use tracing::info;

use crate::config::{ConfigError, SimulationConfig};
use crate::movement::MovementSystem;

/// A world driven by a fixed-timestep tick loop with movement and
/// collision already registered.
#[derive(Debug)]
pub struct Simulation {
    tick_loop: TickLoop,
}

impl Simulation {
    /// Validate `config` and build a simulation with an empty world.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        Self::with_world(config, World::new())
    }

    /// Validate `config` and build a simulation around an existing world.
    pub fn with_world(config: SimulationConfig, world: World) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut scheduler = Scheduler::new();
        scheduler.add_system(MovementSystem::new(config.movement));
        scheduler.add_system(CollisionEngine::new(config.collision));

        info!(
            tick_rate = config.tick.tick_rate,
            systems = scheduler.len(),
            "simulation ready"
        );
        Ok(Self {
            tick_loop: TickLoop::with_parts(config.tick, world, scheduler),
        })
    }

    /// Register a gameplay system at an explicit priority.
    pub fn register_system<S: System>(&mut self, system: S, priority: i32) {
        self.tick_loop.scheduler_mut().register_system(system, priority);
    }

    /// Register a gameplay system at the priority it reports.
    pub fn add_system<S: System>(&mut self, system: S) {
        self.tick_loop.scheduler_mut().add_system(system);
    }

    #[must_use]
    pub fn world(&self) -> &World {
        self.tick_loop.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.tick_loop.world_mut()
    }

    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        self.tick_loop.scheduler()
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        self.tick_loop.scheduler_mut()
    }

    /// Number of completed ticks.
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_loop.tick_id()
    }

    /// Counters from the last collision pass.
    #[must_use]
    pub fn collision_stats(&self) -> CollisionStats {
        self.world()
            .resource::<CollisionStats>()
            .copied()
            .unwrap_or_default()
    }

    /// Run one fixed tick.
    pub fn step(&mut self) -> Result<TickSummary, TickError> {
        self.tick_loop.step()
    }

    /// Run one tick of `dt` seconds.
    pub fn tick(&mut self, dt: f64) -> Result<TickSummary, TickError> {
        self.tick_loop.tick(dt)
    }

    /// Feed real frame time; see [`TickLoop::advance`].
    pub fn advance(&mut self, frame_time: f64) -> Result<u32, TickError> {
        self.tick_loop.advance(frame_time)
    }

    pub fn pause(&mut self) {
        self.tick_loop.pause();
    }

    pub fn resume(&mut self) {
        self.tick_loop.resume();
    }

    /// Blocking real-time loop; see [`TickLoop::run`].
    pub fn run(&mut self) -> Result<(), TickError> {
        self.tick_loop.run()
    }

    /// Run every system's cleanup hook and drop them all.
    pub fn shutdown(&mut self) {
        self.tick_loop.scheduler_mut().shutdown();
    }

    /// Tear down into the world and scheduler.
    #[must_use]
    pub fn into_parts(self) -> (World, Scheduler) {
        self.tick_loop.into_parts()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use arena_collision::{Collider, CollisionEvents};
    use arena_math::{Transform2D, Vec2, Velocity};
    use arena_system::{priority, system_fn};

    use super::*;

    #[test]
    fn test_builtin_systems_in_order() {
        let sim = Simulation::new(SimulationConfig::default()).unwrap();
        assert_eq!(sim.scheduler().system_names(), vec!["movement", "collision"]);
    }

    #[test]
    fn test_shutdown_drops_systems() {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
        sim.shutdown();
        assert!(sim.scheduler().is_empty());
        sim.step().unwrap();
        assert_eq!(sim.tick_id(), 1);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = SimulationConfig::default();
        config.collision.cell_size = 0.0;
        assert!(matches!(
            Simulation::new(config),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_moving_bodies_meet() {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
        let world = sim.world_mut();
        let a = world.create();
        world.add(a, Transform2D::from_xy(0.0, 0.0)).unwrap();
        world.add(a, Collider::circle(5.0)).unwrap();
        world.add(a, Velocity::linear(Vec2::new(60.0, 0.0))).unwrap();
        let b = world.create();
        world.add(b, Transform2D::from_xy(12.0, 0.0)).unwrap();
        world.add(b, Collider::circle(5.0)).unwrap();

        let met = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&met);
        sim.register_system(
            system_fn("watch", move |world: &mut World, _| {
                if let Some(events) = world.resource::<CollisionEvents>() {
                    *flag.borrow_mut() |= events.between(a, b).is_some();
                }
                Ok(())
            }),
            priority::DAMAGE,
        );

        sim.step().unwrap();
        assert_eq!(sim.collision_stats().contacts, 0);
        assert!(!*met.borrow());
        // 1 unit per tick at 60 Hz; contact once the gap closes.
        for _ in 0..2 {
            sim.step().unwrap();
        }
        assert_eq!(sim.collision_stats().contacts, 1);
        assert!(*met.borrow());
        assert_eq!(sim.tick_id(), 3);
    }
}
