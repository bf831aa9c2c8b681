//! # arena_system
//!
//! The "S" of the arena ECS.
//!
//! A [`System`] is one unit of per-tick behaviour. The [`Scheduler`] keeps
//! systems ordered by priority (ties broken by registration order), runs them
//! against a [`World`](arena_component::World) once per tick, and then flushes
//! the world's deferred-destruction queue. The [`TickLoop`] drives the
//! scheduler at a fixed timestep.
//!
//! ## Usage
//!
//! ```rust
//! use arena_component::World;
//! use arena_system::{Scheduler, priority, system_fn};
//!
//! let mut world = World::new();
//! let mut scheduler = Scheduler::new();
//! scheduler.register_system(
//!     system_fn("spawner", |world: &mut World, _dt| {
//!         world.create();
//!         Ok(())
//!     }),
//!     priority::WAVE,
//! );
//!
//! scheduler.tick(&mut world, 1.0 / 60.0).unwrap();
//! assert_eq!(world.entity_count(), 1);
//! ```

pub mod config;
pub mod error;
pub mod scheduler;
pub mod system;
pub mod tick;

pub use config::TickConfig;
pub use error::TickError;
pub use scheduler::{Scheduler, TickSummary};
pub use system::{FnSystem, System, priority, system_fn};
pub use tick::TickLoop;
