//! # arena_app
//!
//! Host-side wiring for the arena simulation.
//!
//! [`Simulation`] owns the world and the tick loop, and registers the
//! built-in systems: [`MovementSystem`] at
//! [`PHYSICS`](arena_system::priority::PHYSICS) priority and the
//! [`CollisionEngine`](arena_collision::CollisionEngine) at
//! [`COLLISION`](arena_system::priority::COLLISION) priority. Gameplay
//! systems plug in through [`Simulation::register_system`].
//!
//! Configuration comes from a [`SimulationConfig`], usually loaded from JSON.

pub mod config;
pub mod movement;
pub mod simulation;

pub use config::{ConfigError, MovementConfig, SimulationConfig};
pub use movement::MovementSystem;
pub use simulation::Simulation;
