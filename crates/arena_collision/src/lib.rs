//! # arena_collision
//!
//! Collision detection for the arena simulation.
//!
//! - [`SpatialGrid`]: uniform hash grid used as the broad phase.
//! - [`intersect`]: exact circle/AABB overlap tests (narrow phase).
//! - [`CollisionEngine`]: a [`System`](arena_system::System) that runs both
//!   phases over every entity holding a
//!   [`Transform2D`](arena_math::Transform2D) and a [`Collider`], publishes
//!   [`CollisionEvents`] for later systems, and pushes solid bodies apart.

pub mod collider;
pub mod config;
pub mod engine;
pub mod event;
pub mod grid;
pub mod layer;
pub mod narrow;

pub use collider::{Collider, Shape};
pub use config::CollisionConfig;
pub use engine::CollisionEngine;
pub use event::{CollisionEvent, CollisionEvents, CollisionStats};
pub use grid::{CellCoord, SpatialGrid};
pub use layer::{CollisionLayer, GatingPolicy, LayerMask};
pub use narrow::{Contact, WorldShape, intersect};
