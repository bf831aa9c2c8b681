//! # arena_math
//!
//! Math types for the arena simulation. Re-exports [`glam`] for linear
//! algebra and defines the 2D spatial types that implement
//! [`Component`](arena_component::Component).

pub mod aabb;
pub mod body;
pub mod transform;

// Re-export glam types for convenience.
pub use glam::{Mat3, Vec2};

pub use aabb::Aabb;
pub use body::{Mass, Velocity};
pub use transform::Transform2D;
