//! Collision engine configuration.

use serde::{Deserialize, Serialize};

use crate::layer::GatingPolicy;

/// Configuration for the [`CollisionEngine`](crate::CollisionEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Side length of one spatial grid cell. Best at about twice the largest
    /// collider radius.
    pub cell_size: f32,
    /// Layer/mask gating between colliders.
    pub gating: GatingPolicy,
    /// Push overlapping solid bodies apart.
    pub resolve_overlaps: bool,
    /// When a body is pushed out of a static collider, drop the part of its
    /// velocity pointing into it.
    pub cancel_velocity_into_static: bool,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            cell_size: 50.0,
            gating: GatingPolicy::Symmetric,
            resolve_overlaps: true,
            cancel_velocity_into_static: true,
        }
    }
}
