//! 2D transform component.
//!
//! [`Transform2D`] represents position, rotation, and scale on the arena
//! plane. Nearly every simulated entity carries one.

use arena_component::Component;
use glam::{Mat3, Vec2};
use serde::{Deserialize, Serialize};

/// A 2D transform: position, rotation (radians, counter-clockwise from +X),
/// and uniform scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform2D {
    /// World-space position.
    pub position: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    /// Uniform scale factor.
    pub scale: f32,
}

impl Transform2D {
    /// The identity transform: origin, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        position: Vec2::ZERO,
        rotation: 0.0,
        scale: 1.0,
    };

    /// Create a new transform with the given position and default rotation/scale.
    #[must_use]
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Create a new transform at `(x, y)`.
    #[must_use]
    pub fn from_xy(x: f32, y: f32) -> Self {
        Self::from_position(Vec2::new(x, y))
    }

    /// Compute the 3×3 affine matrix for this transform.
    #[must_use]
    pub fn to_matrix(&self) -> Mat3 {
        Mat3::from_scale_angle_translation(Vec2::splat(self.scale), self.rotation, self.position)
    }

    /// Unit vector the entity is facing.
    #[must_use]
    pub fn forward(&self) -> Vec2 {
        Vec2::from_angle(self.rotation)
    }

    /// Distance from this transform's position to `point`.
    #[must_use]
    pub fn distance_to(&self, point: Vec2) -> f32 {
        self.position.distance(point)
    }

    /// Angle in radians from this transform's position towards `point`.
    #[must_use]
    pub fn angle_to(&self, point: Vec2) -> f32 {
        let d = point - self.position;
        d.y.atan2(d.x)
    }

    /// Translate the transform by the given offset.
    #[must_use]
    pub fn translated(mut self, offset: Vec2) -> Self {
        self.position += offset;
        self
    }

    /// Rotate the transform by `radians`.
    #[must_use]
    pub fn rotated(mut self, radians: f32) -> Self {
        self.rotation += radians;
        self
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Component for Transform2D {
    fn type_name() -> &'static str {
        "Transform2D"
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn test_identity_transform() {
        let t = Transform2D::IDENTITY;
        assert_eq!(t.position, Vec2::ZERO);
        assert_eq!(t.rotation, 0.0);
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.to_matrix(), Mat3::IDENTITY);
    }

    #[test]
    fn test_translated() {
        let t = Transform2D::IDENTITY.translated(Vec2::new(5.0, 0.0));
        assert_eq!(t.position, Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_forward_follows_rotation() {
        let t = Transform2D::IDENTITY.rotated(FRAC_PI_2);
        assert!((t.forward() - Vec2::Y).length() < 1e-6);
    }

    #[test]
    fn test_distance_and_angle() {
        let t = Transform2D::from_xy(1.0, 1.0);
        assert!((t.distance_to(Vec2::new(4.0, 5.0)) - 5.0).abs() < 1e-6);
        assert!((t.angle_to(Vec2::new(1.0, 3.0)) - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_deserialize_partial_json() {
        let t: Transform2D =
            serde_json::from_str(r#"{"position":[1.0,2.0],"rotation":0.5,"scale":2.0}"#).unwrap();
        assert_eq!(t.position, Vec2::new(1.0, 2.0));
        assert_eq!(t.scale, 2.0);
    }
}
