//! The [`Collider`] component.

use arena_component::Component;
use arena_math::{Aabb, Vec2};
use serde::{Deserialize, Serialize};

use crate::layer::{CollisionLayer, LayerMask};
use crate::narrow::WorldShape;

/// Collision shape in local space, centred on the entity position plus the
/// collider offset. Rotation and scale of the transform are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// A circle. Negative radii are treated as zero.
    Circle {
        /// Circle radius.
        radius: f32,
    },
    /// An axis-aligned box. Negative extents are treated as zero.
    Aabb {
        /// Half the box size along each axis.
        half_extents: Vec2,
    },
}

impl Shape {
    /// Largest distance from the centre to the shape's boundary.
    #[must_use]
    pub fn bounding_radius(&self) -> f32 {
        match *self {
            Self::Circle { radius } => radius.max(0.0),
            Self::Aabb { half_extents } => half_extents.max(Vec2::ZERO).length(),
        }
    }
}

/// Collision data for one entity.
///
/// Solid colliders are pushed apart when they overlap; triggers only
/// produce events. Static colliders never move during separation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    /// Geometry, relative to the shape's centre.
    pub shape: Shape,
    /// Offset of the shape's centre from the entity position.
    #[serde(default)]
    pub offset: Vec2,
    /// The layer this collider belongs to.
    #[serde(default)]
    pub layer: CollisionLayer,
    /// Layers this collider accepts collisions from.
    #[serde(default)]
    pub mask: LayerMask,
    /// Report overlaps as events only; never separate.
    #[serde(default)]
    pub trigger: bool,
    /// Never moved by separation; treated as infinite mass.
    #[serde(default)]
    pub is_static: bool,
}

impl Collider {
    /// A solid circle on the default layer accepting every layer.
    #[must_use]
    pub fn circle(radius: f32) -> Self {
        Self::new(Shape::Circle { radius })
    }

    /// A solid box on the default layer accepting every layer.
    #[must_use]
    pub fn aabb(half_extents: Vec2) -> Self {
        Self::new(Shape::Aabb { half_extents })
    }

    fn new(shape: Shape) -> Self {
        Self {
            shape,
            offset: Vec2::ZERO,
            layer: CollisionLayer::DEFAULT,
            mask: LayerMask::ALL,
            trigger: false,
            is_static: false,
        }
    }

    #[must_use]
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub fn with_layer(mut self, layer: CollisionLayer) -> Self {
        self.layer = layer;
        self
    }

    #[must_use]
    pub fn with_mask(mut self, mask: LayerMask) -> Self {
        self.mask = mask;
        self
    }

    /// Mark as a trigger: events only, no separation.
    #[must_use]
    pub fn as_trigger(mut self) -> Self {
        self.trigger = true;
        self
    }

    /// Mark as static: never moved by separation.
    #[must_use]
    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// The shape placed in the world for an entity at `position`.
    #[must_use]
    pub fn world_shape(&self, position: Vec2) -> WorldShape {
        let center = position + self.offset;
        match self.shape {
            Shape::Circle { radius } => WorldShape::Circle {
                center,
                radius: radius.max(0.0),
            },
            Shape::Aabb { half_extents } => WorldShape::Box(Aabb::from_center_half_extents(
                center,
                half_extents.max(Vec2::ZERO),
            )),
        }
    }

    /// World-space bounding box for an entity at `position`.
    #[must_use]
    pub fn bounds(&self, position: Vec2) -> Aabb {
        self.world_shape(position).bounds()
    }
}

impl Component for Collider {
    fn type_name() -> &'static str {
        "Collider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_bounds_include_offset() {
        let c = Collider::circle(5.0).with_offset(Vec2::new(1.0, 0.0));
        let b = c.bounds(Vec2::new(10.0, 10.0));
        assert_eq!(b.min, Vec2::new(6.0, 5.0));
        assert_eq!(b.max, Vec2::new(16.0, 15.0));
    }

    #[test]
    fn test_negative_sizes_clamp_to_zero() {
        let c = Collider::circle(-3.0);
        assert_eq!(
            c.world_shape(Vec2::ZERO),
            WorldShape::Circle {
                center: Vec2::ZERO,
                radius: 0.0
            }
        );
        let b = Collider::aabb(Vec2::new(-1.0, 2.0)).bounds(Vec2::ZERO);
        assert_eq!(b.min, Vec2::new(0.0, -2.0));
        assert_eq!(Shape::Circle { radius: -1.0 }.bounding_radius(), 0.0);
    }

    #[test]
    fn test_builder_flags() {
        let c = Collider::aabb(Vec2::ONE)
            .with_layer(CollisionLayer::OBSTACLE)
            .with_mask(LayerMask::NONE.with(CollisionLayer::PLAYER))
            .as_static()
            .as_trigger();
        assert!(c.is_static && c.trigger);
        assert_eq!(c.layer, CollisionLayer::OBSTACLE);
        assert!(c.mask.contains(CollisionLayer::PLAYER));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let c: Collider =
            serde_json::from_str(r#"{"shape":{"circle":{"radius":4.0}},"trigger":true}"#).unwrap();
        assert_eq!(c.shape, Shape::Circle { radius: 4.0 });
        assert!(c.trigger);
        assert_eq!(c.mask, LayerMask::ALL);
        assert_eq!(c.offset, Vec2::ZERO);
    }
}
