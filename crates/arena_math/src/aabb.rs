//! Axis-aligned bounding boxes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box given by its minimum and maximum corners.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Aabb {
    /// Lower-left corner.
    pub min: Vec2,
    /// Upper-right corner.
    pub max: Vec2,
}

impl Aabb {
    /// Box from its corners.
    #[must_use]
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box centred on `center` with the given half extents.
    #[must_use]
    pub fn from_center_half_extents(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Bounding box of a circle.
    #[must_use]
    pub fn around_circle(center: Vec2, radius: f32) -> Self {
        Self::from_center_half_extents(center, Vec2::splat(radius))
    }

    /// Centre point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Half of the box's size on each axis.
    #[must_use]
    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// Returns `true` if the boxes overlap or touch.
    #[must_use]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// Returns `true` if `point` lies inside or on the boundary.
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Closest point of the box to `point`.
    #[must_use]
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersects_includes_touching() {
        let a = Aabb::new(Vec2::ZERO, Vec2::ONE);
        let b = Aabb::new(Vec2::new(1.0, 0.0), Vec2::new(2.0, 1.0));
        let c = Aabb::new(Vec2::new(1.5, 0.0), Vec2::new(2.0, 1.0));
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_closest_point() {
        let a = Aabb::from_center_half_extents(Vec2::ZERO, Vec2::new(2.0, 1.0));
        assert_eq!(a.closest_point(Vec2::new(5.0, 5.0)), Vec2::new(2.0, 1.0));
        assert_eq!(a.closest_point(Vec2::new(0.5, 0.5)), Vec2::new(0.5, 0.5));
        assert!(a.contains_point(Vec2::new(-2.0, 1.0)));
    }

    #[test]
    fn test_circle_bounds() {
        let a = Aabb::around_circle(Vec2::new(10.0, 0.0), 5.0);
        assert_eq!(a.min, Vec2::new(5.0, -5.0));
        assert_eq!(a.max, Vec2::new(15.0, 5.0));
        assert_eq!(a.center(), Vec2::new(10.0, 0.0));
        assert_eq!(a.half_extents(), Vec2::splat(5.0));
    }
}
