//! Motion components: [`Velocity`] and [`Mass`].

use arena_component::Component;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Linear and angular velocity, in world units (radians) per second.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Velocity {
    /// Linear velocity.
    pub linear: Vec2,
    /// Angular velocity.
    pub angular: f32,
}

impl Velocity {
    /// A purely linear velocity.
    #[must_use]
    pub fn linear(linear: Vec2) -> Self {
        Self {
            linear,
            angular: 0.0,
        }
    }

    /// Magnitude of the linear velocity.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.linear.length()
    }

    /// Scale the linear velocity down so its magnitude is at most `max`.
    pub fn clamp_speed(&mut self, max: f32) {
        self.linear = self.linear.clamp_length_max(max);
    }
}

impl Component for Velocity {
    fn type_name() -> &'static str {
        "Velocity"
    }
}

/// Mass used to split positional corrections between two bodies.
///
/// A non-positive or non-finite mass marks the body as immovable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Mass(pub f32);

impl Mass {
    /// Inverse mass; `0.0` for immovable bodies.
    #[must_use]
    pub fn inverse(self) -> f32 {
        if self.0 > 0.0 && self.0.is_finite() {
            1.0 / self.0
        } else {
            0.0
        }
    }
}

impl Default for Mass {
    fn default() -> Self {
        Self(1.0)
    }
}

impl Component for Mass {
    fn type_name() -> &'static str {
        "Mass"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_speed() {
        let mut v = Velocity::linear(Vec2::new(30.0, 40.0));
        assert_eq!(v.speed(), 50.0);
        v.clamp_speed(10.0);
        assert!((v.speed() - 10.0).abs() < 1e-5);
        assert!((v.linear.normalize() - Vec2::new(0.6, 0.8)).length() < 1e-5);
    }

    #[test]
    fn test_inverse_mass() {
        assert_eq!(Mass(2.0).inverse(), 0.5);
        assert_eq!(Mass(0.0).inverse(), 0.0);
        assert_eq!(Mass(-1.0).inverse(), 0.0);
        assert_eq!(Mass(f32::INFINITY).inverse(), 0.0);
        assert_eq!(Mass::default().inverse(), 1.0);
    }
}
