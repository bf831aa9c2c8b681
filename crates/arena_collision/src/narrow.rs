//! Narrow phase: exact overlap tests between placed shapes.
//!
//! Every test treats touching shapes as overlapping, and is symmetric:
//! `intersect(a, b)` and `intersect(b, a)` agree on whether there is a
//! contact, with opposite normals.

use arena_math::{Aabb, Vec2};

/// Centres closer than this are treated as coincident.
const COINCIDENT_EPSILON: f32 = 1e-6;

/// A collider shape placed in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldShape {
    Circle { center: Vec2, radius: f32 },
    Box(Aabb),
}

impl WorldShape {
    /// Bounding box of the shape.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        match *self {
            Self::Circle { center, radius } => Aabb::around_circle(center, radius),
            Self::Box(aabb) => aabb,
        }
    }

    #[must_use]
    pub fn center(&self) -> Vec2 {
        match *self {
            Self::Circle { center, .. } => center,
            Self::Box(aabb) => aabb.center(),
        }
    }
}

/// Result of a successful overlap test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit vector pointing from the first shape towards the second.
    /// Moving the second shape by `normal * depth` separates the pair.
    pub normal: Vec2,
    /// Penetration depth along `normal`; zero for touching shapes.
    pub depth: f32,
    /// Representative contact point, when one is well defined.
    pub point: Option<Vec2>,
}

impl Contact {
    /// The same contact seen from the other shape.
    #[must_use]
    pub fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }
}

/// Test two placed shapes for overlap.
#[must_use]
pub fn intersect(a: &WorldShape, b: &WorldShape) -> Option<Contact> {
    match (*a, *b) {
        (
            WorldShape::Circle {
                center: ca,
                radius: ra,
            },
            WorldShape::Circle {
                center: cb,
                radius: rb,
            },
        ) => circle_circle(ca, ra, cb, rb),
        (WorldShape::Circle { center, radius }, WorldShape::Box(aabb)) => {
            circle_aabb(center, radius, &aabb)
        }
        (WorldShape::Box(aabb), WorldShape::Circle { center, radius }) => {
            circle_aabb(center, radius, &aabb).map(Contact::flipped)
        }
        (WorldShape::Box(a), WorldShape::Box(b)) => aabb_aabb(&a, &b),
    }
}

fn circle_circle(ca: Vec2, ra: f32, cb: Vec2, rb: f32) -> Option<Contact> {
    let delta = cb - ca;
    let dist_sq = delta.length_squared();
    let reach = ra + rb;
    if dist_sq > reach * reach {
        return None;
    }

    let dist = dist_sq.sqrt();
    if dist < COINCIDENT_EPSILON {
        // No direction to separate along; use +X.
        return Some(Contact {
            normal: Vec2::X,
            depth: reach,
            point: None,
        });
    }

    let normal = delta / dist;
    let depth = (reach - dist).max(0.0);
    Some(Contact {
        normal,
        depth,
        point: Some(ca + normal * (ra - depth * 0.5)),
    })
}

/// Circle first, box second.
fn circle_aabb(center: Vec2, radius: f32, aabb: &Aabb) -> Option<Contact> {
    if aabb.contains_point(center) {
        // Push out through the nearest face.
        let faces = [
            (center.x - aabb.min.x, Vec2::X, Vec2::new(aabb.min.x, center.y)),
            (aabb.max.x - center.x, Vec2::NEG_X, Vec2::new(aabb.max.x, center.y)),
            (center.y - aabb.min.y, Vec2::Y, Vec2::new(center.x, aabb.min.y)),
            (aabb.max.y - center.y, Vec2::NEG_Y, Vec2::new(center.x, aabb.max.y)),
        ];
        let (dist, normal, point) = faces
            .into_iter()
            .fold(faces[0], |best, face| if face.0 < best.0 { face } else { best });
        return Some(Contact {
            normal,
            depth: dist + radius,
            point: Some(point),
        });
    }

    let closest = aabb.closest_point(center);
    let delta = closest - center;
    let dist_sq = delta.length_squared();
    if dist_sq > radius * radius {
        return None;
    }

    let dist = dist_sq.sqrt();
    let normal = if dist < COINCIDENT_EPSILON {
        Vec2::X
    } else {
        delta / dist
    };
    Some(Contact {
        normal,
        depth: (radius - dist).max(0.0),
        point: Some(closest),
    })
}

fn aabb_aabb(a: &Aabb, b: &Aabb) -> Option<Contact> {
    let overlap_min = a.min.max(b.min);
    let overlap_max = a.max.min(b.max);
    let overlap = overlap_max - overlap_min;
    if overlap.x < 0.0 || overlap.y < 0.0 {
        return None;
    }

    let between = b.center() - a.center();
    let normal = if overlap.x <= overlap.y {
        if between.x < 0.0 { Vec2::NEG_X } else { Vec2::X }
    } else if between.y < 0.0 {
        Vec2::NEG_Y
    } else {
        Vec2::Y
    };
    Some(Contact {
        normal,
        depth: overlap.x.min(overlap.y),
        point: Some((overlap_min + overlap_max) * 0.5),
    })
}
