//! Collision layers, masks, and the gating policy between them.

use serde::{Deserialize, Serialize};

/// The single category a collider belongs to. Layers are numbered `0..32`.
///
/// A layer outside that range is in no mask, so its collider never passes
/// the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CollisionLayer(pub u8);

impl CollisionLayer {
    /// Layer used by colliders that do not pick one.
    pub const DEFAULT: Self = Self(0);
    /// The player ship.
    pub const PLAYER: Self = Self(1);
    /// Hostile units.
    pub const ENEMY: Self = Self(2);
    /// Shots fired by the player.
    pub const PLAYER_PROJECTILE: Self = Self(3);
    /// Shots fired by enemies.
    pub const ENEMY_PROJECTILE: Self = Self(4);
    /// Walls and other static geometry.
    pub const OBSTACLE: Self = Self(5);
    /// Collectible pickups.
    pub const POWERUP: Self = Self(6);

    /// Bit of this layer in a [`LayerMask`], or `0` if out of range.
    #[must_use]
    pub const fn bit(self) -> u32 {
        match 1u32.checked_shl(self.0 as u32) {
            Some(bit) => bit,
            None => 0,
        }
    }
}

impl Default for CollisionLayer {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// The set of layers a collider accepts collisions from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Accepts nothing.
    pub const NONE: Self = Self(0);
    /// Accepts every layer.
    pub const ALL: Self = Self(u32::MAX);

    /// Mask accepting exactly `layers`.
    #[must_use]
    pub fn from_layers(layers: &[CollisionLayer]) -> Self {
        layers.iter().fold(Self::NONE, |mask, &layer| mask.with(layer))
    }

    /// This mask plus `layer`.
    #[must_use]
    pub const fn with(self, layer: CollisionLayer) -> Self {
        Self(self.0 | layer.bit())
    }

    /// This mask minus `layer`.
    #[must_use]
    pub const fn without(self, layer: CollisionLayer) -> Self {
        Self(self.0 & !layer.bit())
    }

    /// Returns `true` if `layer` is accepted.
    #[must_use]
    pub const fn contains(self, layer: CollisionLayer) -> bool {
        self.0 & layer.bit() != 0
    }

    /// Returns `true` if nothing is accepted.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl FromIterator<CollisionLayer> for LayerMask {
    fn from_iter<I: IntoIterator<Item = CollisionLayer>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, Self::with)
    }
}

/// How the layer/mask pair of two colliders decides whether they may collide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatingPolicy {
    /// Both sides must accept the other's layer.
    #[default]
    Symmetric,
    /// One side accepting the other's layer is enough.
    Either,
}

impl GatingPolicy {
    /// Whether colliders `(layer_a, mask_a)` and `(layer_b, mask_b)` may collide.
    #[must_use]
    pub fn allows(
        self,
        layer_a: CollisionLayer,
        mask_a: LayerMask,
        layer_b: CollisionLayer,
        mask_b: LayerMask,
    ) -> bool {
        let b_accepts_a = mask_b.contains(layer_a);
        let a_accepts_b = mask_a.contains(layer_b);
        match self {
            Self::Symmetric => a_accepts_b && b_accepts_a,
            Self::Either => a_accepts_b || b_accepts_a,
        }
    }
}
