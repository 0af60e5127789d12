//! Physics capabilities the character and interaction logic run against.
//!
//! The game never talks to Rapier directly from gameplay code. Instead the client wraps
//! the Rapier context in these traits, and tests drive the same logic with tiny
//! in-memory worlds.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Collision layer bitmask (one bit per layer).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollisionMask(pub u32);

impl CollisionMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u32::MAX);

    /// Static level geometry (floors, walls, ceilings).
    pub const WORLD: Self = Self(1 << 0);
    /// The player character's own collider.
    pub const PLAYER: Self = Self(1 << 1);
    /// Door panels.
    pub const DOOR: Self = Self(1 << 2);

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for CollisionMask {
    fn default() -> Self {
        Self::WORLD
    }
}

/// Result of a successful ray or shape cast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CastHit {
    /// The collider entity that was struck.
    pub entity: Entity,
    /// Distance travelled along the cast direction until contact.
    pub distance: f32,
}

/// Read-only spatial queries against the physics world.
pub trait PhysicsQuery {
    /// Sweep a sphere from `origin` along `direction` for at most `max_distance`.
    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Dir3,
        max_distance: f32,
        mask: CollisionMask,
    ) -> Option<CastHit>;

    /// Cast a ray from `origin` along `direction` for at most `max_distance`.
    fn ray_cast(
        &self,
        origin: Vec3,
        direction: Dir3,
        max_distance: f32,
        mask: CollisionMask,
    ) -> Option<CastHit>;
}

/// The character body the movement logic drives.
///
/// `move_and_slide` is the host's sweep-and-resolve primitive; collision response is
/// entirely its business.
pub trait CharacterMotor {
    /// World-space center of the character collider.
    fn position(&self) -> Vec3;

    /// Current collider height (feet to head).
    fn height(&self) -> f32;

    /// Resize the collider around its center.
    fn set_height(&mut self, height: f32);

    /// Teleport by `offset` without collision resolution.
    fn nudge(&mut self, offset: Vec3);

    /// Move by `displacement`, sliding along whatever is in the way.
    fn move_and_slide(&mut self, displacement: Vec3);
}
