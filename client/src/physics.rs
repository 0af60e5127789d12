//! Rapier-backed implementations of the shared physics capabilities.
//!
//! `RapierQueries` answers sphere and ray casts against the live Rapier world.
//! `KinematicMotor` drives the player's `KinematicCharacterController`; Rapier
//! resolves the accumulated translation during its own step.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use shared::{CastHit, CharacterMotor, CollisionMask, PhysicsQuery};

/// Collision groups for a collider that belongs to `membership` and touches `filter`.
pub fn collision_groups(membership: CollisionMask, filter: CollisionMask) -> CollisionGroups {
    CollisionGroups::new(
        Group::from_bits_truncate(membership.0),
        Group::from_bits_truncate(filter.0),
    )
}

/// Capsule collider of total `height` (feet to head).
pub fn capsule(height: f32, radius: f32) -> Collider {
    Collider::capsule_y((height * 0.5 - radius).max(0.0), radius)
}

// =============================================================================
// QUERIES
// =============================================================================

pub struct RapierQueries<'a> {
    context: &'a RapierContext<'a>,
    exclude: Option<Entity>,
}

impl<'a> RapierQueries<'a> {
    pub fn new(context: &'a RapierContext<'a>) -> Self {
        Self {
            context,
            exclude: None,
        }
    }

    /// Ignore this collider (usually the caster's own body).
    pub fn excluding(mut self, entity: Entity) -> Self {
        self.exclude = Some(entity);
        self
    }

    fn filter(&self, mask: CollisionMask) -> QueryFilter<'static> {
        let filter = QueryFilter::new()
            .exclude_sensors()
            .groups(collision_groups(CollisionMask::ALL, mask));
        match self.exclude {
            Some(entity) => filter.exclude_collider(entity),
            None => filter,
        }
    }
}

impl PhysicsQuery for RapierQueries<'_> {
    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Dir3,
        max_distance: f32,
        mask: CollisionMask,
    ) -> Option<CastHit> {
        let (entity, hit) = self.context.cast_shape(
            origin,
            Quat::IDENTITY,
            direction.as_vec3(),
            &*Collider::ball(radius).raw,
            ShapeCastOptions::with_max_time_of_impact(max_distance),
            self.filter(mask),
        )?;
        Some(CastHit {
            entity,
            distance: hit.time_of_impact,
        })
    }

    fn ray_cast(
        &self,
        origin: Vec3,
        direction: Dir3,
        max_distance: f32,
        mask: CollisionMask,
    ) -> Option<CastHit> {
        self.context
            .cast_ray(origin, direction.as_vec3(), max_distance, true, self.filter(mask))
            .map(|(entity, distance)| CastHit { entity, distance })
    }
}

// =============================================================================
// MOTOR
// =============================================================================

/// Borrowed view of the player body for one frame.
///
/// Holds `Mut` handles so untouched components keep their change ticks.
pub struct KinematicMotor<'a> {
    transform: Mut<'a, Transform>,
    collider: Mut<'a, Collider>,
    controller: Mut<'a, KinematicCharacterController>,
    radius: f32,
    height: f32,
}

impl<'a> KinematicMotor<'a> {
    pub fn new(
        transform: Mut<'a, Transform>,
        collider: Mut<'a, Collider>,
        controller: Mut<'a, KinematicCharacterController>,
        radius: f32,
        height: f32,
    ) -> Self {
        Self {
            transform,
            collider,
            controller,
            radius,
            height,
        }
    }
}

impl CharacterMotor for KinematicMotor<'_> {
    fn position(&self) -> Vec3 {
        self.transform.translation
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn set_height(&mut self, height: f32) {
        if (height - self.height).abs() < 1e-4 {
            return;
        }
        *self.collider = capsule(height, self.radius);
        self.height = height;
    }

    fn nudge(&mut self, offset: Vec3) {
        if offset == Vec3::ZERO {
            return;
        }
        self.transform.translation += offset;
    }

    fn move_and_slide(&mut self, displacement: Vec3) {
        let pending = self.controller.translation.unwrap_or(Vec3::ZERO);
        self.controller.translation = Some(pending + displacement);
    }
}
