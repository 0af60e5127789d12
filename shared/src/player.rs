//! Player markers and spawn constants

use bevy::prelude::*;

/// Where the player starts (collider center, meters).
pub const SPAWN_POSITION: [f32; 3] = [0.0, 1.1, 6.0];

/// Initial facing in degrees. Zero looks down -Z.
pub const SPAWN_YAW_DEGREES: f32 = 0.0;

/// The locally controlled first-person body.
#[derive(Component, Debug, Default)]
pub struct Player;

/// The first-person camera, a child of the player body.
#[derive(Component, Debug, Default)]
pub struct PlayerCamera;

/// Build the body transform for the spawn point.
pub fn spawn_transform() -> Transform {
    Transform::from_translation(Vec3::from_array(SPAWN_POSITION))
        .with_rotation(Quat::from_rotation_y(-SPAWN_YAW_DEGREES.to_radians()))
}
