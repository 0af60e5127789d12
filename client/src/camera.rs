//! First-person look
//!
//! Yaw turns the player body, pitch tilts the child camera. Pitch is written as an
//! absolute rotation every frame so it never drifts.

use bevy::prelude::*;
use shared::{GameConfig, LookState, Player, PlayerCamera};

use crate::input::ControlInput;

/// Feed this frame's look sample through the smoothing filter and rotate body and camera.
pub fn update_look(
    time: Res<Time>,
    config: Res<GameConfig>,
    input: Res<ControlInput>,
    mut bodies: Query<(&mut Transform, &mut LookState), (With<Player>, Without<PlayerCamera>)>,
    mut cameras: Query<&mut Transform, (With<PlayerCamera>, Without<Player>)>,
    mut warned_camera: Local<bool>,
) {
    let Ok((mut body, mut look)) = bodies.single_mut() else {
        return;
    };

    match input.look {
        Some(sample) => look.push_sample(&config.look, sample),
        None => look.release(),
    }
    let output = look.update(&config.look, time.delta_secs());

    // Samples are +x right, Bevy yaw is counter-clockwise.
    if output.yaw_delta != 0.0 {
        body.rotate_y(-output.yaw_delta.to_radians());
    }

    let Ok(mut camera) = cameras.single_mut() else {
        if !*warned_camera {
            warn!("No player camera found; pitch not applied");
            *warned_camera = true;
        }
        return;
    };
    camera.rotation = Quat::from_rotation_x(-output.pitch.to_radians());
}
