//! Debug gizmos for the interaction ray and the ground check (toggle with F3).

use bevy::prelude::*;
use shared::{ground_check_origin, GameConfig, InteractionCandidate, Locomotion, Player, PlayerCamera};

/// Whether debug gizmos are drawn.
#[derive(Resource, Default)]
pub struct DebugDraw(pub bool);

pub fn init_debug_draw(mut commands: Commands, config: Res<GameConfig>) {
    commands.insert_resource(DebugDraw(config.interaction.debug_draw));
}

pub fn toggle_debug_draw(keyboard: Res<ButtonInput<KeyCode>>, mut debug_draw: ResMut<DebugDraw>) {
    if keyboard.just_pressed(KeyCode::F3) {
        debug_draw.0 = !debug_draw.0;
        info!("Debug draw: {}", if debug_draw.0 { "ON" } else { "OFF" });
    }
}

pub fn draw_debug_gizmos(
    mut gizmos: Gizmos,
    debug_draw: Res<DebugDraw>,
    config: Res<GameConfig>,
    candidate: Res<InteractionCandidate>,
    cameras: Query<&GlobalTransform, With<PlayerCamera>>,
    players: Query<(&Transform, &Locomotion), With<Player>>,
) {
    if !debug_draw.0 {
        return;
    }

    if let Ok(camera) = cameras.single() {
        let start = camera.translation();
        let end = start + camera.forward() * config.interaction.interaction_distance;
        let color = if candidate.target.is_some() {
            Color::srgb(0.2, 1.0, 0.2)
        } else {
            Color::srgb(1.0, 0.2, 0.2)
        };
        gizmos.line(start, end, color);
    }

    if let Ok((transform, locomotion)) = players.single() {
        let settings = &config.controller;
        let origin = ground_check_origin(settings, transform.translation, locomotion.height);
        let reach = origin - Vec3::Y * settings.ground_check_distance;
        let color = if locomotion.grounded {
            Color::srgb(0.2, 0.6, 1.0)
        } else {
            Color::srgb(1.0, 0.6, 0.1)
        };
        gizmos.sphere(origin, settings.ground_check_radius, color);
        gizmos.sphere(reach, settings.ground_check_radius, color.with_alpha(0.4));
        gizmos.line(origin, reach, color);
    }
}
