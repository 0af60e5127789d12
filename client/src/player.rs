//! First-person player body: spawning, crouch/sprint toggles and movement.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use shared::{
    spawn_transform, CollisionMask, CrouchToggle, GameConfig, Locomotion, LookState, MoveInput,
    Player, PlayerCamera,
};

use crate::input::ControlInput;
use crate::physics::{capsule, collision_groups, KinematicMotor, RapierQueries};

/// Spawn the player body with its camera as a child.
pub fn spawn_player(mut commands: Commands, config: Res<GameConfig>) {
    let controller = &config.controller;
    let body_groups = collision_groups(CollisionMask::PLAYER, controller.ground_mask);

    commands
        .spawn((
            Player,
            Name::new("Player"),
            spawn_transform(),
            Visibility::default(),
            RigidBody::KinematicPositionBased,
            capsule(controller.standing_height, controller.radius),
            body_groups,
            KinematicCharacterController {
                filter_groups: Some(body_groups),
                offset: CharacterLength::Absolute(0.02),
                snap_to_ground: None,
                ..default()
            },
            Locomotion::new(controller),
            LookState::default(),
        ))
        .with_children(|body| {
            body.spawn((
                PlayerCamera,
                Camera3d::default(),
                Projection::Perspective(PerspectiveProjection {
                    fov: 70.0_f32.to_radians(),
                    ..default()
                }),
                Transform::from_xyz(0.0, controller.standing_camera_y, 0.0),
                SpatialListener::new(0.2),
            ));
        });

    info!("Spawned player at {:?}", shared::SPAWN_POSITION);
}

/// Apply crouch and sprint toggles. Crouch needs the physics world for the head clearance cast.
pub fn handle_stance_toggles(
    config: Res<GameConfig>,
    input: Res<ControlInput>,
    rapier: ReadRapierContext,
    mut players: Query<(Entity, &Transform, &mut Locomotion), With<Player>>,
) {
    if !input.crouch && !input.sprint {
        return;
    }
    let Ok((entity, transform, mut locomotion)) = players.single_mut() else {
        return;
    };

    if input.crouch {
        let Ok(context) = rapier.single() else {
            return;
        };
        let physics = RapierQueries::new(&context).excluding(entity);
        match locomotion.toggle_crouch(&config.controller, transform.translation, &physics) {
            CrouchToggle::Blocked => debug!("Not enough headroom to stand up"),
            result => debug!("Crouch toggle: {result:?}"),
        }
    }

    if input.sprint {
        let sprinting = locomotion.toggle_sprint();
        debug!("Sprint {}", if sprinting { "on" } else { "off" });
    }
}

/// Ground check, crouch blend, planar move and gravity for the player body.
pub fn move_player(
    time: Res<Time>,
    config: Res<GameConfig>,
    input: Res<ControlInput>,
    rapier: ReadRapierContext,
    mut players: Query<
        (
            Entity,
            &mut Transform,
            &mut Collider,
            &mut KinematicCharacterController,
            &mut Locomotion,
        ),
        (With<Player>, Without<PlayerCamera>),
    >,
    mut cameras: Query<&mut Transform, (With<PlayerCamera>, Without<Player>)>,
    mut warned_camera: Local<bool>,
) {
    let Ok((entity, transform, collider, controller, mut locomotion)) =
        players.single_mut()
    else {
        return;
    };
    let Ok(context) = rapier.single() else {
        return;
    };

    let settings = &config.controller;
    let move_input = MoveInput {
        axis: input.movement,
        right: transform.right().as_vec3(),
        forward: transform.forward().as_vec3(),
    };

    let physics = RapierQueries::new(&context).excluding(entity);
    let height = locomotion.height;
    let mut motor = KinematicMotor::new(transform, collider, controller, settings.radius, height);
    let pose = locomotion.step(settings, &move_input, &physics, &mut motor, time.delta_secs());

    match cameras.single_mut() {
        Ok(mut camera) => camera.translation.y = pose.camera_y,
        Err(_) => {
            if !*warned_camera {
                warn!("Player has no camera; crouch camera offset skipped");
                *warned_camera = true;
            }
        }
    }
}
