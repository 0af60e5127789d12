//! Door interaction - find the door under the crosshair and use it with E
//!
//! Shows a prompt while a door is in reach and sends `DoorInteract` on confirm.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use shared::{
    scan_for_door, Door, DoorInteract, DoorKind, DoubleDoor, GameConfig, InteractionCandidate,
    Player, PlayerCamera,
};

use crate::input::ControlInput;
use crate::physics::RapierQueries;
use crate::states::GameState;

/// Marker for the interaction prompt UI
#[derive(Component)]
pub struct InteractionPrompt;

/// Cast from the camera and record which door (if any) is targeted.
pub fn scan_for_doors(
    config: Res<GameConfig>,
    rapier: ReadRapierContext,
    cameras: Query<&GlobalTransform, With<PlayerCamera>>,
    players: Query<Entity, With<Player>>,
    parents: Query<&ChildOf>,
    doors: Query<(), With<Door>>,
    doubles: Query<(), With<DoubleDoor>>,
    mut candidate: ResMut<InteractionCandidate>,
    mut warned_camera: Local<bool>,
) {
    let Ok(camera) = cameras.single() else {
        if !*warned_camera {
            warn!("No player camera found; door interaction disabled");
            *warned_camera = true;
        }
        *candidate = InteractionCandidate::default();
        return;
    };
    let Ok(context) = rapier.single() else {
        *candidate = InteractionCandidate::default();
        return;
    };

    let mut physics = RapierQueries::new(&context);
    if let Ok(player) = players.single() {
        physics = physics.excluding(player);
    }

    let found = scan_for_door(
        &config.interaction,
        camera.translation(),
        camera.forward(),
        &physics,
        |entity| parents.get(entity).ok().map(ChildOf::parent),
        |entity| {
            if doubles.contains(entity) {
                Some(DoorKind::Double)
            } else if doors.contains(entity) {
                Some(DoorKind::Single)
            } else {
                None
            }
        },
    );

    if found != *candidate {
        *candidate = found;
    }
}

/// Show the prompt while a door is targeted, hide it otherwise.
pub fn show_interaction_prompt(
    mut commands: Commands,
    config: Res<GameConfig>,
    candidate: Res<InteractionCandidate>,
    existing_prompt: Query<Entity, With<InteractionPrompt>>,
) {
    if candidate.target.is_some() {
        if existing_prompt.is_empty() {
            commands.spawn((
                InteractionPrompt,
                Text::new(config.interaction.prompt_text.clone()),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.9)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Percent(25.0),
                    width: Val::Percent(100.0),
                    justify_content: JustifyContent::Center,
                    ..default()
                },
                TextLayout::new_with_justify(Justify::Center),
            ));
        }
    } else {
        for entity in existing_prompt.iter() {
            commands.entity(entity).despawn();
        }
    }
}

/// Confirm input uses whatever door is targeted.
pub fn handle_interact_input(
    input: Res<ControlInput>,
    candidate: Res<InteractionCandidate>,
    mut requests: MessageWriter<DoorInteract>,
) {
    if !input.interact {
        return;
    }
    if let Some(target) = candidate.target {
        debug!("Interacting with door {target}");
        requests.write(DoorInteract { target });
    }
}

/// Remove the prompt when leaving gameplay.
pub fn cleanup_interaction_prompt(
    mut commands: Commands,
    prompts: Query<Entity, With<InteractionPrompt>>,
    mut candidate: ResMut<InteractionCandidate>,
) {
    for entity in prompts.iter() {
        commands.entity(entity).despawn();
    }
    *candidate = InteractionCandidate::default();
}

/// Door interaction plugin
pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InteractionCandidate>();
        app.add_systems(OnExit(GameState::Playing), cleanup_interaction_prompt);
    }
}
