//! Crosshair UI
//!
//! Centered dot with four short ticks. Tightens and turns warm while a door is in reach.

use bevy::prelude::*;
use shared::InteractionCandidate;

use crate::ui::styles::ACCENT_COLOR;

const IDLE_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.8);
const TICK_LENGTH: f32 = 8.0;
const IDLE_OFFSET: f32 = 12.0;
const TARGET_OFFSET: f32 = 7.0;

/// Marker component for the crosshair root
#[derive(Component)]
pub struct Crosshair;

#[derive(Component)]
pub struct CrosshairDot;

/// One of the four ticks around the dot.
#[derive(Component, Clone, Copy)]
pub enum CrosshairTick {
    Top,
    Bottom,
    Left,
    Right,
}

impl CrosshairTick {
    const ALL: [Self; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];

    /// Node placed `offset` pixels from the center.
    fn node(self, offset: f32) -> Node {
        let mut node = Node {
            position_type: PositionType::Absolute,
            ..default()
        };
        match self {
            Self::Top | Self::Bottom => {
                node.width = Val::Px(2.0);
                node.height = Val::Px(TICK_LENGTH);
            }
            Self::Left | Self::Right => {
                node.width = Val::Px(TICK_LENGTH);
                node.height = Val::Px(2.0);
            }
        }
        self.place(&mut node, offset);
        node
    }

    fn place(self, node: &mut Node, offset: f32) {
        let at = Val::Px(-offset);
        match self {
            Self::Top => node.top = at,
            Self::Bottom => node.bottom = at,
            Self::Left => node.left = at,
            Self::Right => node.right = at,
        }
    }
}

pub fn spawn_crosshair(mut commands: Commands) {
    commands
        .spawn((
            Crosshair,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            Pickable::IGNORE,
        ))
        .with_children(|parent| {
            parent.spawn((
                CrosshairDot,
                Node {
                    width: Val::Px(4.0),
                    height: Val::Px(4.0),
                    ..default()
                },
                BackgroundColor(IDLE_COLOR),
                BorderRadius::all(Val::Px(2.0)),
            ));
            for tick in CrosshairTick::ALL {
                parent.spawn((tick, tick.node(IDLE_OFFSET), BackgroundColor(IDLE_COLOR)));
            }
        });
}

/// Highlight the crosshair while a door is targeted.
pub fn update_crosshair_target(
    candidate: Res<InteractionCandidate>,
    mut dots: Query<&mut BackgroundColor, (With<CrosshairDot>, Without<CrosshairTick>)>,
    mut ticks: Query<(&CrosshairTick, &mut Node, &mut BackgroundColor), Without<CrosshairDot>>,
) {
    if !candidate.is_changed() {
        return;
    }
    let (color, offset) = if candidate.target.is_some() {
        (ACCENT_COLOR, TARGET_OFFSET)
    } else {
        (IDLE_COLOR, IDLE_OFFSET)
    };

    for mut bg in dots.iter_mut() {
        *bg = BackgroundColor(color);
    }
    for (tick, mut node, mut bg) in ticks.iter_mut() {
        tick.place(&mut node, offset);
        *bg = BackgroundColor(color);
    }
}

pub fn despawn_crosshair(mut commands: Commands, query: Query<Entity, With<Crosshair>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}
