//! Escape menu. Freezes gameplay and frees the cursor while open.

use bevy::app::AppExit;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions, PrimaryWindow};

use super::styles::*;
use crate::states::GameState;

pub struct PauseMenuPlugin;

impl Plugin for PauseMenuPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Paused), (spawn_pause_menu, free_cursor));
        app.add_systems(OnExit(GameState::Paused), despawn_pause_menu);
        app.add_systems(Update, toggle_pause);
        app.add_systems(Update, press_menu_entries.run_if(in_state(GameState::Paused)));
        app.add_systems(Update, lock_cursor_on_click.run_if(in_state(GameState::Playing)));
    }
}

#[derive(Component)]
struct PauseMenuRoot;

#[derive(Component, Clone, Copy, Debug)]
enum MenuEntry {
    Resume,
    Quit,
}

/// Buttons top to bottom.
const MENU_ENTRIES: [(MenuEntry, &str); 2] = [(MenuEntry::Resume, "RESUME"), (MenuEntry::Quit, "QUIT")];

fn spawn_pause_menu(mut commands: Commands) {
    let overlay = Node {
        width: Val::Percent(100.0),
        height: Val::Percent(100.0),
        flex_direction: FlexDirection::Column,
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        row_gap: Val::Px(8.0),
        ..default()
    };

    commands
        .spawn((PauseMenuRoot, overlay, BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6))))
        .with_children(|menu| {
            menu.spawn((Text::new("PAUSED"), title_text_style(), TextColor(TEXT_COLOR)));
            for (entry, label) in MENU_ENTRIES {
                menu.spawn((
                    Button,
                    entry,
                    button_style(),
                    BackgroundColor(BUTTON_NORMAL),
                    BorderColor::all(BUTTON_BORDER),
                    BorderRadius::all(Val::Px(4.0)),
                    children![(Text::new(label), button_text_style(), TextColor(TEXT_COLOR))],
                ));
            }
            menu.spawn((
                Text::new("Press ESC to resume"),
                TextFont::from_font_size(14.0),
                TextColor(TEXT_MUTED),
            ));
        });
}

fn despawn_pause_menu(mut commands: Commands, roots: Query<Entity, With<PauseMenuRoot>>) {
    for root in &roots {
        commands.entity(root).despawn();
    }
}

/// Escape flips between playing and paused.
fn toggle_pause(
    keyboard: Res<ButtonInput<KeyCode>>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if !keyboard.just_pressed(KeyCode::Escape) {
        return;
    }
    next_state.set(match state.get() {
        GameState::Playing => GameState::Paused,
        GameState::Paused => GameState::Playing,
    });
}

/// Hover/press tint, and run the entry once it is pressed.
fn press_menu_entries(
    mut entries: Query<(&Interaction, &MenuEntry, &mut BackgroundColor), Changed<Interaction>>,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: MessageWriter<AppExit>,
) {
    for (interaction, entry, mut background) in &mut entries {
        background.0 = match interaction {
            Interaction::Pressed => BUTTON_PRESSED,
            Interaction::Hovered => BUTTON_HOVERED,
            Interaction::None => BUTTON_NORMAL,
        };
        if *interaction != Interaction::Pressed {
            continue;
        }
        match entry {
            MenuEntry::Resume => next_state.set(GameState::Playing),
            MenuEntry::Quit => {
                info!("Quit selected from pause menu");
                exit.write(AppExit::Success);
            }
        }
    }
}

fn set_cursor_locked(cursor: &mut CursorOptions, locked: bool) {
    cursor.grab_mode = if locked {
        CursorGrabMode::Locked
    } else {
        CursorGrabMode::None
    };
    cursor.visible = !locked;
}

fn lock_cursor_on_click(
    mouse: Res<ButtonInput<MouseButton>>,
    mut cursor: Single<&mut CursorOptions, With<PrimaryWindow>>,
) {
    if mouse.just_pressed(MouseButton::Left) {
        set_cursor_locked(&mut **cursor, true);
    }
}

fn free_cursor(mut cursor: Single<&mut CursorOptions, With<PrimaryWindow>>) {
    set_cursor_locked(&mut **cursor, false);
}
