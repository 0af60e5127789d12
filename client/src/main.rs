//! Doorstep - first-person walk-through with interactive doors
//!
//! Built on Bevy 0.17 / bevy_rapier3d 0.32

mod audio;
mod camera;
mod crosshair;
mod debug;
mod input;
mod interaction;
mod level;
mod physics;
mod player;
mod states;
mod ui;

use std::path::{Path, PathBuf};

use bevy::asset::AssetPlugin;
use bevy::audio::{AudioPlugin, SpatialScale};
use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier3d::prelude::*;
use shared::{load_config_from_file, DoorPlugin, DoorSystems, GameConfig};
use states::GameState;

/// Config file location inside the asset directory.
const CONFIG_FILE: &str = "config/game.ron";

/// Get the asset path - for bundled macOS apps, use path relative to executable
fn get_asset_path() -> String {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let bundled_assets = exe_dir.join("assets");
            if bundled_assets.exists() {
                return bundled_assets.to_string_lossy().to_string();
            }
        }
    }
    // Fall back to default "assets" folder (for development)
    "assets".to_string()
}

/// Where the asset directory actually lives on disk. Bevy resolves relative asset
/// paths against the crate root under `cargo run`, so we do the same.
fn resolve_asset_dir(asset_path: &str) -> PathBuf {
    let path = PathBuf::from(asset_path);
    if path.is_absolute() {
        return path;
    }
    match std::env::var_os("CARGO_MANIFEST_DIR") {
        Some(root) => PathBuf::from(root).join(path),
        None => path,
    }
}

/// How the config was obtained, reported once logging is up.
#[derive(Resource)]
struct ConfigReport {
    path: PathBuf,
    error: Option<String>,
}

fn load_game_config(asset_dir: &Path) -> (GameConfig, ConfigReport) {
    let path = asset_dir.join(CONFIG_FILE);
    match load_config_from_file(&path) {
        Ok(config) => (config, ConfigReport { path, error: None }),
        Err(e) => (GameConfig::default(), ConfigReport { path, error: Some(e) }),
    }
}

fn report_config(report: Res<ConfigReport>) {
    match &report.error {
        None => info!("Loaded game config from {:?}", report.path),
        Some(e) => warn!("Config error ({e}); falling back to defaults"),
    }
}

fn main() {
    let asset_path = get_asset_path();
    let asset_dir = resolve_asset_dir(&asset_path);
    let (config, report) = load_game_config(&asset_dir);

    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Doorstep".to_string(),
                    resolution: WindowResolution::new(1280, 720),
                    ..default()
                }),
                ..default()
            })
            .set(AssetPlugin {
                file_path: asset_path,
                ..default()
            })
            // World units are meters; scale distances down so door sounds stay audible.
            .set(AudioPlugin {
                default_spatial_scale: SpatialScale::new(0.2),
                ..default()
            }),
    );

    app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default());

    app.insert_resource(config);
    app.insert_resource(report);
    app.insert_resource(audio::AssetDir(asset_dir));
    app.init_state::<GameState>();
    app.init_resource::<input::ControlInput>();

    // Door behavior, audio, prompt and menus
    app.add_plugins(DoorPlugin);
    // Swings freeze while the pause menu is up.
    app.configure_sets(Update, DoorSystems.run_if(in_state(GameState::Playing)));
    app.add_plugins(audio::DoorAudioPlugin);
    app.add_plugins(interaction::InteractionPlugin);
    app.add_plugins(ui::PauseMenuPlugin);

    app.add_systems(
        Startup,
        (
            report_config,
            level::spawn_level,
            player::spawn_player,
            debug::init_debug_draw,
        ),
    );

    app.add_systems(OnEnter(GameState::Playing), crosshair::spawn_crosshair);
    app.add_systems(
        OnExit(GameState::Playing),
        (crosshair::despawn_crosshair, input::clear_input),
    );

    // ORDER MATTERS: input -> look -> movement -> scanner -> door interaction (DoorSystems).
    app.add_systems(
        Update,
        (
            input::gather_input,
            camera::update_look,
            player::handle_stance_toggles,
            player::move_player,
            interaction::scan_for_doors,
            interaction::show_interaction_prompt,
            interaction::handle_interact_input,
        )
            .chain()
            .before(DoorSystems)
            .run_if(in_state(GameState::Playing)),
    );

    app.add_systems(
        Update,
        (
            crosshair::update_crosshair_target.after(interaction::scan_for_doors),
            debug::toggle_debug_draw,
            debug::draw_debug_gizmos,
        )
            .run_if(in_state(GameState::Playing)),
    );

    info!("Starting Doorstep");
    app.run();
}
