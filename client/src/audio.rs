//! Door sounds
//!
//! One-shot spatial clips played from the door that emitted the cue.

use std::path::PathBuf;

use bevy::audio::Volume;
use bevy::prelude::*;
use shared::{DoorCue, DoorSound, DoorSystems, GameConfig};

/// On-disk asset directory, used to skip clips that were never shipped.
#[derive(Resource, Clone, Debug)]
pub struct AssetDir(pub PathBuf);

/// Loaded door clips. A missing path leaves that cue silent.
#[derive(Resource, Default)]
pub struct DoorAudio {
    pub open: Option<Handle<AudioSource>>,
    pub close: Option<Handle<AudioSource>>,
    pub volume: f32,
}

impl DoorAudio {
    fn clip(&self, cue: DoorCue) -> Option<&Handle<AudioSource>> {
        match cue {
            DoorCue::Open => self.open.as_ref(),
            DoorCue::Close => self.close.as_ref(),
        }
    }
}

/// Marker for one-shot door sound entities
#[derive(Component)]
pub struct DoorSoundEmitter;

fn load_clip(
    asset_server: &AssetServer,
    asset_dir: Option<&AssetDir>,
    path: Option<&String>,
) -> Option<Handle<AudioSource>> {
    let path = path?;
    if let Some(dir) = asset_dir {
        if !dir.0.join(path).exists() {
            warn!("Door sound {path:?} not found under {:?}; cue will be silent", dir.0);
            return None;
        }
    }
    Some(asset_server.load(path.clone()))
}

/// Load the clips named in the config.
pub fn setup_door_audio(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    asset_dir: Option<Res<AssetDir>>,
    config: Res<GameConfig>,
) {
    let audio = &config.audio;
    let asset_dir = asset_dir.as_deref();
    let open = load_clip(&asset_server, asset_dir, audio.door_open.as_ref());
    let close = load_clip(&asset_server, asset_dir, audio.door_close.as_ref());

    info!(
        "Door audio: open={}, close={}",
        open.is_some(),
        close.is_some()
    );

    commands.insert_resource(DoorAudio {
        open,
        close,
        volume: audio.volume,
    });
}

/// Spawn a spatial one-shot under each door that asked for a sound.
pub fn play_door_sounds(
    mut commands: Commands,
    mut cues: MessageReader<DoorSound>,
    audio: Option<Res<DoorAudio>>,
    mut warned_missing: Local<bool>,
) {
    let Some(audio) = audio else {
        cues.clear();
        return;
    };

    for cue in cues.read() {
        let Some(clip) = audio.clip(cue.cue) else {
            continue;
        };
        let Ok(mut emitter) = commands.get_entity(cue.emitter) else {
            if !*warned_missing {
                warn!("Door sound emitter {} no longer exists", cue.emitter);
                *warned_missing = true;
            }
            continue;
        };
        emitter.with_child((
            DoorSoundEmitter,
            AudioPlayer::new(clip.clone()),
            PlaybackSettings::DESPAWN
                .with_spatial(true)
                .with_volume(Volume::Linear(audio.volume)),
            Transform::default(),
        ));
    }
}

/// Audio plugin
pub struct DoorAudioPlugin;

impl Plugin for DoorAudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_door_audio);
        app.add_systems(Update, play_door_sounds.after(DoorSystems));
    }
}
