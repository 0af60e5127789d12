//! Game tuning loaded from `assets/config/game.ron`.
//!
//! Every section has defaults, so a missing or broken file never stops the game; the
//! client logs the error and carries on with `GameConfig::default()`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::physics::CollisionMask;
use crate::tween::Ease;

/// Current config format version.
pub const CONFIG_VERSION: u32 = 1;

/// Movement, ground sensing and crouch tuning. Distances in meters, speeds in m/s.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerSettings {
    pub walk_speed: f32,
    pub crouch_speed: f32,
    pub sprint_speed: f32,
    /// Vertical acceleration (negative is down).
    pub gravity: f32,
    /// Vertical velocity forced while standing on ground.
    pub grounded_bias: f32,
    pub radius: f32,
    pub ground_check_radius: f32,
    pub ground_check_distance: f32,
    pub ground_mask: CollisionMask,
    pub standing_height: f32,
    pub crouch_height: f32,
    /// How quickly the crouch blend chases its target (per second).
    pub crouch_transition_speed: f32,
    /// Camera height above the collider center.
    pub standing_camera_y: f32,
    pub crouching_camera_y: f32,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            walk_speed: 5.0,
            crouch_speed: 2.5,
            sprint_speed: 8.0,
            gravity: -9.81,
            grounded_bias: -2.0,
            radius: 0.4,
            ground_check_radius: 0.4,
            ground_check_distance: 0.5,
            ground_mask: CollisionMask::WORLD.union(CollisionMask::DOOR),
            standing_height: 2.0,
            crouch_height: 1.0,
            crouch_transition_speed: 8.0,
            standing_camera_y: 0.7,
            crouching_camera_y: 0.2,
        }
    }
}

/// Mouse/gamepad look tuning. Angles in degrees.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookSettings {
    /// Degrees per second per pixel of pointer motion per frame.
    pub pointer_sensitivity: f32,
    /// Degrees per second at full stick deflection.
    pub gamepad_sensitivity: f32,
    /// Smooth-damp time constant in seconds. Zero disables smoothing.
    pub smooth_time: f32,
    /// Largest change of the smoothed look vector allowed in one frame.
    pub max_delta: Option<f32>,
    pub vertical_clamp: f32,
}

impl Default for LookSettings {
    fn default() -> Self {
        Self {
            pointer_sensitivity: 8.0,
            gamepad_sensitivity: 150.0,
            smooth_time: 0.03,
            max_delta: Some(2000.0),
            vertical_clamp: 60.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    pub interaction_distance: f32,
    pub door_mask: CollisionMask,
    pub prompt_text: String,
    /// Draw the interaction ray and ground check with gizmos.
    pub debug_draw: bool,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            interaction_distance: 3.0,
            door_mask: CollisionMask::DOOR,
            prompt_text: "Press [E] to use door".to_string(),
            debug_draw: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoorSettings {
    pub animation_duration: f32,
    pub ease: Ease,
}

impl Default for DoorSettings {
    fn default() -> Self {
        Self {
            animation_duration: 1.0,
            ease: Ease::InOutQuad,
        }
    }
}

/// Asset paths for door sounds. `None` means the door is silent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub door_open: Option<String>,
    pub door_close: Option<String>,
    pub volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            door_open: Some("audio/sfx/door_open.ogg".to_string()),
            door_close: Some("audio/sfx/door_close.ogg".to_string()),
            volume: 0.8,
        }
    }
}

#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub version: u32,
    pub controller: ControllerSettings,
    pub look: LookSettings,
    pub interaction: InteractionSettings,
    pub door: DoorSettings,
    pub audio: AudioSettings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            controller: ControllerSettings::default(),
            look: LookSettings::default(),
            interaction: InteractionSettings::default(),
            door: DoorSettings::default(),
            audio: AudioSettings::default(),
        }
    }
}

/// Parse a config from RON text.
pub fn load_config_from_str(text: &str) -> Result<GameConfig, String> {
    let config: GameConfig =
        ron::from_str(text).map_err(|e| format!("RON parse failed: {e}"))?;
    if config.version != CONFIG_VERSION {
        return Err(format!(
            "Unsupported GameConfig version {} (expected {CONFIG_VERSION})",
            config.version
        ));
    }
    validate(&config)?;
    Ok(config)
}

/// Load a config from a file path.
pub fn load_config_from_file(path: impl AsRef<Path>) -> Result<GameConfig, String> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| format!("failed to read {path:?}: {e}"))?;
    load_config_from_str(&text)
}

fn validate(config: &GameConfig) -> Result<(), String> {
    let c = &config.controller;
    if c.crouch_height <= 0.0 || c.crouch_height > c.standing_height {
        return Err(format!(
            "crouch_height {} must be in (0, standing_height {}]",
            c.crouch_height, c.standing_height
        ));
    }
    if c.radius <= 0.0 || c.radius * 2.0 > c.crouch_height {
        return Err(format!(
            "radius {} does not fit a {}m crouched capsule",
            c.radius, c.crouch_height
        ));
    }
    if config.look.vertical_clamp < 0.0 || config.look.vertical_clamp > 90.0 {
        return Err(format!(
            "vertical_clamp {} must be within [0, 90] degrees",
            config.look.vertical_clamp
        ));
    }
    if let Some(max_delta) = config.look.max_delta {
        if max_delta < 0.0 {
            return Err(format!("look max_delta {max_delta} must not be negative"));
        }
    }
    if config.door.animation_duration < 0.0 {
        return Err("door animation_duration must not be negative".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHIPPED: &str = include_str!("../../client/assets/config/game.ron");

    #[test]
    fn test_shipped_config_parses() {
        let config = load_config_from_str(SHIPPED).expect("shipped config should load");
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.controller.walk_speed, 5.0);
        assert_eq!(config.look.vertical_clamp, 60.0);
        assert_eq!(config.door.ease, Ease::InOutQuad);
        assert_eq!(config.interaction.door_mask, CollisionMask::DOOR);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = load_config_from_str("(version: 1, door: (animation_duration: 0.5))").unwrap();
        assert_eq!(config.door.animation_duration, 0.5);
        assert_eq!(config.door.ease, Ease::InOutQuad);
        assert_eq!(config.controller, ControllerSettings::default());
    }

    #[test]
    fn test_rejects_unknown_version() {
        let err = load_config_from_str("(version: 7)").unwrap_err();
        assert!(err.contains("version 7"));
    }

    #[test]
    fn test_rejects_inverted_crouch_height() {
        let err = load_config_from_str(
            "(version: 1, controller: (standing_height: 1.0, crouch_height: 1.5))",
        )
        .unwrap_err();
        assert!(err.contains("crouch_height"));
    }

    #[test]
    fn test_rejects_negative_max_delta() {
        let err = load_config_from_str(
            "(version: 1, look: (max_delta: Some(-10.0), smooth_time: 0.0, pointer_sensitivity: 1.0))",
        )
        .unwrap_err();
        assert!(err.contains("max_delta"));

        let config = load_config_from_str("(version: 1, look: (max_delta: Some(0.0)))").unwrap();
        assert_eq!(config.look.max_delta, Some(0.0));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_config_from_file("/definitely/not/here.ron").is_err());
    }
}
