//! Player input handling
//!
//! Keyboard, mouse and gamepad are folded into one `ControlInput` per frame so the
//! gameplay systems never look at devices directly.

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use shared::{LookDevice, LookSample};

/// Sticks inside this radius count as released for look purposes.
const LOOK_STICK_DEADZONE: f32 = 0.1;

/// This frame's decoded controls.
#[derive(Resource, Default, Debug, Clone, PartialEq)]
pub struct ControlInput {
    /// x = strafe right, y = forward. Length at most 1.
    pub movement: Vec2,
    /// Look sample in +x right / +y up convention. `None` when nothing moved.
    pub look: Option<LookSample>,
    pub interact: bool,
    pub crouch: bool,
    pub sprint: bool,
}

/// Gather keyboard, mouse and gamepad into `ControlInput`.
pub fn gather_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    gamepads: Query<&Gamepad>,
    mut input: ResMut<ControlInput>,
) {
    let mut movement = Vec2::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        movement.y += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        movement.y -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        movement.x += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        movement.x -= 1.0;
    }

    let mut interact = keyboard.just_pressed(KeyCode::KeyE);
    let mut crouch =
        keyboard.just_pressed(KeyCode::KeyC) || keyboard.just_pressed(KeyCode::ControlLeft);
    let mut sprint = keyboard.just_pressed(KeyCode::ShiftLeft);

    let mut pointer = Vec2::ZERO;
    for motion in mouse_motion.read() {
        pointer += motion.delta;
    }
    // Screen space grows downward.
    let mut look = (pointer != Vec2::ZERO).then_some(LookSample {
        delta: Vec2::new(pointer.x, -pointer.y),
        device: LookDevice::Pointer,
    });

    for gamepad in gamepads.iter() {
        movement += gamepad.left_stick();
        interact |= gamepad.just_pressed(GamepadButton::South);
        crouch |= gamepad.just_pressed(GamepadButton::East);
        sprint |= gamepad.just_pressed(GamepadButton::LeftThumb);

        let stick = gamepad.right_stick();
        if look.is_none() && stick.length() > LOOK_STICK_DEADZONE {
            look = Some(LookSample {
                delta: stick,
                device: LookDevice::Gamepad,
            });
        }
    }

    *input = ControlInput {
        movement: movement.clamp_length_max(1.0),
        look,
        interact,
        crouch,
        sprint,
    };
}

/// Drop any held state so nothing leaks into the next `Playing` frame.
pub fn clear_input(mut input: ResMut<ControlInput>) {
    *input = ControlInput::default();
}
