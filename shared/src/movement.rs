//! First-person locomotion: ground sensing, crouching and movement integration.
//!
//! Frame order (see `Locomotion::step`):
//! 1. ground check (sphere cast below the feet)
//! 2. crouch blend (resizes the collider, keeps the feet planted)
//! 3. planar move
//! 4. gravity
//!
//! Collision response is left to the `CharacterMotor` implementation.

use bevy::prelude::*;

use crate::config::ControllerSettings;
use crate::physics::{CharacterMotor, PhysicsQuery};

/// Extra reach of the stand-up cast beyond the missing height.
const STAND_UP_MARGIN: f32 = 0.1;

/// The stand-up cast is slightly thinner than the body so walls don't block it.
const STAND_UP_RADIUS_SCALE: f32 = 0.9;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeedMode {
    Walk,
    Crouch,
    Sprint,
}

/// What a crouch toggle did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrouchToggle {
    Crouched,
    Stood,
    /// Something is above the head; still crouching.
    Blocked,
}

/// Collider height and camera offset for the current crouch blend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CrouchPose {
    pub height: f32,
    pub camera_y: f32,
    /// Vertical teleport that keeps the feet where they were.
    pub vertical_offset: f32,
}

/// Per-frame decoded movement input.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveInput {
    /// x = strafe right, y = forward. Each axis in [-1, 1].
    pub axis: Vec2,
    pub right: Vec3,
    pub forward: Vec3,
}

/// Locomotion state owned by the player entity.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct Locomotion {
    pub crouching: bool,
    pub sprinting: bool,
    pub vertical_velocity: f32,
    pub grounded: bool,
    /// 0 = standing, 1 = fully crouched.
    pub crouch_blend: f32,
    pub crouch_target: f32,
    pub height: f32,
}

impl Locomotion {
    pub fn new(settings: &ControllerSettings) -> Self {
        Self {
            crouching: false,
            sprinting: false,
            vertical_velocity: 0.0,
            grounded: false,
            crouch_blend: 0.0,
            crouch_target: 0.0,
            height: settings.standing_height,
        }
    }

    /// Crouch beats sprint beats walk.
    pub fn speed_mode(&self) -> SpeedMode {
        if self.crouching {
            SpeedMode::Crouch
        } else if self.sprinting {
            SpeedMode::Sprint
        } else {
            SpeedMode::Walk
        }
    }

    pub fn speed(&self, settings: &ControllerSettings) -> f32 {
        match self.speed_mode() {
            SpeedMode::Walk => settings.walk_speed,
            SpeedMode::Crouch => settings.crouch_speed,
            SpeedMode::Sprint => settings.sprint_speed,
        }
    }

    // -------------------------------------------------------------------------
    // Ground sensor
    // -------------------------------------------------------------------------

    /// Sphere-cast down from just above the feet and update `grounded`.
    pub fn ground_check(
        &mut self,
        settings: &ControllerSettings,
        position: Vec3,
        physics: &impl PhysicsQuery,
    ) -> bool {
        let origin = ground_check_origin(settings, position, self.height);
        self.grounded = physics
            .sphere_cast(
                origin,
                settings.ground_check_radius,
                Dir3::NEG_Y,
                settings.ground_check_distance,
                settings.ground_mask,
            )
            .is_some();

        if self.grounded && self.vertical_velocity < 0.0 {
            self.vertical_velocity = settings.grounded_bias;
        }
        self.grounded
    }

    // -------------------------------------------------------------------------
    // Crouch state machine
    // -------------------------------------------------------------------------

    pub fn toggle_crouch(
        &mut self,
        settings: &ControllerSettings,
        position: Vec3,
        physics: &impl PhysicsQuery,
    ) -> CrouchToggle {
        if !self.crouching {
            self.crouching = true;
            self.sprinting = false;
            self.crouch_target = 1.0;
            return CrouchToggle::Crouched;
        }

        if self.can_stand_up(settings, position, physics) {
            self.crouching = false;
            self.crouch_target = 0.0;
            CrouchToggle::Stood
        } else {
            CrouchToggle::Blocked
        }
    }

    /// Cast upward from the top of the collider for the height we'd regain by standing.
    pub fn can_stand_up(
        &self,
        settings: &ControllerSettings,
        position: Vec3,
        physics: &impl PhysicsQuery,
    ) -> bool {
        let blended = blended_height(settings, self.crouch_blend);
        let missing = settings.standing_height - blended;
        let head = position + Vec3::Y * (self.height * 0.5);
        physics
            .sphere_cast(
                head,
                settings.radius * STAND_UP_RADIUS_SCALE,
                Dir3::Y,
                missing + STAND_UP_MARGIN,
                settings.ground_mask,
            )
            .is_none()
    }

    /// Sprint is a toggle and does nothing while crouched.
    pub fn toggle_sprint(&mut self) -> bool {
        if !self.crouching {
            self.sprinting = !self.sprinting;
        }
        self.sprinting
    }

    /// Ease the crouch blend toward its target and derive height/camera offset.
    pub fn update_crouch(&mut self, settings: &ControllerSettings, dt: f32) -> CrouchPose {
        let t = (dt * settings.crouch_transition_speed).clamp(0.0, 1.0);
        self.crouch_blend = (self.crouch_blend + (self.crouch_target - self.crouch_blend) * t).clamp(0.0, 1.0);

        let height = blended_height(settings, self.crouch_blend);
        let camera_y = lerp(settings.standing_camera_y, settings.crouching_camera_y, self.crouch_blend);
        let vertical_offset = (height - self.height) * 0.5;
        self.height = height;

        CrouchPose {
            height,
            camera_y,
            vertical_offset,
        }
    }

    // -------------------------------------------------------------------------
    // Movement integrator
    // -------------------------------------------------------------------------

    pub fn planar_displacement(&self, settings: &ControllerSettings, input: &MoveInput, dt: f32) -> Vec3 {
        let direction = input.right * input.axis.x + input.forward * input.axis.y;
        direction * self.speed(settings) * dt
    }

    /// Accumulate gravity and return this frame's vertical displacement.
    pub fn apply_gravity(&mut self, settings: &ControllerSettings, dt: f32) -> Vec3 {
        self.vertical_velocity += settings.gravity * dt;
        Vec3::Y * (self.vertical_velocity * dt)
    }

    /// Run one full frame against the given physics world and character body.
    pub fn step(
        &mut self,
        settings: &ControllerSettings,
        input: &MoveInput,
        physics: &impl PhysicsQuery,
        motor: &mut impl CharacterMotor,
        dt: f32,
    ) -> CrouchPose {
        self.ground_check(settings, motor.position(), physics);

        let pose = self.update_crouch(settings, dt);
        motor.set_height(pose.height);
        motor.nudge(Vec3::Y * pose.vertical_offset);

        motor.move_and_slide(self.planar_displacement(settings, input, dt));
        let fall = self.apply_gravity(settings, dt);
        motor.move_and_slide(fall);

        pose
    }
}

/// Collider height for a crouch blend value.
pub fn blended_height(settings: &ControllerSettings, blend: f32) -> f32 {
    lerp(settings.standing_height, settings.crouch_height, blend)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Where the ground check starts for a character centered at `position`.
pub fn ground_check_origin(settings: &ControllerSettings, position: Vec3, height: f32) -> Vec3 {
    position - Vec3::Y * (height * 0.5 - settings.ground_check_radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::testing::{PlaneWorld, RecordingMotor};

    fn floor_entity() -> Entity {
        let mut world = World::new();
        world.spawn_empty().id()
    }

    fn standing_motor(settings: &ControllerSettings) -> RecordingMotor {
        RecordingMotor {
            // Collider center one half-height above a floor at y = 0.
            position: Vec3::Y * (settings.standing_height * 0.5),
            height: settings.standing_height,
            moves: Vec::new(),
        }
    }

    #[test]
    fn test_speed_precedence() {
        let settings = ControllerSettings::default();
        let mut loco = Locomotion::new(&settings);
        assert_eq!(loco.speed(&settings), settings.walk_speed);

        loco.toggle_sprint();
        assert_eq!(loco.speed_mode(), SpeedMode::Sprint);

        loco.crouching = true;
        assert_eq!(loco.speed_mode(), SpeedMode::Crouch);
        assert_eq!(loco.speed(&settings), settings.crouch_speed);
    }

    #[test]
    fn test_crouch_cancels_sprint_and_blocks_sprint_toggle() {
        let settings = ControllerSettings::default();
        let world = PlaneWorld::floor(floor_entity(), 0.0);
        let mut loco = Locomotion::new(&settings);

        loco.toggle_sprint();
        assert!(loco.sprinting);

        assert_eq!(loco.toggle_crouch(&settings, Vec3::Y, &world), CrouchToggle::Crouched);
        assert!(!loco.sprinting);
        assert!(!loco.toggle_sprint());
    }

    #[test]
    fn test_stand_up_blocked_by_ceiling() {
        let settings = ControllerSettings::default();
        // Ceiling at 1.5m: fine while crouched (1m), no room for standing (2m).
        let world = PlaneWorld::floor(floor_entity(), 0.0).with_ceiling(1.5);
        let mut loco = Locomotion::new(&settings);

        loco.toggle_crouch(&settings, Vec3::Y, &world);
        for _ in 0..120 {
            loco.update_crouch(&settings, 1.0 / 60.0);
        }
        let position = Vec3::Y * (loco.height * 0.5);
        let before = loco.clone();

        assert_eq!(loco.toggle_crouch(&settings, position, &world), CrouchToggle::Blocked);
        assert_eq!(loco, before);
    }

    #[test]
    fn test_stand_up_with_clearance() {
        let settings = ControllerSettings::default();
        let world = PlaneWorld::floor(floor_entity(), 0.0).with_ceiling(10.0);
        let mut loco = Locomotion::new(&settings);

        loco.toggle_crouch(&settings, Vec3::Y, &world);
        for _ in 0..120 {
            loco.update_crouch(&settings, 1.0 / 60.0);
        }
        let position = Vec3::Y * (loco.height * 0.5);
        assert_eq!(loco.toggle_crouch(&settings, position, &world), CrouchToggle::Stood);
        assert_eq!(loco.crouch_target, 0.0);
    }

    #[test]
    fn test_crouch_blend_stays_in_unit_range() {
        let settings = ControllerSettings::default();
        let world = PlaneWorld::floor(floor_entity(), 0.0);
        let mut loco = Locomotion::new(&settings);

        // Deterministic mix of tiny, huge, zero and negative frame times.
        let steps = [0.0, 1.0 / 144.0, 0.5, 3.0, -0.2, 1.0 / 30.0, 10.0];
        for i in 0..200 {
            if i % 7 == 0 {
                loco.toggle_crouch(&settings, Vec3::Y, &world);
            }
            let pose = loco.update_crouch(&settings, steps[i % steps.len()]);
            assert!((0.0..=1.0).contains(&loco.crouch_blend));
            assert!(pose.height >= settings.crouch_height - 1e-5);
            assert!(pose.height <= settings.standing_height + 1e-5);
        }
    }

    #[test]
    fn test_crouch_keeps_feet_planted() {
        let settings = ControllerSettings::default();
        let world = PlaneWorld::floor(floor_entity(), 0.0);
        let mut loco = Locomotion::new(&settings);
        let mut motor = standing_motor(&settings);

        loco.toggle_crouch(&settings, motor.position, &world);
        let pose = loco.step(&settings, &MoveInput::default(), &world, &mut motor, 1.0 / 60.0);

        assert!(pose.height < settings.standing_height);
        assert!((pose.vertical_offset - (pose.height - settings.standing_height) * 0.5).abs() < 1e-6);
        assert_eq!(motor.height, pose.height);
    }

    #[test]
    fn test_ground_check_applies_bias() {
        let settings = ControllerSettings::default();
        let world = PlaneWorld::floor(floor_entity(), 0.0);
        let mut loco = Locomotion::new(&settings);
        loco.vertical_velocity = -12.0;

        assert!(loco.ground_check(&settings, Vec3::Y, &world));
        assert_eq!(loco.vertical_velocity, settings.grounded_bias);

        // Rising: leave the velocity alone.
        loco.vertical_velocity = 3.0;
        loco.ground_check(&settings, Vec3::Y, &world);
        assert_eq!(loco.vertical_velocity, 3.0);
    }

    #[test]
    fn test_airborne_without_floor_in_reach() {
        let settings = ControllerSettings::default();
        let world = PlaneWorld::floor(floor_entity(), -50.0);
        let mut loco = Locomotion::new(&settings);
        loco.vertical_velocity = -1.0;

        assert!(!loco.ground_check(&settings, Vec3::Y, &world));
        assert_eq!(loco.vertical_velocity, -1.0);
    }

    #[test]
    fn test_step_moves_planar_then_vertical() {
        let settings = ControllerSettings::default();
        let world = PlaneWorld::floor(floor_entity(), -50.0);
        let mut loco = Locomotion::new(&settings);
        let mut motor = standing_motor(&settings);

        let input = MoveInput {
            axis: Vec2::new(0.0, 1.0),
            right: Vec3::X,
            forward: Vec3::NEG_Z,
        };
        let dt = 0.1;
        loco.step(&settings, &input, &world, &mut motor, dt);

        assert_eq!(motor.moves.len(), 2);
        let planar = motor.moves[0];
        assert!((planar - Vec3::NEG_Z * settings.walk_speed * dt).length() < 1e-5);
        let fall = motor.moves[1];
        assert!((fall.y - settings.gravity * dt * dt).abs() < 1e-5);
        assert_eq!(fall.x, 0.0);
    }
}
