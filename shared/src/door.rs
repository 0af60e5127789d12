//! Hinged doors and double doors.
//!
//! A `Door` swings 90 degrees around its local Y axis between a closed yaw (captured from
//! its transform when it spawns) and an open yaw. A `DoubleDoor` owns two leaf doors and
//! keeps both leaves in agreement with its own open flag. Leaves never point back at the
//! composite.
//!
//! All angles here are yaw in degrees.

use bevy::prelude::*;

use crate::config::DoorSettings;
use crate::tween::{DoorTweens, Ease, TweenHandle, TweenService, TweenStep};

/// How far a leaf swings from closed to open.
pub const DOOR_SWING_DEGREES: f32 = 90.0;

/// Which sound a door should play.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoorCue {
    Open,
    Close,
}

impl DoorCue {
    pub fn for_state(open: bool) -> Self {
        if open {
            DoorCue::Open
        } else {
            DoorCue::Close
        }
    }
}

/// Request to interact with a door or double door entity.
#[derive(Message, Clone, Copy, Debug)]
pub struct DoorInteract {
    pub target: Entity,
}

/// A door started moving and wants its sound played.
#[derive(Message, Clone, Copy, Debug)]
pub struct DoorSound {
    pub emitter: Entity,
    pub cue: DoorCue,
}

/// A door's swing animation ran to completion.
#[derive(Message, Clone, Copy, Debug)]
pub struct DoorSettled {
    pub door: Entity,
    pub open: bool,
}

/// Outcome of toggling a single door.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoorToggle {
    pub open: bool,
    pub target_yaw: f32,
    pub cue: DoorCue,
}

// =============================================================================
// SINGLE DOOR
// =============================================================================

#[derive(Component, Clone, Debug)]
pub struct Door {
    pub is_open: bool,
    /// Swing toward +90 degrees when opening (otherwise -90).
    pub rotate_positive: bool,
    /// Seconds per swing.
    pub animation_duration: f32,
    pub ease: Ease,
    closed_yaw: f32,
    open_yaw: f32,
    yaw: f32,
    tween: Option<TweenHandle>,
}

impl Default for Door {
    fn default() -> Self {
        Self::new(&DoorSettings::default())
    }
}

impl Door {
    pub fn new(settings: &DoorSettings) -> Self {
        Self {
            is_open: false,
            rotate_positive: true,
            animation_duration: settings.animation_duration,
            ease: settings.ease,
            closed_yaw: 0.0,
            open_yaw: DOOR_SWING_DEGREES,
            yaw: 0.0,
            tween: None,
        }
    }

    pub fn with_rotate_positive(mut self, rotate_positive: bool) -> Self {
        self.rotate_positive = rotate_positive;
        self.open_yaw = self.compute_open_yaw();
        self
    }

    /// Record the spawn yaw as the closed position.
    pub fn capture_rest_pose(&mut self, yaw: f32) {
        self.closed_yaw = yaw;
        self.yaw = yaw;
        self.open_yaw = self.compute_open_yaw();
    }

    pub fn closed_yaw(&self) -> f32 {
        self.closed_yaw
    }

    pub fn open_yaw(&self) -> f32 {
        self.open_yaw
    }

    /// Where the hinge is right now (mid-swing while animating).
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// The endpoint the door is heading for (or resting at).
    pub fn target_yaw(&self) -> f32 {
        if self.is_open {
            self.open_yaw
        } else {
            self.closed_yaw
        }
    }

    pub fn tween(&self) -> Option<TweenHandle> {
        self.tween
    }

    fn compute_open_yaw(&self) -> f32 {
        if self.rotate_positive {
            self.closed_yaw + DOOR_SWING_DEGREES
        } else {
            self.closed_yaw - DOOR_SWING_DEGREES
        }
    }

    /// Flip between open and closed, replacing any swing already in flight.
    pub fn toggle(&mut self, entity: Entity, tweens: &mut impl TweenService) -> DoorToggle {
        if let Some(handle) = self.tween.take() {
            if tweens.is_active(handle) {
                tweens.cancel(handle);
            }
        }

        // rotate_positive may have been changed since the last swing.
        self.open_yaw = self.compute_open_yaw();
        self.is_open = !self.is_open;

        let target_yaw = self.target_yaw();
        self.tween = Some(tweens.start(
            entity,
            self.yaw,
            target_yaw,
            self.animation_duration,
            self.ease,
        ));

        debug!(
            "Door {entity} is now {}",
            if self.is_open { "open" } else { "closed" }
        );

        DoorToggle {
            open: self.is_open,
            target_yaw,
            cue: DoorCue::for_state(self.is_open),
        }
    }

    pub fn interact(&mut self, entity: Entity, tweens: &mut impl TweenService) -> DoorToggle {
        self.toggle(entity, tweens)
    }

    /// Toggle only if the door disagrees with `open`.
    pub fn match_state(
        &mut self,
        open: bool,
        entity: Entity,
        tweens: &mut impl TweenService,
    ) -> Option<DoorToggle> {
        (self.is_open != open).then(|| self.toggle(entity, tweens))
    }

    /// Apply one frame of this door's tween. Returns `true` when the swing just settled.
    pub fn apply_step(&mut self, step: &TweenStep) -> bool {
        if self.tween != Some(step.handle) {
            return false;
        }
        self.yaw = step.value;
        if step.finished {
            self.tween = None;
        }
        step.finished
    }
}

// =============================================================================
// DOUBLE DOOR
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoorSide {
    Left,
    Right,
}

impl DoorSide {
    fn label(self) -> &'static str {
        match self {
            DoorSide::Left => "left",
            DoorSide::Right => "right",
        }
    }
}

/// Outcome of toggling a double door.
#[derive(Clone, Debug, PartialEq)]
pub struct DoubleDoorToggle {
    pub open: bool,
    pub cue: DoorCue,
    /// Leaves that actually had to move to match.
    pub leaves: Vec<(Entity, DoorToggle)>,
}

#[derive(Component, Clone, Debug)]
pub struct DoubleDoor {
    pub is_open: bool,
    pub animation_duration: f32,
    pub ease: Ease,
    pub left: Option<Entity>,
    pub right: Option<Entity>,
    needs_configure: bool,
}

impl DoubleDoor {
    pub fn new(left: Option<Entity>, right: Option<Entity>, settings: &DoorSettings) -> Self {
        Self {
            is_open: false,
            animation_duration: settings.animation_duration,
            ease: settings.ease,
            left,
            right,
            needs_configure: true,
        }
    }

    /// Swap in new leaf references. They are configured before the next toggle.
    pub fn set_doors(&mut self, left: Option<Entity>, right: Option<Entity>) {
        self.left = left;
        self.right = right;
        self.needs_configure = true;
        info!("Double door leaves set (left={left:?}, right={right:?})");
    }

    pub fn needs_configure(&self) -> bool {
        self.needs_configure
    }

    pub fn mark_configured(&mut self) {
        self.needs_configure = false;
    }

    pub fn leaf(&self, side: DoorSide) -> Option<Entity> {
        match side {
            DoorSide::Left => self.left,
            DoorSide::Right => self.right,
        }
    }

    /// Left swings negative, right swings positive, both share our timing.
    pub fn configure_leaf(&self, side: DoorSide, leaf: &mut Door) {
        leaf.rotate_positive = side == DoorSide::Right;
        leaf.animation_duration = self.animation_duration;
        leaf.ease = self.ease;
    }

    fn begin_toggle(&mut self) -> bool {
        self.is_open = !self.is_open;
        self.is_open
    }

    /// Drive one leaf to agree with the composite. A missing leaf only warns.
    fn sync_leaf(
        &self,
        side: DoorSide,
        leaf: Option<&mut Door>,
        tweens: &mut impl TweenService,
    ) -> Option<(Entity, DoorToggle)> {
        let (Some(entity), Some(leaf)) = (self.leaf(side), leaf) else {
            warn!("Double door {} leaf reference is missing", side.label());
            return None;
        };
        leaf.match_state(self.is_open, entity, tweens)
            .map(|toggle| (entity, toggle))
    }

    /// Toggle the composite and bring both leaves along.
    pub fn toggle(
        &mut self,
        mut left: Option<&mut Door>,
        mut right: Option<&mut Door>,
        tweens: &mut impl TweenService,
    ) -> DoubleDoorToggle {
        if self.needs_configure {
            if let Some(leaf) = left.as_deref_mut() {
                self.configure_leaf(DoorSide::Left, leaf);
            }
            if let Some(leaf) = right.as_deref_mut() {
                self.configure_leaf(DoorSide::Right, leaf);
            }
            self.needs_configure = false;
        }

        let open = self.begin_toggle();
        let leaves = [
            self.sync_leaf(DoorSide::Left, left, tweens),
            self.sync_leaf(DoorSide::Right, right, tweens),
        ]
        .into_iter()
        .flatten()
        .collect();

        DoubleDoorToggle {
            open,
            cue: DoorCue::for_state(open),
            leaves,
        }
    }

    pub fn interact(
        &mut self,
        left: Option<&mut Door>,
        right: Option<&mut Door>,
        tweens: &mut impl TweenService,
    ) -> DoubleDoorToggle {
        self.toggle(left, right, tweens)
    }
}

// =============================================================================
// SYSTEMS
// =============================================================================

/// Door animation and interaction handling.
pub struct DoorPlugin;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct DoorSystems;

impl Plugin for DoorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DoorTweens>();
        app.add_message::<DoorInteract>();
        app.add_message::<DoorSound>();
        app.add_message::<DoorSettled>();

        app.add_systems(
            Update,
            (
                capture_door_rest_pose,
                configure_double_doors,
                handle_door_interactions,
                advance_door_tweens,
            )
                .chain()
                .in_set(DoorSystems),
        );
    }
}

fn yaw_degrees(rotation: Quat) -> f32 {
    let (yaw, _, _) = rotation.to_euler(EulerRot::YXZ);
    yaw.to_degrees()
}

/// The spawn rotation of a door is its closed position.
pub fn capture_door_rest_pose(mut doors: Query<(&mut Door, &Transform), Added<Door>>) {
    for (mut door, transform) in doors.iter_mut() {
        door.capture_rest_pose(yaw_degrees(transform.rotation));
    }
}

pub fn configure_double_doors(
    mut doubles: Query<(Entity, &mut DoubleDoor)>,
    mut doors: Query<&mut Door>,
) {
    for (entity, mut double) in doubles.iter_mut() {
        if !double.needs_configure() {
            continue;
        }
        for side in [DoorSide::Left, DoorSide::Right] {
            if let Some(mut leaf) = double.leaf(side).and_then(|e| doors.get_mut(e).ok()) {
                double.configure_leaf(side, &mut leaf);
            }
        }
        double.mark_configured();
        debug!("Configured double door {entity}");
    }
}

pub fn handle_door_interactions(
    mut requests: MessageReader<DoorInteract>,
    mut doors: Query<&mut Door>,
    mut doubles: Query<&mut DoubleDoor>,
    mut tweens: ResMut<DoorTweens>,
    mut sounds: MessageWriter<DoorSound>,
) {
    for request in requests.read() {
        let target = request.target;

        if let Ok(mut double) = doubles.get_mut(target) {
            let outcome = toggle_double_door(&mut double, &mut doors, &mut tweens);
            for (leaf, toggle) in &outcome.leaves {
                sounds.write(DoorSound {
                    emitter: *leaf,
                    cue: toggle.cue,
                });
            }
            sounds.write(DoorSound {
                emitter: target,
                cue: outcome.cue,
            });
            info!(
                "Double door {target} {}",
                if outcome.open { "opening" } else { "closing" }
            );
            continue;
        }

        if let Ok(mut door) = doors.get_mut(target) {
            let toggle = door.interact(target, &mut *tweens);
            sounds.write(DoorSound {
                emitter: target,
                cue: toggle.cue,
            });
            continue;
        }

        warn!("Interact requested on {target}, which has no door behavior");
    }
}

/// Borrow whichever leaves exist and run the composite toggle on them.
fn toggle_double_door(
    double: &mut DoubleDoor,
    doors: &mut Query<&mut Door>,
    tweens: &mut DoorTweens,
) -> DoubleDoorToggle {
    if let (Some(left), Some(right)) = (double.left, double.right) {
        if left != right {
            if let Ok([mut left, mut right]) = doors.get_many_mut([left, right]) {
                return double.toggle(Some(&mut *left), Some(&mut *right), tweens);
            }
        }
    }

    // At most one leaf is usable from here on.
    let single = [double.left, double.right]
        .into_iter()
        .flatten()
        .find(|&leaf| doors.contains(leaf));
    let is_left = single.is_some() && single == double.left;
    let mut leaf = single.and_then(|entity| doors.get_mut(entity).ok());
    if is_left {
        double.toggle(leaf.as_deref_mut(), None, tweens)
    } else {
        double.toggle(None, leaf.as_deref_mut(), tweens)
    }
}

pub fn advance_door_tweens(
    time: Res<Time>,
    mut tweens: ResMut<DoorTweens>,
    mut doors: Query<(&mut Door, &mut Transform)>,
    mut settled: MessageWriter<DoorSettled>,
) {
    if tweens.is_empty() {
        return;
    }

    for step in tweens.tick(time.delta_secs()) {
        let Ok((mut door, mut transform)) = doors.get_mut(step.target) else {
            continue;
        };
        if door.apply_step(&step) {
            settled.write(DoorSettled {
                door: step.target,
                open: door.is_open,
            });
        }
        let (_, pitch, roll) = transform.rotation.to_euler(EulerRot::YXZ);
        transform.rotation = Quat::from_euler(EulerRot::YXZ, door.yaw().to_radians(), pitch, roll);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    fn spawn_entities<const N: usize>() -> [Entity; N] {
        let mut world = World::new();
        std::array::from_fn(|_| world.spawn_empty().id())
    }

    #[test]
    fn test_toggle_parity() {
        let [entity] = spawn_entities::<1>();
        let mut tweens = DoorTweens::default();
        let mut door = Door::default();

        for n in 1..=9 {
            door.toggle(entity, &mut tweens);
            assert_eq!(door.is_open, n % 2 == 1);
            let target = door.target_yaw();
            assert!(target == door.closed_yaw() || target == door.open_yaw());
        }
    }

    #[test]
    fn test_toggle_scenario_open_then_close() {
        let [entity] = spawn_entities::<1>();
        let mut tweens = DoorTweens::default();
        let mut door = Door::default().with_rotate_positive(true);
        door.capture_rest_pose(0.0);

        let first = door.toggle(entity, &mut tweens);
        assert_eq!(first.target_yaw, 90.0);
        assert!(first.open);
        assert_eq!(first.cue, DoorCue::Open);
        let first_handle = door.tween().unwrap();

        // Halfway through the swing, toggle again.
        for step in tweens.tick(0.5) {
            door.apply_step(&step);
        }
        assert!(door.yaw() > 0.0 && door.yaw() < 90.0);

        let second = door.toggle(entity, &mut tweens);
        assert_eq!(second.target_yaw, 0.0);
        assert!(!second.open);
        assert_eq!(second.cue, DoorCue::Close);
        assert!(!tweens.is_active(first_handle));
        assert_eq!(tweens.len(), 1);
    }

    #[test]
    fn test_negative_swing_and_rest_pose() {
        let [entity] = spawn_entities::<1>();
        let mut tweens = DoorTweens::default();
        let mut door = Door::default().with_rotate_positive(false);
        door.capture_rest_pose(30.0);

        let toggle = door.toggle(entity, &mut tweens);
        assert_eq!(toggle.target_yaw, -60.0);

        // Flipping the direction takes effect on the next toggle.
        door.rotate_positive = true;
        door.toggle(entity, &mut tweens);
        let toggle = door.toggle(entity, &mut tweens);
        assert_eq!(toggle.target_yaw, 120.0);
    }

    #[test]
    fn test_swing_settles_on_endpoint() {
        let [entity] = spawn_entities::<1>();
        let mut tweens = DoorTweens::default();
        let mut door = Door::default();
        door.toggle(entity, &mut tweens);

        let mut settled = false;
        for _ in 0..20 {
            for step in tweens.tick(0.1) {
                settled |= door.apply_step(&step);
            }
        }
        assert!(settled);
        assert_eq!(door.yaw(), door.open_yaw());
        assert!(door.tween().is_none());
    }

    #[test]
    fn test_double_door_converges_from_desync() {
        let [left_e, right_e] = spawn_entities::<2>();
        let mut tweens = DoorTweens::default();
        let settings = DoorSettings::default();

        let mut left = Door::new(&settings);
        let mut right = Door::new(&settings);
        // Right leaf was opened on its own.
        right.toggle(right_e, &mut tweens);

        let mut double = DoubleDoor::new(Some(left_e), Some(right_e), &settings);
        let outcome = double.toggle(Some(&mut left), Some(&mut right), &mut tweens);

        assert!(outcome.open);
        assert_eq!(outcome.cue, DoorCue::Open);
        assert!(left.is_open && right.is_open);
        // Only the left leaf had to move.
        assert_eq!(outcome.leaves.len(), 1);
        assert_eq!(outcome.leaves[0].0, left_e);

        // Configuration made the leaves swing in opposite directions.
        assert!(!left.rotate_positive);
        assert!(right.rotate_positive);

        for _ in 0..5 {
            double.toggle(Some(&mut left), Some(&mut right), &mut tweens);
            assert_eq!(left.is_open, right.is_open);
            assert_eq!(left.is_open, double.is_open);
        }
    }

    #[test]
    fn test_double_door_missing_leaf_still_toggles_other() {
        let [right_e] = spawn_entities::<1>();
        let mut tweens = DoorTweens::default();
        let settings = DoorSettings::default();

        let mut right = Door::new(&settings);
        let mut double = DoubleDoor::new(None, Some(right_e), &settings);

        let outcome = double.interact(None, Some(&mut right), &mut tweens);
        assert!(outcome.open);
        assert!(right.is_open);
        assert_eq!(outcome.leaves.len(), 1);
    }

    #[test]
    fn test_set_doors_requests_reconfigure() {
        let [a, b] = spawn_entities::<2>();
        let settings = DoorSettings::default();
        let mut double = DoubleDoor::new(None, None, &settings);
        double.mark_configured();

        double.set_doors(Some(a), Some(b));
        assert!(double.needs_configure());
        assert_eq!(double.leaf(DoorSide::Left), Some(a));
        assert_eq!(double.leaf(DoorSide::Right), Some(b));
    }

    #[test]
    fn test_door_plugin_swings_door_open() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
        app.add_plugins(DoorPlugin);

        let door = app
            .world_mut()
            .spawn((Door::default(), Transform::default()))
            .id();
        app.update();

        app.world_mut().write_message(DoorInteract { target: door });
        for _ in 0..30 {
            app.update();
        }

        let door_state = app.world().get::<Door>(door).unwrap();
        assert!(door_state.is_open);
        assert!(door_state.tween().is_none());
        assert!((door_state.yaw() - 90.0).abs() < 1e-3);

        let transform = app.world().get::<Transform>(door).unwrap();
        assert!((yaw_degrees(transform.rotation) - 90.0).abs() < 1e-2);
    }

    #[derive(Resource, Default)]
    struct HeardCues(Vec<(Entity, DoorCue)>);

    fn collect_cues(mut sounds: MessageReader<DoorSound>, mut heard: ResMut<HeardCues>) {
        heard.0.extend(sounds.read().map(|sound| (sound.emitter, sound.cue)));
    }

    fn door_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
        app.add_plugins(DoorPlugin);
        app.init_resource::<HeardCues>();
        app.add_systems(Update, collect_cues.after(DoorSystems));
        app
    }

    #[test]
    fn test_double_door_interact_syncs_desynced_leaves() {
        let mut app = door_app();
        let settings = DoorSettings::default();

        let left = app
            .world_mut()
            .spawn((Door::new(&settings), Transform::default()))
            .id();
        let right = app
            .world_mut()
            .spawn((Door::new(&settings), Transform::default()))
            .id();
        let double = app
            .world_mut()
            .spawn(DoubleDoor::new(Some(left), Some(right), &settings))
            .id();
        app.update();

        // Open the right leaf on its own and let it settle.
        app.world_mut().write_message(DoorInteract { target: right });
        for _ in 0..30 {
            app.update();
        }
        assert!(app.world().get::<Door>(right).unwrap().is_open);
        app.world_mut().resource_mut::<HeardCues>().0.clear();

        app.world_mut().write_message(DoorInteract { target: double });
        for _ in 0..30 {
            app.update();
        }

        let left_door = app.world().get::<Door>(left).unwrap();
        let right_door = app.world().get::<Door>(right).unwrap();
        assert!(left_door.is_open && right_door.is_open);
        assert!((left_door.yaw() + 90.0).abs() < 1e-3);
        assert!((right_door.yaw() - 90.0).abs() < 1e-3);
        assert!(app.world().get::<DoubleDoor>(double).unwrap().is_open);

        // The leaf that moved plus the composite itself.
        let heard = &app.world().resource::<HeardCues>().0;
        assert_eq!(heard, &vec![(left, DoorCue::Open), (double, DoorCue::Open)]);
    }

    #[test]
    fn test_double_door_interact_with_one_leaf() {
        let mut app = door_app();
        let settings = DoorSettings::default();

        let right = app
            .world_mut()
            .spawn((Door::new(&settings), Transform::default()))
            .id();
        let double = app
            .world_mut()
            .spawn(DoubleDoor::new(None, Some(right), &settings))
            .id();
        app.update();

        app.world_mut().write_message(DoorInteract { target: double });
        app.update();

        assert!(app.world().get::<Door>(right).unwrap().is_open);
        let heard = &app.world().resource::<HeardCues>().0;
        assert_eq!(heard, &vec![(right, DoorCue::Open), (double, DoorCue::Open)]);
    }

    #[derive(Resource)]
    struct Paused(bool);

    #[test]
    fn test_gated_door_systems_freeze_swing() {
        let mut app = door_app();
        app.insert_resource(Paused(false));
        app.configure_sets(Update, DoorSystems.run_if(|paused: Res<Paused>| !paused.0));

        let door = app
            .world_mut()
            .spawn((Door::default(), Transform::default()))
            .id();
        app.update();

        app.world_mut().write_message(DoorInteract { target: door });
        app.update();
        app.update();
        let yaw = app.world().get::<Door>(door).unwrap().yaw();
        assert!(yaw > 0.0 && yaw < 90.0);

        app.world_mut().resource_mut::<Paused>().0 = true;
        for _ in 0..30 {
            app.update();
        }
        assert_eq!(app.world().get::<Door>(door).unwrap().yaw(), yaw);

        app.world_mut().resource_mut::<Paused>().0 = false;
        for _ in 0..30 {
            app.update();
        }
        assert!((app.world().get::<Door>(door).unwrap().yaw() - 90.0).abs() < 1e-3);
    }
}
