//! Looking at doors and using them.
//!
//! Every frame a ray goes out from the eye along the view direction. If it strikes a door
//! collider within reach, the door it belongs to becomes the interaction candidate.

use bevy::prelude::*;

use crate::config::InteractionSettings;
use crate::physics::PhysicsQuery;

/// How many hierarchy levels to climb from a struck collider looking for a door.
const MAX_RESOLVE_DEPTH: usize = 8;

/// What kind of door behavior an entity carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoorKind {
    Single,
    Double,
}

/// The door currently in the crosshair, if any. Rebuilt every frame.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionCandidate {
    pub target: Option<Entity>,
}

/// Find the door behavior a struck collider belongs to.
///
/// Walks from `hit` up through its parents. The nearest double door wins so that
/// using either leaf of a double door drives both; otherwise the nearest single door.
pub fn resolve_door(
    hit: Entity,
    parent_of: impl Fn(Entity) -> Option<Entity>,
    kind_of: impl Fn(Entity) -> Option<DoorKind>,
) -> Option<Entity> {
    let mut single = None;
    let mut current = Some(hit);

    for _ in 0..MAX_RESOLVE_DEPTH {
        let Some(entity) = current else {
            break;
        };
        match kind_of(entity) {
            Some(DoorKind::Double) => return Some(entity),
            Some(DoorKind::Single) if single.is_none() => single = Some(entity),
            _ => {}
        }
        current = parent_of(entity);
    }
    single
}

/// Cast the interaction ray and resolve what it hit.
pub fn scan_for_door(
    settings: &InteractionSettings,
    eye: Vec3,
    forward: Dir3,
    physics: &impl PhysicsQuery,
    parent_of: impl Fn(Entity) -> Option<Entity>,
    kind_of: impl Fn(Entity) -> Option<DoorKind>,
) -> InteractionCandidate {
    let target = physics
        .ray_cast(
            eye,
            forward,
            settings.interaction_distance,
            settings.door_mask,
        )
        .and_then(|hit| resolve_door(hit.entity, parent_of, kind_of));
    InteractionCandidate { target }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{CastHit, CollisionMask};
    use std::collections::HashMap;

    /// A single door panel `distance` meters straight ahead on the door layer.
    struct PanelAhead {
        panel: Entity,
        distance: f32,
    }

    impl PhysicsQuery for PanelAhead {
        fn sphere_cast(&self, _: Vec3, _: f32, _: Dir3, _: f32, _: CollisionMask) -> Option<CastHit> {
            None
        }

        fn ray_cast(&self, _: Vec3, _: Dir3, max_distance: f32, mask: CollisionMask) -> Option<CastHit> {
            (mask.intersects(CollisionMask::DOOR) && self.distance <= max_distance).then_some(CastHit {
                entity: self.panel,
                distance: self.distance,
            })
        }
    }

    struct Scene {
        parents: HashMap<Entity, Entity>,
        kinds: HashMap<Entity, DoorKind>,
    }

    impl Scene {
        fn parent_of(&self) -> impl Fn(Entity) -> Option<Entity> + '_ {
            move |e| self.parents.get(&e).copied()
        }

        fn kind_of(&self) -> impl Fn(Entity) -> Option<DoorKind> + '_ {
            move |e| self.kinds.get(&e).copied()
        }
    }

    /// double -> hinge (Door) -> panel (collider)
    fn double_door_scene() -> (Scene, [Entity; 3]) {
        let mut world = World::new();
        let double = world.spawn_empty().id();
        let hinge = world.spawn_empty().id();
        let panel = world.spawn_empty().id();

        let scene = Scene {
            parents: HashMap::from([(panel, hinge), (hinge, double)]),
            kinds: HashMap::from([(hinge, DoorKind::Single), (double, DoorKind::Double)]),
        };
        (scene, [double, hinge, panel])
    }

    #[test]
    fn test_double_door_wins_over_leaf() {
        let (scene, [double, _, panel]) = double_door_scene();
        assert_eq!(resolve_door(panel, scene.parent_of(), scene.kind_of()), Some(double));
    }

    #[test]
    fn test_single_door_from_panel() {
        let (mut scene, [double, hinge, panel]) = double_door_scene();
        scene.kinds.remove(&double);
        assert_eq!(resolve_door(panel, scene.parent_of(), scene.kind_of()), Some(hinge));
    }

    #[test]
    fn test_plain_collider_is_no_candidate() {
        let (mut scene, [_, _, panel]) = double_door_scene();
        scene.kinds.clear();
        assert_eq!(resolve_door(panel, scene.parent_of(), scene.kind_of()), None);
    }

    #[test]
    fn test_scan_respects_distance() {
        let (scene, [double, _, panel]) = double_door_scene();
        let settings = InteractionSettings::default();

        let near = PanelAhead { panel, distance: settings.interaction_distance - 0.5 };
        let found = scan_for_door(&settings, Vec3::ZERO, Dir3::NEG_Z, &near, scene.parent_of(), scene.kind_of());
        assert_eq!(found.target, Some(double));

        let far = PanelAhead { panel, distance: settings.interaction_distance + 0.5 };
        let found = scan_for_door(&settings, Vec3::ZERO, Dir3::NEG_Z, &far, scene.parent_of(), scene.kind_of());
        assert_eq!(found, InteractionCandidate::default());
    }
}
