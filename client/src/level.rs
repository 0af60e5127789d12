//! Test level
//!
//! A floor, a dividing wall with one single and one double doorway, and a low slab to
//! crouch under. Everything static sits on the world layer; door panels on the door layer.

use bevy::light::CascadeShadowConfigBuilder;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use shared::{CollisionMask, Door, DoubleDoor, GameConfig};

use crate::physics::collision_groups;

const WALL_HEIGHT: f32 = 3.0;
const WALL_THICKNESS: f32 = 0.2;
const DOORWAY_HEIGHT: f32 = 2.2;

const SINGLE_DOORWAY_X: f32 = -4.0;
const SINGLE_DOORWAY_WIDTH: f32 = 1.2;
const DOUBLE_DOORWAY_X: f32 = 4.0;
const DOUBLE_DOORWAY_WIDTH: f32 = 2.4;

/// Gap left between a door panel and the frame.
const DOOR_CLEARANCE: f32 = 0.05;
const DOOR_THICKNESS: f32 = 0.08;

/// Underside of the crouch slab. Standing does not fit, crouching does.
const CROUCH_SLAB_BOTTOM: f32 = 1.3;

struct LevelMaterials {
    floor: Handle<StandardMaterial>,
    wall: Handle<StandardMaterial>,
    door: Handle<StandardMaterial>,
}

pub fn spawn_level(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<GameConfig>,
) {
    let palette = LevelMaterials {
        floor: materials.add(StandardMaterial {
            base_color: Color::srgb(0.35, 0.33, 0.30),
            perceptual_roughness: 0.9,
            ..default()
        }),
        wall: materials.add(StandardMaterial {
            base_color: Color::srgb(0.72, 0.66, 0.58),
            perceptual_roughness: 0.8,
            ..default()
        }),
        door: materials.add(StandardMaterial {
            base_color: Color::srgb(0.45, 0.28, 0.12),
            perceptual_roughness: 0.6,
            ..default()
        }),
    };

    // --- Lighting ---
    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            illuminance: 12_000.0,
            shadows_enabled: true,
            color: Color::srgb(1.0, 0.97, 0.92),
            ..default()
        },
        CascadeShadowConfigBuilder {
            num_cascades: 2,
            maximum_distance: 40.0,
            first_cascade_far_bound: 8.0,
            ..default()
        }
        .build(),
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.9, 0.4, 0.0)),
    ));
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.9, 0.9, 1.0),
        brightness: 250.0,
        affects_lightmapped_meshes: true,
    });
    commands.insert_resource(ClearColor(Color::srgb(0.55, 0.65, 0.78)));

    // --- Floor ---
    spawn_block(
        &mut commands,
        &mut meshes,
        &palette.floor,
        "Floor",
        Vec3::new(0.0, -0.5, 0.0),
        Vec3::new(30.0, 1.0, 30.0),
    );

    // --- Dividing wall along z = 0, broken by the two doorways ---
    let single_left = SINGLE_DOORWAY_X - SINGLE_DOORWAY_WIDTH * 0.5;
    let single_right = SINGLE_DOORWAY_X + SINGLE_DOORWAY_WIDTH * 0.5;
    let double_left = DOUBLE_DOORWAY_X - DOUBLE_DOORWAY_WIDTH * 0.5;
    let double_right = DOUBLE_DOORWAY_X + DOUBLE_DOORWAY_WIDTH * 0.5;

    for (from, to) in [(-15.0, single_left), (single_right, double_left), (double_right, 15.0)] {
        spawn_wall_span(&mut commands, &mut meshes, &palette.wall, from, to, 0.0, WALL_HEIGHT);
    }
    for (from, to) in [(single_left, single_right), (double_left, double_right)] {
        spawn_wall_span(
            &mut commands,
            &mut meshes,
            &palette.wall,
            from,
            to,
            DOORWAY_HEIGHT,
            WALL_HEIGHT,
        );
    }

    // --- Single door: hinged on the left jamb, swings away from spawn ---
    let single_width = SINGLE_DOORWAY_WIDTH - DOOR_CLEARANCE * 2.0;
    let single = spawn_door_leaf(
        &mut commands,
        &mut meshes,
        &palette.door,
        Vec3::new(single_left + DOOR_CLEARANCE, 0.0, 0.0),
        single_width,
        1.0,
        Door::new(&config.door).with_rotate_positive(true),
    );
    commands.entity(single).insert(Name::new("Single door"));

    // --- Double door: leaves hinged on the outer jambs, parented to the composite ---
    let leaf_width = DOUBLE_DOORWAY_WIDTH * 0.5 - DOOR_CLEARANCE * 1.5;
    let hinge_offset = DOUBLE_DOORWAY_WIDTH * 0.5 - DOOR_CLEARANCE;
    let left = spawn_door_leaf(
        &mut commands,
        &mut meshes,
        &palette.door,
        Vec3::new(-hinge_offset, 0.0, 0.0),
        leaf_width,
        1.0,
        Door::new(&config.door),
    );
    let right = spawn_door_leaf(
        &mut commands,
        &mut meshes,
        &palette.door,
        Vec3::new(hinge_offset, 0.0, 0.0),
        leaf_width,
        -1.0,
        Door::new(&config.door),
    );
    commands
        .spawn((
            Name::new("Double door"),
            DoubleDoor::new(Some(left), Some(right), &config.door),
            Transform::from_xyz(DOUBLE_DOORWAY_X, 0.0, 0.0),
            Visibility::default(),
        ))
        .add_children(&[left, right]);

    // --- Crouch slab on two pillars, in front of spawn ---
    let slab_thickness = 0.3;
    spawn_block(
        &mut commands,
        &mut meshes,
        &palette.wall,
        "Crouch slab",
        Vec3::new(0.0, CROUCH_SLAB_BOTTOM + slab_thickness * 0.5, 10.0),
        Vec3::new(3.0, slab_thickness, 3.0),
    );
    for x in [-1.65, 1.65] {
        spawn_block(
            &mut commands,
            &mut meshes,
            &palette.wall,
            "Crouch pillar",
            Vec3::new(x, (CROUCH_SLAB_BOTTOM + slab_thickness) * 0.5, 10.0),
            Vec3::new(0.3, CROUCH_SLAB_BOTTOM + slab_thickness, 3.0),
        );
    }

    info!("Level spawned: single door {single}, double door leaves {left} / {right}");
}

/// Static box on the world layer.
fn spawn_block(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    material: &Handle<StandardMaterial>,
    name: &'static str,
    center: Vec3,
    size: Vec3,
) -> Entity {
    let half = size * 0.5;
    commands
        .spawn((
            Name::new(name),
            Mesh3d(meshes.add(Cuboid::from_size(size))),
            MeshMaterial3d(material.clone()),
            Transform::from_translation(center),
            RigidBody::Fixed,
            Collider::cuboid(half.x, half.y, half.z),
            collision_groups(CollisionMask::WORLD, CollisionMask::ALL),
        ))
        .id()
}

/// Wall piece along z = 0 covering x in [from, to] and y in [bottom, top].
fn spawn_wall_span(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    material: &Handle<StandardMaterial>,
    from: f32,
    to: f32,
    bottom: f32,
    top: f32,
) {
    spawn_block(
        commands,
        meshes,
        material,
        "Wall",
        Vec3::new((from + to) * 0.5, (bottom + top) * 0.5, 0.0),
        Vec3::new(to - from, top - bottom, WALL_THICKNESS),
    );
}

/// A hinge entity carrying the `Door`, with the panel as a child.
///
/// `extends` is +1 when the panel reaches toward +x from the hinge, -1 toward -x.
fn spawn_door_leaf(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    material: &Handle<StandardMaterial>,
    hinge: Vec3,
    width: f32,
    extends: f32,
    door: Door,
) -> Entity {
    let height = DOORWAY_HEIGHT - DOOR_CLEARANCE;
    let half = Vec3::new(width, height, DOOR_THICKNESS) * 0.5;
    let mesh = meshes.add(Cuboid::from_size(half * 2.0));

    commands
        .spawn((
            Name::new("Door hinge"),
            door,
            Transform::from_translation(hinge),
            Visibility::default(),
            RigidBody::KinematicPositionBased,
        ))
        .with_children(|hinge| {
            hinge.spawn((
                Name::new("Door panel"),
                Mesh3d(mesh),
                MeshMaterial3d(material.clone()),
                Transform::from_xyz(extends * half.x, half.y, 0.0),
                Collider::cuboid(half.x, half.y, half.z),
                collision_groups(CollisionMask::DOOR, CollisionMask::ALL),
            ));
        })
        .id()
}
