//! Park level layout

use rand::rngs::StdRng;
use rand::Rng;
use rust_physics::prelude::*;

use crate::gameplay::GOOSE_INVERSE_MASS;

/// Half size of the walkable ground
const PARK_HALF_SIZE: f32 = 40.0;

/// Handles the gameplay layer needs after setup
#[derive(Debug)]
pub struct Level {
    /// The player
    pub goose: ObjectHandle,
    /// Drop-off pad
    pub home: ObjectHandle,
    /// Single-point collectables
    pub apples: Vec<ObjectHandle>,
    /// Five-point collectables
    pub bonus_cubes: Vec<ObjectHandle>,
}

impl Level {
    /// Points awarded for collecting `handle`
    pub fn points_for(&self, handle: ObjectHandle) -> u32 {
        if self.bonus_cubes.contains(&handle) {
            5
        } else {
            1
        }
    }

    /// Every collectable, apples first
    pub fn collectables(&self) -> impl Iterator<Item = ObjectHandle> + '_ {
        self.apples.iter().chain(&self.bonus_cubes).copied()
    }
}

/// Populate `world` with the park and return the handles gameplay needs
pub fn build(world: &mut GameWorld, rng: &mut StdRng) -> Level {
    log::info!("Building park level");

    add_pad(world, "floor", Vec3::new(0.0, -1.0, 0.0), Vec3::new(PARK_HALF_SIZE, 1.0, PARK_HALF_SIZE), CollisionType::Floor, grass());
    add_walls(world);

    let home = add_pad(world, "home", Vec3::new(-30.0, -0.9, -30.0), Vec3::new(4.0, 1.0, 4.0), CollisionType::Home, Vec4::new(0.9, 0.9, 0.2, 1.0));
    add_pad(world, "lake", Vec3::new(15.0, -0.95, 10.0), Vec3::new(8.0, 1.0, 6.0), CollisionType::Lake, Vec4::new(0.1, 0.3, 0.9, 1.0));
    add_pad(world, "trampoline", Vec3::new(-10.0, -0.8, 20.0), Vec3::new(2.0, 1.0, 2.0), CollisionType::Trampoline, Vec4::new(0.9, 0.2, 0.2, 1.0));

    let apples = (0..12)
        .map(|i| {
            let position = Vec3::new(rng.gen_range(-30.0..30.0), 0.5, rng.gen_range(-30.0..30.0));
            world.add_object(
                GameObject::new(format!("apple{i}"))
                    .with_position(position)
                    .with_volume(CollisionVolume::sphere(0.5))
                    .with_body(RigidBody::immovable().with_collision_type(CollisionType::Collectable))
                    .with_render(RenderHandle::new("apple", Vec4::new(0.8, 0.1, 0.1, 1.0)))
                    .with_collectable(true),
            )
        })
        .collect();

    let cube = CollisionVolume::obb(Vec3::repeat(0.75));
    let bonus_cubes = (0..3)
        .map(|i| {
            let position = Vec3::new(rng.gen_range(-20.0..20.0), 3.0 + i as f32, rng.gen_range(-20.0..20.0));
            let orientation = rust_physics::foundation::math::utils::axis_angle_degrees(Vec3::y(), rng.gen_range(0.0..90.0));
            world.add_object(
                GameObject::new(format!("bonus{i}"))
                    .with_transform(Transform::from_position_orientation(position, orientation))
                    .with_volume(cube)
                    .with_body(
                        RigidBody::new(0.5)
                            .with_collision_type(CollisionType::Collectable)
                            .with_inertia_for(&cube),
                    )
                    .with_render(RenderHandle::new("cube", Vec4::new(0.6, 0.2, 0.8, 1.0)))
                    .with_collectable(true),
            )
        })
        .collect();

    add_bridge(world, Vec3::new(20.0, 6.0, -20.0), 8);

    let goose = spawn_goose(world, Vec3::new(0.0, 2.0, 0.0));

    log::info!("Park ready with {} objects and {} constraints", world.len(), world.constraint_count());
    Level { goose, home, apples, bonus_cubes }
}

/// The player sphere, spawning at `position`
pub fn spawn_goose(world: &mut GameWorld, position: Vec3) -> ObjectHandle {
    let volume = CollisionVolume::sphere(0.5);
    world.add_object(
        GameObject::new("goose")
            .with_position(position)
            .with_volume(volume)
            .with_body(
                RigidBody::new(GOOSE_INVERSE_MASS)
                    .with_elasticity(0.3)
                    .with_collision_type(CollisionType::Player)
                    .with_inertia_for(&volume),
            )
            .with_render(RenderHandle::new("goose", Vec4::new(1.0, 1.0, 1.0, 1.0)))
            .with_layers(CollisionLayers::PLAYER, CollisionLayers::ALL),
    )
}

fn grass() -> Vec4 {
    Vec4::new(0.2, 0.7, 0.2, 1.0)
}

/// Immovable box tagged with a gameplay type
pub fn add_pad(
    world: &mut GameWorld,
    name: &str,
    position: Vec3,
    half_extents: Vec3,
    collision_type: CollisionType,
    colour: Vec4,
) -> ObjectHandle {
    world.add_object(
        GameObject::new(name)
            .with_position(position)
            .with_volume(CollisionVolume::aabb(half_extents))
            .with_body(RigidBody::immovable().with_collision_type(collision_type))
            .with_render(RenderHandle::new("cube", colour))
            .with_layers(CollisionLayers::ENVIRONMENT, CollisionLayers::ALL),
    )
}

fn add_walls(world: &mut GameWorld) {
    let height = 3.0;
    let thickness = 1.0;
    let walls = [
        (Vec3::new(PARK_HALF_SIZE, height, 0.0), Vec3::new(thickness, height, PARK_HALF_SIZE)),
        (Vec3::new(-PARK_HALF_SIZE, height, 0.0), Vec3::new(thickness, height, PARK_HALF_SIZE)),
        (Vec3::new(0.0, height, PARK_HALF_SIZE), Vec3::new(PARK_HALF_SIZE, height, thickness)),
        (Vec3::new(0.0, height, -PARK_HALF_SIZE), Vec3::new(PARK_HALF_SIZE, height, thickness)),
    ];
    for (position, half_extents) in walls {
        add_pad(world, "wall", position, half_extents, CollisionType::Wall, Vec4::new(0.5, 0.5, 0.5, 1.0));
    }
}

/// Rope bridge of planks hanging between two anchor posts
fn add_bridge(world: &mut GameWorld, start: Vec3, planks: usize) {
    let spacing = 1.2;
    let plank = CollisionVolume::obb(Vec3::new(0.5, 0.1, 1.0));

    let anchor = |world: &mut GameWorld, position: Vec3| {
        world.add_object(
            GameObject::new("bridge anchor")
                .with_position(position)
                .with_body(RigidBody::immovable().with_collision_type(CollisionType::Immovable)),
        )
    };

    let mut previous = anchor(world, start);
    for i in 1..=planks {
        let link = world.add_object(
            GameObject::new(format!("plank{i}"))
                .with_position(start + Vec3::new(i as f32 * spacing, 0.0, 0.0))
                .with_volume(plank)
                .with_body(RigidBody::new(2.0).with_inertia_for(&plank))
                .with_render(RenderHandle::new("cube", Vec4::new(0.5, 0.3, 0.1, 1.0)))
                .with_layers(CollisionLayers::ENVIRONMENT, CollisionLayers::ALL),
        );
        connect(world, previous, link, spacing);
        previous = link;
    }
    let end = anchor(world, start + Vec3::new((planks + 1) as f32 * spacing, 0.0, 0.0));
    connect(world, previous, end, spacing);
}

fn connect(world: &mut GameWorld, a: ObjectHandle, b: ObjectHandle, distance: f32) {
    if let Err(error) = world.add_constraint(PositionConstraint::new(a, b, distance)) {
        log::warn!("Skipping bridge link: {error}");
    }
}
