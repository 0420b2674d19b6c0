//! Whole-pipeline tests driving [`PhysicsSystem`](super::PhysicsSystem) over small worlds

mod properties;

use crate::config::PhysicsConfig;
use crate::foundation::collections::ObjectHandle;
use crate::foundation::math::Vec3;
use crate::physics::{CollisionVolume, PhysicsSystem, RigidBody};
use crate::world::{GameObject, GameWorld};

const FRAME: f32 = 1.0 / 60.0;

/// Gravity off, no damping
fn frictionless_config() -> PhysicsConfig {
    PhysicsConfig::default().with_global_damping(0.0)
}

fn system(config: PhysicsConfig) -> PhysicsSystem {
    PhysicsSystem::new(config).expect("test config is valid")
}

fn run(physics: &mut PhysicsSystem, world: &mut GameWorld, frames: usize) {
    for _ in 0..frames {
        physics.update(world, FRAME);
    }
}

fn add_floor(world: &mut GameWorld, top: f32) -> ObjectHandle {
    world.add_object(
        GameObject::new("floor")
            .with_position(Vec3::new(0.0, top - 1.0, 0.0))
            .with_volume(CollisionVolume::aabb(Vec3::new(50.0, 1.0, 50.0)))
            .with_body(RigidBody::immovable()),
    )
}

fn add_sphere(world: &mut GameWorld, position: Vec3, radius: f32) -> ObjectHandle {
    let volume = CollisionVolume::sphere(radius);
    world.add_object(
        GameObject::new("sphere")
            .with_position(position)
            .with_volume(volume)
            .with_body(RigidBody::new(1.0).with_inertia_for(&volume)),
    )
}

fn position(world: &GameWorld, handle: ObjectHandle) -> Vec3 {
    world.object(handle).expect("live object").transform.position
}

fn velocity(world: &GameWorld, handle: ObjectHandle) -> Vec3 {
    world
        .object(handle)
        .and_then(GameObject::body)
        .expect("object with body")
        .linear_velocity
}
