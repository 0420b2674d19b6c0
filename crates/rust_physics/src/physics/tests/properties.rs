//! Invariants that must hold for any scene

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::foundation::math::{utils, Transform};
use crate::physics::broad_phase::{collect_entries, BroadPhase, BruteForce, SweepAndPrune};
use crate::physics::collision::{test_intersection, Ray};
use crate::physics::resolution::{resolve_contact, ResolutionSettings};
use crate::physics::PositionConstraint;
use approx::assert_relative_eq;

#[test]
fn test_immovable_bodies_never_move() {
    let mut physics = system(PhysicsConfig::default().with_gravity_enabled(true));
    let mut world = GameWorld::with_seed(3);

    let rotation = utils::axis_angle_degrees(Vec3::new(1.0, 1.0, 0.0), 30.0);
    let block = world.add_object(
        GameObject::new("block")
            .with_transform(Transform::from_position_orientation(Vec3::zeros(), rotation))
            .with_volume(CollisionVolume::obb(Vec3::new(2.0, 1.0, 1.0)))
            .with_body(RigidBody::immovable()),
    );
    for i in 0..4 {
        let sphere = add_sphere(&mut world, Vec3::new(i as f32 - 1.5, 3.0, 0.0), 0.5);
        if let Some(body) = world.object_mut(sphere).and_then(GameObject::body_mut) {
            body.linear_velocity = Vec3::new(0.0, -5.0, 0.0);
        }
    }
    let before = world.object(block).expect("block").transform.clone();

    for _ in 0..200 {
        if let Some(body) = world.object_mut(block).and_then(GameObject::body_mut) {
            body.add_force(Vec3::new(500.0, 500.0, 0.0));
            body.add_torque(Vec3::new(0.0, 100.0, 0.0));
        }
        physics.update(&mut world, FRAME);
    }

    assert_eq!(world.object(block).expect("block").transform, before);
}

#[test]
fn test_equal_spheres_exchange_velocities() {
    let mut physics = system(frictionless_config());
    let mut world = GameWorld::with_seed(3);

    let elastic = |world: &mut GameWorld, x: f32, vx: f32| {
        let handle = add_sphere(world, Vec3::new(x, 0.0, 0.0), 1.0);
        if let Some(body) = world.object_mut(handle).and_then(GameObject::body_mut) {
            body.elasticity = 1.0;
            body.friction = 0.0;
            body.linear_velocity = Vec3::new(vx, 0.0, 0.0);
        }
        handle
    };
    let a = elastic(&mut world, -2.0, 1.0);
    let b = elastic(&mut world, 2.0, -1.0);

    run(&mut physics, &mut world, 120);

    assert_relative_eq!(velocity(&world, a), Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-3);
    assert_relative_eq!(velocity(&world, b), Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-3);
}

#[test]
fn test_resolution_reduces_penetration() {
    let mut world = GameWorld::with_seed(3);
    let rotation = utils::axis_angle_degrees(Vec3::z(), 45.0);
    let volume = CollisionVolume::obb(Vec3::repeat(1.0));

    let a = world.add_object(
        GameObject::new("a")
            .with_volume(volume)
            .with_body(RigidBody::new(1.0).with_inertia_for(&volume)),
    );
    let b = world.add_object(
        GameObject::new("b")
            .with_transform(Transform::from_position_orientation(
                Vec3::new(2.2, 0.1, 0.0),
                rotation,
            ))
            .with_volume(volume)
            .with_body(RigidBody::new(2.0).with_inertia_for(&volume)),
    );

    let penetration = |world: &GameWorld| {
        let (oa, ob) = (world.object(a).expect("a"), world.object(b).expect("b"));
        test_intersection(&volume, &oa.transform, &volume, &ob.transform).map_or(0.0, |c| c.penetration)
    };

    let before = penetration(&world);
    assert!(before > 0.0);

    let info = {
        let (oa, ob) = (world.object(a).expect("a"), world.object(b).expect("b"));
        test_intersection(&volume, &oa.transform, &volume, &ob.transform).expect("overlap")
    };
    let [oa, ob] = world.object_pair_mut(a, b).expect("distinct objects");
    resolve_contact(oa, ob, &info, &ResolutionSettings::default());

    assert!(penetration(&world) < before);
}

#[test]
fn test_broad_phase_never_misses_a_contact() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut world = GameWorld::with_seed(3);

    for i in 0..60 {
        let position = Vec3::new(rng.gen_range(-6.0..6.0), rng.gen_range(-6.0..6.0), rng.gen_range(-6.0..6.0));
        let axis = Vec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
        let orientation = utils::axis_angle_degrees(axis, rng.gen_range(0.0..360.0));
        let half = Vec3::new(rng.gen_range(0.2..1.5), rng.gen_range(0.2..1.5), rng.gen_range(0.2..1.5));

        let volume = match i % 3 {
            0 => CollisionVolume::sphere(half.x),
            1 => CollisionVolume::aabb(half),
            _ => CollisionVolume::obb(half),
        };
        let body = if i % 5 == 0 { RigidBody::immovable() } else { RigidBody::new(1.0) };

        world.add_object(
            GameObject::new(format!("object{i}"))
                .with_transform(Transform::from_position_orientation(position, orientation))
                .with_volume(volume)
                .with_body(body),
        );
    }

    let entries = collect_entries(&mut world);
    let candidates = SweepAndPrune::new().find_pairs(&entries);
    let every_pair = BruteForce.find_pairs(&entries);

    let mut confirmed = 0;
    for pair in every_pair {
        let (a, b) = (world.object(pair.a).expect("a"), world.object(pair.b).expect("b"));
        let (Some(va), Some(vb)) = (a.volume(), b.volume()) else { continue };
        if test_intersection(va, &a.transform, vb, &b.transform).is_some() {
            confirmed += 1;
            assert!(candidates.binary_search(&pair).is_ok(), "missed candidate {pair:?}");
        }
    }
    assert!(confirmed > 0);
}

#[test]
fn test_raycast_is_deterministic() {
    let mut world = GameWorld::with_seed(3);
    add_floor(&mut world, 0.0);
    for i in 0..10 {
        let x = i as f32 * 1.5 - 7.0;
        world.add_object(
            GameObject::new(format!("pillar{i}"))
                .with_position(Vec3::new(x, 2.0, -10.0 - (i % 3) as f32))
                .with_volume(CollisionVolume::obb(Vec3::new(0.5, 2.0, 0.5))),
        );
    }

    let ray = Ray::new(Vec3::new(0.25, 1.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
    let first = world.raycast_closest(&ray).expect("hit");
    let second = world.raycast_closest(&ray).expect("hit");

    assert_eq!(first.object, second.object);
    assert_eq!(first.distance.to_bits(), second.distance.to_bits());
}

#[test]
fn test_constraint_converges_monotonically() {
    let mut physics = system(frictionless_config());
    let mut world = GameWorld::with_seed(3);

    let a = world.add_object(GameObject::new("a").with_body(RigidBody::new(1.0)));
    let b = world.add_object(
        GameObject::new("b")
            .with_position(Vec3::new(6.0, 0.0, 0.0))
            .with_body(RigidBody::new(1.0)),
    );
    let target = 3.0;
    world
        .add_constraint(PositionConstraint::new(a, b, target).with_relaxation(0.1))
        .expect("valid constraint");

    let mut error = (position(&world, b) - position(&world, a)).magnitude() - target;
    for _ in 0..30 {
        physics.update(&mut world, FRAME);
        let next = (position(&world, b) - position(&world, a)).magnitude() - target;
        assert!(next.abs() <= error.abs() + 1e-5, "error grew from {error} to {next}");
        error = next;
    }

    assert_relative_eq!(error, 0.0, epsilon = 1e-3);
}
