//! Goose behaviour and reactions to collision events

use rust_physics::prelude::*;

use crate::level::Level;

/// Push applied towards the current target each frame
const STEER_FORCE: f32 = 25.0;

/// Launch force applied on landing on the trampoline
const TRAMPOLINE_FORCE: f32 = 1500.0;

/// Goose inverse mass on dry land
pub const GOOSE_INVERSE_MASS: f32 = 1.0;

/// Goose inverse mass while wading through the lake
const LAKE_INVERSE_MASS: f32 = 0.25;

/// Items carried before heading home
const CARRY_LIMIT: u32 = 3;

/// Anything below this fell out of the park
const KILL_PLANE: f32 = -20.0;

/// Points carried and delivered
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    /// Collected but not yet brought home
    pub carried: u32,
    /// Items delivered to the home pad
    pub delivered: u32,
    /// Points delivered to the home pad
    pub banked: u32,
    carried_points: u32,
}

/// Push the goose towards the nearest collectable, or home when laden
pub fn steer(world: &mut GameWorld, level: &Level, score: &Score) {
    let Some(goose) = world.object(level.goose) else {
        return;
    };
    let from = goose.transform.position;

    let remaining = level
        .collectables()
        .filter_map(|handle| world.object(handle))
        .filter(|object| object.active && !object.collected)
        .map(|object| object.transform.position)
        .min_by(|a, b| (a - from).magnitude_squared().total_cmp(&(b - from).magnitude_squared()));

    let target = match remaining {
        Some(position) if score.carried < CARRY_LIMIT => position,
        _ if score.carried > 0 => match world.object(level.home) {
            Some(home) => home.transform.position,
            None => return,
        },
        Some(position) => position,
        None => return,
    };

    let mut direction = target - from;
    direction.y = 0.0;
    if direction.magnitude_squared() < 1e-6 {
        return;
    }

    if let Some(body) = world.object_mut(level.goose).and_then(GameObject::body_mut) {
        body.add_force(direction.normalize() * STEER_FORCE);
    }
}

/// Drain the goose's outbox and apply gameplay effects
pub fn react(world: &mut GameWorld, level: &Level, score: &mut Score) {
    let events = match world.object_mut(level.goose) {
        Some(goose) => goose.drain_events(),
        None => return,
    };

    for event in events {
        match (event.kind, event.other_type) {
            (CollisionEventKind::Began, CollisionType::Lake) => {
                log::debug!("Goose waded into the lake");
                set_goose_inverse_mass(world, level, LAKE_INVERSE_MASS);
            }
            (CollisionEventKind::Ended, CollisionType::Lake) => {
                log::debug!("Goose left the lake");
                set_goose_inverse_mass(world, level, GOOSE_INVERSE_MASS);
            }
            (CollisionEventKind::Began, CollisionType::Trampoline) => {
                log::debug!("Boing");
                if let Some(body) = world.object_mut(level.goose).and_then(GameObject::body_mut) {
                    body.add_force(Vec3::new(0.0, TRAMPOLINE_FORCE, 0.0));
                }
            }
            (CollisionEventKind::Began, CollisionType::Collectable) => collect(world, level, score, event.other),
            (CollisionEventKind::Began, CollisionType::Home) if score.carried > 0 => {
                score.delivered += score.carried;
                score.banked += score.carried_points;
                log::info!("Delivered {} items, {} points banked", score.carried, score.banked);
                score.carried = 0;
                score.carried_points = 0;
            }
            _ => {}
        }
    }

    let fell = world
        .object(level.goose)
        .is_some_and(|goose| goose.transform.position.y < KILL_PLANE);
    if fell {
        log::warn!("Goose fell out of the park, respawning");
        if let Some(goose) = world.object_mut(level.goose) {
            goose.reset_to_spawn();
        }
        set_goose_inverse_mass(world, level, GOOSE_INVERSE_MASS);
    }
}

fn collect(world: &mut GameWorld, level: &Level, score: &mut Score, handle: ObjectHandle) {
    let Some(item) = world.object_mut(handle) else {
        return;
    };
    if !item.collectable || item.collected {
        return;
    }

    item.collected = true;
    item.active = false;
    item.state_description = "carried".to_string();

    score.carried += 1;
    score.carried_points += level.points_for(handle);
    log::info!("Picked up {} ({} carried)", item.name(), score.carried);
}

/// Change the goose's mass, keeping its inertia consistent with it
fn set_goose_inverse_mass(world: &mut GameWorld, level: &Level, inverse_mass: f32) {
    let Some(goose) = world.object_mut(level.goose) else {
        return;
    };
    let volume = goose.volume().copied();
    if let Some(body) = goose.body_mut() {
        body.set_inverse_mass(inverse_mass);
        if let Some(volume) = volume {
            body.init_inertia_for(&volume);
        }
    }
}
