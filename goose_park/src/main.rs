//! Goose park
//!
//! Headless run of a small park level: a goose wanders around collecting
//! apples and bonus cubes and brings them back to its home pad. Pass a
//! `.toml` or `.ron` physics config as the first argument to override the
//! defaults.

mod gameplay;
mod level;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_physics::foundation::logging;
use rust_physics::prelude::*;

use gameplay::Score;

const SEED: u64 = 0x6005e;
const FRAME_TIME: f32 = 1.0 / 60.0;
const FRAMES: u32 = 60 * 120;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_level(logging::LevelFilter::Info);

    log::info!("Starting goose park");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading physics config from {path}");
            PhysicsConfig::load_from_file(&path)?
        }
        None => PhysicsConfig::default()
            .with_gravity_enabled(true)
            .with_global_damping(0.4),
    };
    let mut physics = PhysicsSystem::new(config)?;

    let mut rng = StdRng::seed_from_u64(SEED);
    let mut world = GameWorld::with_seed(SEED);
    world.shuffle_constraints(true);

    let level = level::build(&mut world, &mut rng);
    let mut score = Score::default();

    for frame in 0..FRAMES {
        gameplay::steer(&mut world, &level, &score);
        physics.update(&mut world, FRAME_TIME);
        world.update_world();
        gameplay::react(&mut world, &level, &mut score);

        if frame % 600 == 0 {
            let stats = physics.last_frame_stats();
            log::info!(
                "t={:>5.1}s candidates={} contacts={} active pairs={}",
                frame as f32 * FRAME_TIME,
                stats.candidate_pairs,
                stats.contacts,
                stats.active_pairs
            );
        }
    }

    let remaining = level
        .collectables()
        .filter_map(|handle| world.object(handle))
        .filter(|object| !object.collected)
        .count();
    log::info!(
        "Finished: {} items delivered for {} points, {} carried, {} left in the park",
        score.delivered,
        score.banked,
        score.carried,
        remaining
    );

    Ok(())
}
