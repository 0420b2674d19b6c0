//! Physics system: the fixed-step simulation loop
//!
//! Each call to [`PhysicsSystem::update`] banks the frame time and runs as
//! many fixed substeps as fit (up to a cap). A substep is:
//!
//! 1. Integrate accelerations (forces, gravity, damping)
//! 2. Relax constraints
//! 3. Refresh bounds and collect broad-phase candidates
//! 4. Narrow-phase test every candidate
//! 5. Resolve the confirmed contacts
//! 6. Integrate velocities into transforms
//!
//! After the substeps the accumulated forces are cleared, so gameplay applies
//! fresh forces for the next frame, and contact events are emitted.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::{ConfigError, PhysicsConfig};
use crate::events::{CollisionEvent, CollisionEventKind};
use crate::foundation::math::Vec3;
use crate::world::{GameObject, GameWorld};

use super::broad_phase::{collect_entries, BroadPhase, BruteForce, CollisionPair, SweepAndPrune};
use super::collision::{test_intersection, Contact, ContactInfo};
use super::integrator::{integrate_accel, integrate_velocity};
use super::resolution::{resolve_contact, ResolutionSettings};

/// Slack when comparing banked time against the substep length
const ACCUMULATOR_TOLERANCE: f32 = 1e-6;

/// What happened during the last [`PhysicsSystem::update`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    /// Substeps simulated
    pub substeps: u32,
    /// Broad-phase candidates, summed over substeps
    pub candidate_pairs: usize,
    /// Confirmed contacts, summed over substeps
    pub contacts: usize,
    /// Pairs currently considered in contact for event purposes
    pub active_pairs: usize,
    /// Simulation time thrown away because the substep cap was hit
    pub dropped_time: f32,
}

/// Owns the step configuration and the state carried between frames
#[derive(Debug)]
pub struct PhysicsSystem {
    config: PhysicsConfig,
    accumulator: f32,
    sweep: SweepAndPrune,
    brute_force: BruteForce,
    /// Pair -> frames left before it counts as ended
    persistent: BTreeMap<CollisionPair, u32>,
    confirmed: BTreeSet<CollisionPair>,
    last_contacts: Vec<Contact>,
    stats: FrameStats,
}

impl Default for PhysicsSystem {
    fn default() -> Self {
        Self::from_valid_config(PhysicsConfig::default())
    }
}

impl PhysicsSystem {
    /// Create a physics system, rejecting invalid configuration
    pub fn new(config: PhysicsConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let system = Self::from_valid_config(config);
        log::info!(
            "Physics system created: dt={:.5}s, max {} substeps, {} pair finding",
            system.config.fixed_timestep,
            system.config.max_substeps,
            system.broad_phase_name()
        );
        Ok(system)
    }

    fn from_valid_config(config: PhysicsConfig) -> Self {
        Self {
            config,
            accumulator: 0.0,
            sweep: SweepAndPrune::new(),
            brute_force: BruteForce,
            persistent: BTreeMap::new(),
            confirmed: BTreeSet::new(),
            last_contacts: Vec::new(),
            stats: FrameStats::default(),
        }
    }

    /// Current configuration
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Replace the whole configuration
    pub fn set_config(&mut self, config: PhysicsConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Toggle gravity for every movable body
    pub fn use_gravity(&mut self, enabled: bool) {
        self.config.use_gravity = enabled;
    }

    /// Whether gravity is applied
    pub fn gravity_enabled(&self) -> bool {
        self.config.use_gravity
    }

    /// Change the gravity vector (does not toggle it)
    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.config.gravity = gravity;
    }

    /// Toggle sweep-and-prune; when off every eligible pair is tested
    pub fn use_broad_phase(&mut self, enabled: bool) {
        self.config.use_broad_phase = enabled;
        log::debug!("Pair finding switched to {}", self.broad_phase_name());
    }

    /// Name of the pair-finding strategy in use
    pub fn broad_phase_name(&self) -> &'static str {
        if self.config.use_broad_phase {
            self.sweep.name()
        } else {
            self.brute_force.name()
        }
    }

    /// Change the global damping, in [0, 1)
    pub fn set_global_damping(&mut self, damping: f32) {
        debug_assert!((0.0..1.0).contains(&damping), "global damping must be in [0, 1)");
        self.config.global_damping = damping;
    }

    /// Statistics of the last frame
    pub fn last_frame_stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Contacts confirmed by the last substep
    pub fn last_contacts(&self) -> &[Contact] {
        &self.last_contacts
    }

    /// Pairs currently in contact for event purposes
    pub fn active_pairs(&self) -> impl Iterator<Item = CollisionPair> + '_ {
        self.persistent.keys().copied()
    }

    /// Forget banked time and every tracked contact (for level resets)
    pub fn clear(&mut self) {
        self.accumulator = 0.0;
        self.persistent.clear();
        self.confirmed.clear();
        self.last_contacts.clear();
        self.stats = FrameStats::default();
    }

    /// Advance the world by `dt` seconds of frame time
    pub fn update(&mut self, world: &mut GameWorld, dt: f32) {
        if !(dt.is_finite() && dt >= 0.0) {
            log::warn!("Ignoring physics update with invalid dt {dt}");
            return;
        }

        let step = self.config.fixed_timestep;
        self.accumulator += dt;
        self.stats = FrameStats::default();
        self.confirmed.clear();

        while self.accumulator + ACCUMULATOR_TOLERANCE >= step && self.stats.substeps < self.config.max_substeps {
            self.substep(world, step);
            self.accumulator = (self.accumulator - step).max(0.0);
            self.stats.substeps += 1;
        }

        if self.accumulator + ACCUMULATOR_TOLERANCE >= step {
            let dropped = self.accumulator - self.accumulator % step;
            self.accumulator -= dropped;
            self.stats.dropped_time = dropped;
            log::warn!(
                "Physics fell behind: dropped {:.4}s after {} substeps",
                dropped,
                self.stats.substeps
            );
        }

        if self.stats.substeps == 0 {
            return; // Keep this frame's forces for the next update
        }

        world.operate_on_contents(|_, object| {
            if let Some(body) = object.body_mut() {
                body.clear_forces();
            }
        });

        self.update_contact_events(world);
        self.stats.active_pairs = self.persistent.len();

        log::debug!(
            "Physics frame: {} substeps, {} candidates, {} contacts, {} active pairs",
            self.stats.substeps,
            self.stats.candidate_pairs,
            self.stats.contacts,
            self.stats.active_pairs
        );
    }

    fn substep(&mut self, world: &mut GameWorld, dt: f32) {
        let gravity = self.config.use_gravity.then_some(self.config.gravity);
        let damping = self.config.damping_factor(dt);

        world.operate_on_contents(|_, object| {
            if object.active {
                integrate_accel(object, gravity, damping, dt);
            }
        });

        for _ in 0..self.config.constraint_iterations {
            world.update_constraints(dt);
        }

        let entries = collect_entries(world);
        let broad_phase: &mut dyn BroadPhase = if self.config.use_broad_phase {
            &mut self.sweep
        } else {
            &mut self.brute_force
        };
        let pairs = broad_phase.find_pairs(&entries);
        self.stats.candidate_pairs += pairs.len();

        self.last_contacts.clear();
        for pair in pairs {
            if let Some(info) = narrow_phase(world, pair) {
                self.last_contacts.push(Contact { pair, info });
            }
        }

        let settings = ResolutionSettings {
            penetration_correction: self.config.penetration_correction,
            restitution_threshold: self.config.restitution_threshold,
        };
        for contact in &self.last_contacts {
            if let Some([a, b]) = world.object_pair_mut(contact.pair.a, contact.pair.b) {
                resolve_contact(a, b, &contact.info, &settings);
            }
            self.confirmed.insert(contact.pair);
        }
        self.stats.contacts += self.last_contacts.len();

        log::trace!(
            "Substep: {} entries, {} contacts",
            entries.len(),
            self.last_contacts.len()
        );

        world.operate_on_contents(|_, object| {
            if object.active {
                integrate_velocity(object, dt);
            }
        });
    }

    fn update_contact_events(&mut self, world: &mut GameWorld) {
        let persistence = self.config.collision_persistence_frames;

        for &pair in &self.confirmed {
            if self.persistent.insert(pair, persistence).is_none() {
                emit(world, pair, CollisionEventKind::Began);
            }
        }

        let mut ended = Vec::new();
        for (pair, frames_left) in &mut self.persistent {
            if self.confirmed.contains(pair) {
                continue;
            }
            *frames_left = frames_left.saturating_sub(1);
            if *frames_left == 0 {
                ended.push(*pair);
            }
        }

        for pair in ended {
            self.persistent.remove(&pair);
            emit(world, pair, CollisionEventKind::Ended);
        }
    }
}

fn narrow_phase(world: &GameWorld, pair: CollisionPair) -> Option<ContactInfo> {
    let a = world.object(pair.a)?;
    let b = world.object(pair.b)?;
    test_intersection(a.volume()?, &a.transform, b.volume()?, &b.transform)
}

/// Push one event into each side's outbox; a removed side is skipped
fn emit(world: &mut GameWorld, pair: CollisionPair, kind: CollisionEventKind) {
    let type_a = world.object(pair.a).map(GameObject::collision_type).unwrap_or_default();
    let type_b = world.object(pair.b).map(GameObject::collision_type).unwrap_or_default();

    if let Some(object) = world.object_mut(pair.a) {
        log::trace!("{kind:?}: {} with {type_b:?}", object.name());
        object.push_event(CollisionEvent { kind, other: pair.b, other_type: type_b });
    }
    if let Some(object) = world.object_mut(pair.b) {
        log::trace!("{kind:?}: {} with {type_a:?}", object.name());
        object.push_event(CollisionEvent { kind, other: pair.a, other_type: type_a });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collision::CollisionVolume;
    use crate::physics::{CollisionType, RigidBody};
    use approx::assert_relative_eq;

    fn config() -> PhysicsConfig {
        PhysicsConfig::default().with_global_damping(0.0)
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = PhysicsSystem::new(PhysicsConfig::default().with_timestep(-1.0, 4));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_substeps_and_dropped_time() {
        let mut physics = PhysicsSystem::new(config().with_timestep(0.01, 4)).expect("valid");
        let mut world = GameWorld::with_seed(1);

        physics.update(&mut world, 0.025);
        assert_eq!(physics.last_frame_stats().substeps, 2);

        // 0.005 banked + 0.1 is far more than 4 substeps
        physics.update(&mut world, 0.1);
        let stats = physics.last_frame_stats();
        assert_eq!(stats.substeps, 4);
        assert!(stats.dropped_time > 0.05);
    }

    #[test]
    fn test_forces_cleared_only_after_a_substep() {
        let mut physics = PhysicsSystem::new(config().with_timestep(0.01, 4)).expect("valid");
        let mut world = GameWorld::with_seed(1);
        let ball = world.add_object(GameObject::new("ball").with_body(RigidBody::new(1.0)));

        world.object_mut(ball).and_then(GameObject::body_mut).expect("body").add_force(Vec3::x());

        physics.update(&mut world, 0.001);
        assert_relative_eq!(world.object(ball).and_then(GameObject::body).expect("body").force(), Vec3::x());

        physics.update(&mut world, 0.01);
        assert_eq!(world.object(ball).and_then(GameObject::body).expect("body").force(), Vec3::zeros());
        assert!(world.object(ball).and_then(GameObject::body).expect("body").linear_velocity.x > 0.0);
    }

    #[test]
    fn test_began_and_ended_events() {
        let mut physics = PhysicsSystem::new(
            config().with_timestep(0.01, 1),
        )
        .expect("valid");
        let mut world = GameWorld::with_seed(1);

        let lake = world.add_object(
            GameObject::new("lake")
                .with_volume(CollisionVolume::aabb(Vec3::new(5.0, 0.5, 5.0)))
                .with_body(RigidBody::immovable().with_collision_type(CollisionType::Lake)),
        );
        let goose = world.add_object(
            GameObject::new("goose")
                .with_position(Vec3::new(0.0, 0.9, 0.0))
                .with_volume(CollisionVolume::sphere(0.5))
                .with_body(RigidBody::new(1.0).with_collision_type(CollisionType::Player)),
        );

        physics.update(&mut world, 0.01);

        let events = world.object_mut(goose).expect("goose").drain_events();
        assert_eq!(events, vec![CollisionEvent::began(lake, CollisionType::Lake)]);
        let events = world.object_mut(lake).expect("lake").drain_events();
        assert_eq!(events, vec![CollisionEvent::began(goose, CollisionType::Player)]);
        assert_eq!(world.object_mut(goose).expect("goose").take_last_collision(), CollisionType::Lake);

        // Move well clear; the pair survives the persistence window, then ends
        world.object_mut(goose).expect("goose").transform.position = Vec3::new(0.0, 10.0, 0.0);
        let persistence = physics.config().collision_persistence_frames;
        for _ in 0..persistence - 1 {
            physics.update(&mut world, 0.01);
            assert!(world.object(goose).expect("goose").events().is_empty());
        }
        physics.update(&mut world, 0.01);

        let events = world.object_mut(goose).expect("goose").drain_events();
        assert_eq!(events, vec![CollisionEvent::ended(lake, CollisionType::Lake)]);
        assert_eq!(physics.active_pairs().count(), 0);
    }

    #[test]
    fn test_broad_phase_toggle_switches_strategy() {
        let mut physics = PhysicsSystem::default();
        assert_eq!(physics.broad_phase_name(), "sweep-and-prune");

        physics.use_broad_phase(false);
        assert!(!physics.config().use_broad_phase);
        assert_eq!(physics.broad_phase_name(), "brute-force");
    }

    #[test]
    fn test_clear_forgets_contacts() {
        let mut physics = PhysicsSystem::default();
        let mut world = GameWorld::with_seed(1);
        world.add_object(
            GameObject::new("a")
                .with_volume(CollisionVolume::sphere(1.0))
                .with_body(RigidBody::new(1.0)),
        );
        world.add_object(
            GameObject::new("b")
                .with_position(Vec3::new(1.0, 0.0, 0.0))
                .with_volume(CollisionVolume::sphere(1.0))
                .with_body(RigidBody::new(1.0)),
        );

        physics.update(&mut world, 1.0 / 60.0);
        assert_eq!(physics.active_pairs().count(), 1);

        physics.clear();
        assert_eq!(physics.active_pairs().count(), 0);
        assert_eq!(*physics.last_frame_stats(), FrameStats::default());
    }
}
