//! Physics system configuration

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};
use crate::foundation::math::{utils, Vec3};

/// Every tunable of the physics step
///
/// Defaults mirror a small, gravity-off sandbox running at 120 Hz with
/// strong global damping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Whether gravity is applied to movable bodies
    pub use_gravity: bool,

    /// Gravity acceleration
    pub gravity: Vec3,

    /// Fraction of velocity removed per simulated second, in [0, 1)
    pub global_damping: f32,

    /// Use sweep-and-prune pruning instead of testing every pair
    pub use_broad_phase: bool,

    /// Length of one internal substep in seconds
    pub fixed_timestep: f32,

    /// Upper bound on substeps per frame; excess time is dropped
    pub max_substeps: u32,

    /// Constraint relaxation passes per substep
    pub constraint_iterations: u32,

    /// Fraction of penetration removed by positional projection, in [0, 1]
    pub penetration_correction: f32,

    /// Approach speeds below this resolve without bounce
    pub restitution_threshold: f32,

    /// Frames a contact pair stays alive without being re-confirmed
    pub collision_persistence_frames: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            use_gravity: false,
            gravity: Vec3::new(0.0, -9.8, 0.0),
            global_damping: 0.95,
            use_broad_phase: true,
            fixed_timestep: 1.0 / 120.0,
            max_substeps: 8,
            constraint_iterations: 10,
            penetration_correction: 1.0,
            restitution_threshold: 0.5,
            collision_persistence_frames: 5,
        }
    }
}

impl Config for PhysicsConfig {}

impl PhysicsConfig {
    /// Builder: enable or disable gravity
    pub fn with_gravity_enabled(mut self, enabled: bool) -> Self {
        self.use_gravity = enabled;
        self
    }

    /// Builder: set the gravity vector (does not enable it)
    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    /// Builder: set global damping
    pub fn with_global_damping(mut self, damping: f32) -> Self {
        self.global_damping = damping;
        self
    }

    /// Builder: enable or disable the broad phase
    pub fn with_broad_phase(mut self, enabled: bool) -> Self {
        self.use_broad_phase = enabled;
        self
    }

    /// Builder: set the substep length and cap
    pub fn with_timestep(mut self, fixed_timestep: f32, max_substeps: u32) -> Self {
        self.fixed_timestep = fixed_timestep;
        self.max_substeps = max_substeps;
        self
    }

    /// Builder: set constraint passes per substep
    pub fn with_constraint_solver(mut self, iterations: u32) -> Self {
        self.constraint_iterations = iterations;
        self
    }

    /// Per-substep velocity retention for a step of `dt` seconds
    pub fn damping_factor(&self, dt: f32) -> f32 {
        (1.0 - self.global_damping).powf(dt)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !utils::is_finite(&self.gravity) {
            return Err(ConfigError::Invalid("gravity must be finite".to_string()));
        }
        if !(0.0..1.0).contains(&self.global_damping) {
            return Err(ConfigError::Invalid(format!(
                "global_damping must be in [0, 1), got {}",
                self.global_damping
            )));
        }
        if !(self.fixed_timestep.is_finite() && self.fixed_timestep > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "fixed_timestep must be positive, got {}",
                self.fixed_timestep
            )));
        }
        if self.max_substeps == 0 {
            return Err(ConfigError::Invalid("max_substeps must be at least 1".to_string()));
        }
        if self.constraint_iterations == 0 {
            return Err(ConfigError::Invalid(
                "constraint_iterations must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.penetration_correction) {
            return Err(ConfigError::Invalid(format!(
                "penetration_correction must be in [0, 1], got {}",
                self.penetration_correction
            )));
        }
        if !(self.restitution_threshold.is_finite() && self.restitution_threshold >= 0.0) {
            return Err(ConfigError::Invalid(
                "restitution_threshold must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}
