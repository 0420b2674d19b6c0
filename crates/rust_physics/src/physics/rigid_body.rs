//! Rigid body state
//!
//! A [`RigidBody`] holds everything the integrator and the contact solver
//! need besides the transform: mass properties, velocities and the forces
//! accumulated by gameplay code since the last step. Bodies with an inverse
//! mass of zero are immovable; the step never changes their transform.

use crate::foundation::math::{utils, Mat3, Quat, Vec3};

use super::collision::CollisionVolume;

/// Default restitution
pub const DEFAULT_ELASTICITY: f32 = 0.8;

/// Default friction coefficient
pub const DEFAULT_FRICTION: f32 = 0.8;

/// Gameplay tag describing what kind of thing a body is
///
/// Physics only copies it around; gameplay decides what touching a
/// [`CollisionType::Lake`] or a [`CollisionType::Trampoline`] means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CollisionType {
    /// Untagged
    #[default]
    None,
    /// The player character
    Player,
    /// Walkable ground
    Floor,
    /// Level boundary
    Wall,
    /// Water that slows whatever falls in
    Lake,
    /// Launches bodies upwards
    Trampoline,
    /// Drop-off point for collected items
    Home,
    /// Item the player can pick up
    Collectable,
    /// AI controlled character
    Ai,
    /// Static prop with no gameplay meaning
    Immovable,
}

/// Physical state of a simulated body
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    inverse_mass: f32,

    /// Restitution in [0, 1]
    pub elasticity: f32,

    /// Friction coefficient, non-negative
    pub friction: f32,

    /// Linear velocity in world space
    pub linear_velocity: Vec3,

    /// Angular velocity in world space (radians per second about each axis)
    pub angular_velocity: Vec3,

    force: Vec3,
    torque: Vec3,

    /// Diagonal of the body-space inverse inertia tensor
    inverse_inertia: Vec3,

    /// Inverse inertia tensor rotated into world space
    inverse_inertia_tensor: Mat3,

    /// Linear and angular velocity gained from forces in the current substep
    step_delta: (Vec3, Vec3),

    /// Gameplay tag reported to the other body on contact
    pub collision_type: CollisionType,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl RigidBody {
    /// Create a body with the given inverse mass and unit inertia
    pub fn new(inverse_mass: f32) -> Self {
        debug_assert!(
            inverse_mass.is_finite() && inverse_mass >= 0.0,
            "inverse mass must be finite and non-negative"
        );
        Self {
            inverse_mass,
            elasticity: DEFAULT_ELASTICITY,
            friction: DEFAULT_FRICTION,
            linear_velocity: Vec3::zeros(),
            angular_velocity: Vec3::zeros(),
            force: Vec3::zeros(),
            torque: Vec3::zeros(),
            inverse_inertia: Vec3::repeat(1.0),
            inverse_inertia_tensor: Mat3::identity(),
            step_delta: (Vec3::zeros(), Vec3::zeros()),
            collision_type: CollisionType::None,
        }
    }

    /// Create a body that never moves
    pub fn immovable() -> Self {
        let mut body = Self::new(0.0);
        body.inverse_inertia = Vec3::zeros();
        body.inverse_inertia_tensor = Mat3::zeros();
        body
    }

    /// Builder: set restitution
    pub fn with_elasticity(mut self, elasticity: f32) -> Self {
        self.elasticity = elasticity;
        self
    }

    /// Builder: set friction
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    /// Builder: set the gameplay tag
    pub fn with_collision_type(mut self, collision_type: CollisionType) -> Self {
        self.collision_type = collision_type;
        self
    }

    /// Builder: derive inertia from a collision volume
    pub fn with_inertia_for(mut self, volume: &CollisionVolume) -> Self {
        self.init_inertia_for(volume);
        self
    }

    /// Inverse mass (0 means immovable)
    pub fn inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    /// Change the inverse mass; inertia is not recomputed
    pub fn set_inverse_mass(&mut self, inverse_mass: f32) {
        debug_assert!(
            inverse_mass.is_finite() && inverse_mass >= 0.0,
            "inverse mass must be finite and non-negative"
        );
        self.inverse_mass = inverse_mass;
    }

    /// True for infinite-mass bodies
    pub fn is_immovable(&self) -> bool {
        self.inverse_mass == 0.0
    }

    /// Force accumulated since the last clear
    pub fn force(&self) -> Vec3 {
        self.force
    }

    /// Torque accumulated since the last clear
    pub fn torque(&self) -> Vec3 {
        self.torque
    }

    /// Body-space inverse inertia diagonal
    pub fn inverse_inertia(&self) -> Vec3 {
        self.inverse_inertia
    }

    /// World-space inverse inertia tensor as of the last refresh
    pub fn inverse_inertia_tensor(&self) -> &Mat3 {
        &self.inverse_inertia_tensor
    }

    /// Accumulate a force through the centre of mass
    pub fn add_force(&mut self, force: Vec3) {
        self.force += force;
    }

    /// Accumulate a force applied at a world position, producing torque about `centre`
    pub fn add_force_at_position(&mut self, force: Vec3, position: Vec3, centre: Vec3) {
        let arm = position - centre;
        self.force += force;
        self.torque += arm.cross(&force);
    }

    /// Accumulate a torque
    pub fn add_torque(&mut self, torque: Vec3) {
        self.torque += torque;
    }

    /// Instant change of linear momentum
    pub fn apply_linear_impulse(&mut self, impulse: Vec3) {
        self.linear_velocity += impulse * self.inverse_mass;
    }

    /// Instant change of angular momentum
    pub fn apply_angular_impulse(&mut self, impulse: Vec3) {
        if self.is_immovable() {
            return;
        }
        self.angular_velocity += self.inverse_inertia_tensor * impulse;
    }

    /// Zero the accumulated force and torque
    pub fn clear_forces(&mut self) {
        self.force = Vec3::zeros();
        self.torque = Vec3::zeros();
    }

    /// Velocity of a point at `arm` from the centre of mass
    pub fn velocity_at(&self, arm: &Vec3) -> Vec3 {
        self.linear_velocity + self.angular_velocity.cross(arm)
    }

    /// Like [`Self::velocity_at`], minus what forces added in the current substep
    pub fn velocity_before_forces_at(&self, arm: &Vec3) -> Vec3 {
        let (linear, angular) = self.step_delta;
        self.velocity_at(arm) - (linear + angular.cross(arm))
    }

    pub(crate) fn set_step_delta(&mut self, linear: Vec3, angular: Vec3) {
        self.step_delta = (linear, angular);
    }

    /// Solid box inertia from half extents, scaled by the current inverse mass
    pub fn init_cube_inertia(&mut self, half_extents: Vec3) {
        let dimensions = half_extents * 2.0;
        let sq = dimensions.component_mul(&dimensions);

        self.inverse_inertia = Vec3::new(
            12.0 * self.inverse_mass / (sq.y + sq.z),
            12.0 * self.inverse_mass / (sq.x + sq.z),
            12.0 * self.inverse_mass / (sq.x + sq.y),
        );
        debug_assert!(utils::is_finite(&self.inverse_inertia), "degenerate box inertia");
    }

    /// Solid sphere inertia, scaled by the current inverse mass
    pub fn init_sphere_inertia(&mut self, radius: f32) {
        let i = 2.5 * self.inverse_mass / (radius * radius);
        self.inverse_inertia = Vec3::repeat(i);
        debug_assert!(i.is_finite(), "degenerate sphere inertia");
    }

    /// Thin-shelled sphere inertia, scaled by the current inverse mass
    pub fn init_hollow_sphere_inertia(&mut self, radius: f32) {
        let i = 1.5 * self.inverse_mass / (radius * radius);
        self.inverse_inertia = Vec3::repeat(i);
        debug_assert!(i.is_finite(), "degenerate sphere inertia");
    }

    /// Pick the inertia model matching a volume
    pub fn init_inertia_for(&mut self, volume: &CollisionVolume) {
        match volume {
            CollisionVolume::Sphere { radius } => self.init_sphere_inertia(*radius),
            CollisionVolume::Aabb { half_extents } | CollisionVolume::Obb { half_extents } => {
                self.init_cube_inertia(*half_extents);
            }
        }
    }

    /// Rotate the body-space inverse inertia into world space
    pub fn update_inertia_tensor(&mut self, orientation: &Quat) {
        let rotation = orientation.to_rotation_matrix().into_inner();
        self.inverse_inertia_tensor =
            rotation * Mat3::from_diagonal(&self.inverse_inertia) * rotation.transpose();
    }
}
