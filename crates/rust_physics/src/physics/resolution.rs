//! Impulse-based contact resolution
//!
//! One contact is resolved in three moves:
//! 1. Positional projection along the normal, split by inverse mass
//! 2. A normal impulse enforcing the restitution law at the contact point.
//!    The bounce is computed from the approach speed before this substep's
//!    forces, so gravity gained during the contact substep is absorbed
//!    instead of being reflected
//! 3. A Coulomb friction impulse along the tangential slip direction
//!
//! Objects without a rigid body take part as immovable partners with
//! neutral (1.0) elasticity and friction.

use crate::foundation::math::{Mat3, Vec3};
use crate::world::GameObject;

use super::collision::ContactInfo;

/// Slip speeds below this produce no friction impulse
const MIN_TANGENT_SPEED: f32 = 1e-6;

/// Tunables shared by every contact in a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolutionSettings {
    /// Fraction of penetration removed by projection, in [0, 1]
    pub penetration_correction: f32,
    /// Approach speeds below this do not bounce
    pub restitution_threshold: f32,
}

impl Default for ResolutionSettings {
    fn default() -> Self {
        Self {
            penetration_correction: 1.0,
            restitution_threshold: 0.5,
        }
    }
}

/// Mass properties and velocity of one side of a contact
struct Side {
    inverse_mass: f32,
    inverse_inertia: Mat3,
    arm: Vec3,
    elasticity: f32,
    friction: f32,
}

impl Side {
    fn of(object: &GameObject, point: Vec3) -> Self {
        let arm = point - object.transform.position;
        match object.body() {
            Some(body) => Self {
                inverse_mass: body.inverse_mass(),
                inverse_inertia: if body.is_immovable() { Mat3::zeros() } else { *body.inverse_inertia_tensor() },
                arm,
                elasticity: body.elasticity,
                friction: body.friction,
            },
            None => Self {
                inverse_mass: 0.0,
                inverse_inertia: Mat3::zeros(),
                arm,
                elasticity: 1.0,
                friction: 1.0,
            },
        }
    }

    fn angular_effect(&self, direction: &Vec3) -> Vec3 {
        (self.inverse_inertia * self.arm.cross(direction)).cross(&self.arm)
    }
}

/// Resolve one confirmed contact between `a` and `b`
///
/// `contact.normal` points from `a` towards `b`. Both objects are tagged
/// with the other's collision type even when neither can move.
pub fn resolve_contact(a: &mut GameObject, b: &mut GameObject, contact: &ContactInfo, settings: &ResolutionSettings) {
    a.set_last_collision(b.collision_type());
    b.set_last_collision(a.collision_type());

    let point = contact.centroid();
    let side_a = Side::of(a, point);
    let side_b = Side::of(b, point);

    let total_inverse_mass = side_a.inverse_mass + side_b.inverse_mass;
    if total_inverse_mass == 0.0 {
        return;
    }

    let normal = contact.normal;

    // Separate the volumes first
    let correction = normal * (contact.penetration * settings.penetration_correction / total_inverse_mass);
    a.transform.translate(-correction * side_a.inverse_mass);
    b.transform.translate(correction * side_b.inverse_mass);

    let relative_velocity = contact_velocity(b, &side_b) - contact_velocity(a, &side_a);
    let normal_speed = relative_velocity.dot(&normal);
    if normal_speed > 0.0 {
        return; // Already separating
    }

    let approach_speed = (approach_velocity(b, &side_b) - approach_velocity(a, &side_a))
        .dot(&normal)
        .min(0.0);
    let restitution = if -approach_speed > settings.restitution_threshold {
        side_a.elasticity * side_b.elasticity
    } else {
        0.0
    };

    let angular = (side_a.angular_effect(&normal) + side_b.angular_effect(&normal)).dot(&normal);
    let normal_impulse = -(normal_speed + restitution * approach_speed) / (total_inverse_mass + angular);
    apply_impulse(a, &side_a, b, &side_b, normal * normal_impulse);

    // Friction against whatever slip is left
    let relative_velocity = contact_velocity(b, &side_b) - contact_velocity(a, &side_a);
    let tangent_velocity = relative_velocity - normal * relative_velocity.dot(&normal);
    let tangent_speed = tangent_velocity.magnitude();
    if tangent_speed < MIN_TANGENT_SPEED {
        return;
    }
    let tangent = tangent_velocity / tangent_speed;

    let angular = (side_a.angular_effect(&tangent) + side_b.angular_effect(&tangent)).dot(&tangent);
    let limit = side_a.friction * side_b.friction * normal_impulse;
    let friction_impulse = (-tangent_speed / (total_inverse_mass + angular)).clamp(-limit, limit);
    apply_impulse(a, &side_a, b, &side_b, tangent * friction_impulse);
}

fn contact_velocity(object: &GameObject, side: &Side) -> Vec3 {
    object.body().map_or_else(Vec3::zeros, |body| body.velocity_at(&side.arm))
}

fn approach_velocity(object: &GameObject, side: &Side) -> Vec3 {
    object
        .body()
        .map_or_else(Vec3::zeros, |body| body.velocity_before_forces_at(&side.arm))
}

/// `impulse` acts on `b`; `a` receives the opposite
fn apply_impulse(a: &mut GameObject, side_a: &Side, b: &mut GameObject, side_b: &Side, impulse: Vec3) {
    if let Some(body) = a.body_mut() {
        body.apply_linear_impulse(-impulse);
        body.apply_angular_impulse(side_a.arm.cross(&-impulse));
    }
    if let Some(body) = b.body_mut() {
        body.apply_linear_impulse(impulse);
        body.apply_angular_impulse(side_b.arm.cross(&impulse));
    }
}
