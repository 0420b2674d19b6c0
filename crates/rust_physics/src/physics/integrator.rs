//! Semi-implicit Euler integration
//!
//! Split in two halves so the solver can run between them: [`integrate_accel`]
//! turns accumulated forces into velocity, [`integrate_velocity`] turns
//! velocity into a new transform. Immovable bodies are skipped by both.

use crate::foundation::math::{Quaternion, Vec3};
use crate::world::GameObject;

/// Advance velocities from forces (and gravity, when given) over `dt`
///
/// `damping` is the per-step retention factor applied to both linear and
/// angular velocity after the forces are added. The change is recorded on
/// the body so contact resolution can tell it apart from approach speed.
pub fn integrate_accel(object: &mut GameObject, gravity: Option<Vec3>, damping: f32, dt: f32) {
    let (transform, Some(body)) = object.transform_and_body_mut() else {
        return;
    };
    if body.is_immovable() {
        body.set_step_delta(Vec3::zeros(), Vec3::zeros());
        return;
    }
    let (linear_before, angular_before) = (body.linear_velocity, body.angular_velocity);

    let mut acceleration = body.force() * body.inverse_mass();
    if let Some(gravity) = gravity {
        acceleration += gravity;
    }
    body.linear_velocity = (body.linear_velocity + acceleration * dt) * damping;

    body.update_inertia_tensor(&transform.orientation());
    let angular_acceleration = body.inverse_inertia_tensor() * body.torque();
    body.angular_velocity = (body.angular_velocity + angular_acceleration * dt) * damping;

    body.set_step_delta(
        body.linear_velocity - linear_before,
        body.angular_velocity - angular_before,
    );
}

/// Advance the transform from the current velocities over `dt`
pub fn integrate_velocity(object: &mut GameObject, dt: f32) {
    let (transform, Some(body)) = object.transform_and_body_mut() else {
        return;
    };
    if body.is_immovable() {
        return;
    }

    transform.translate(body.linear_velocity * dt);

    // q' = q + 0.5 * w * q * dt, renormalised on assignment
    let orientation = transform.orientation().into_inner();
    let spin = Quaternion::from_imag(body.angular_velocity) * orientation;
    transform.set_orientation_raw(orientation + spin * (0.5 * dt));

    debug_assert!(
        transform.position.iter().all(|c| c.is_finite()),
        "integration produced a non-finite position"
    );
}
