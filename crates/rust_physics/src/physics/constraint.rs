//! Constraints between pairs of objects
//!
//! Constraints are stored in the world next to the objects they join and are
//! solved by the physics system once per relaxation pass. They refer to their
//! bodies by handle; a constraint whose body has been removed does nothing.

use std::fmt::Debug;

use crate::foundation::collections::{ObjectHandle, ObjectMap};
use crate::foundation::math::Vec3;
use crate::world::GameObject;

/// Default fraction of the distance error removed per pass
pub const DEFAULT_RELAXATION: f32 = 0.5;

/// Below this separation the constraint axis is undefined
const MIN_SEPARATION: f32 = 1e-6;

/// A rule the solver enforces between two objects
pub trait Constraint: Debug {
    /// Move the joined objects towards satisfying the constraint
    fn update_constraint(&self, objects: &mut ObjectMap<GameObject>, dt: f32);

    /// The two objects this constraint joins
    fn bodies(&self) -> (ObjectHandle, ObjectHandle);
}

/// Keeps two objects a fixed distance apart, like a rigid rod
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionConstraint {
    /// First object
    pub a: ObjectHandle,
    /// Second object
    pub b: ObjectHandle,
    /// Target centre-to-centre distance
    pub distance: f32,
    /// Fraction of the error corrected per pass, in (0, 1]
    pub relaxation: f32,
}

impl PositionConstraint {
    /// Create a constraint with the default relaxation
    pub fn new(a: ObjectHandle, b: ObjectHandle, distance: f32) -> Self {
        debug_assert!(distance.is_finite() && distance >= 0.0, "constraint distance must be non-negative");
        Self {
            a,
            b,
            distance,
            relaxation: DEFAULT_RELAXATION,
        }
    }

    /// Builder: set the relaxation factor
    pub fn with_relaxation(mut self, relaxation: f32) -> Self {
        debug_assert!(relaxation > 0.0 && relaxation <= 1.0, "relaxation must be in (0, 1]");
        self.relaxation = relaxation;
        self
    }
}

impl Constraint for PositionConstraint {
    fn update_constraint(&self, objects: &mut ObjectMap<GameObject>, _dt: f32) {
        let Some([a, b]) = objects.get_disjoint_mut([self.a, self.b]) else {
            return;
        };

        let relative = a.transform.position - b.transform.position;
        let current = relative.magnitude();
        if current < MIN_SEPARATION {
            return;
        }

        let inverse_a = a.inverse_mass();
        let inverse_b = b.inverse_mass();
        let total = inverse_a + inverse_b;
        if total == 0.0 {
            return; // Both ends immovable
        }

        let axis = relative / current;
        let offset = self.distance - current;
        let correction = axis * (offset * self.relaxation);

        a.transform.translate(correction * (inverse_a / total));
        b.transform.translate(-correction * (inverse_b / total));

        // Cancel velocity along the rod so the bodies do not spring back
        let velocity_a = a.body().map_or_else(Vec3::zeros, |body| body.linear_velocity);
        let velocity_b = b.body().map_or_else(Vec3::zeros, |body| body.linear_velocity);
        let axial = (velocity_a - velocity_b).dot(&axis);
        let impulse = axis * (-axial / total);

        if let Some(body) = a.body_mut() {
            body.apply_linear_impulse(impulse);
        }
        if let Some(body) = b.body_mut() {
            body.apply_linear_impulse(-impulse);
        }
    }

    fn bodies(&self) -> (ObjectHandle, ObjectHandle) {
        (self.a, self.b)
    }
}
