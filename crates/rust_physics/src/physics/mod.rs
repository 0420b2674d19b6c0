//! Physics module: rigid bodies, collision detection and response
//!
//! The [`PhysicsSystem`] drives everything else in this module once per
//! frame. The other modules are usable on their own: the narrow phase and
//! ray tests in [`collision`] are pure functions, and [`integrator`] and
//! [`resolution`] operate on single objects.

pub mod collision;
pub mod collision_layers;
pub mod rigid_body;
pub mod broad_phase;
pub mod integrator;
pub mod resolution;
pub mod constraint;
pub mod system;

#[cfg(test)]
mod tests;

pub use collision::{
    BoundingBox,
    CollisionVolume,
    Contact,
    ContactInfo,
    Ray,
    RayHit,
    VolumeType,
};
pub use collision_layers::CollisionLayers;
pub use rigid_body::{CollisionType, RigidBody};
pub use broad_phase::{BroadPhase, BroadPhaseEntry, BruteForce, CollisionPair, SweepAndPrune};
pub use resolution::ResolutionSettings;
pub use constraint::{Constraint, PositionConstraint};
pub use system::{FrameStats, PhysicsSystem};
