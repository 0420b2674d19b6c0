//! Collision geometry and exact intersection tests
//!
//! # Architecture
//!
//! - **Model space storage**: volumes only carry extents; position and
//!   orientation come from the owning object's transform at test time
//! - **Closed shape set**: [`CollisionVolume`] is an enum and every pair
//!   dispatch is an exhaustive `match`
//! - **No side effects**: tests only report geometry, resolution lives in
//!   [`crate::physics::resolution`]
//!
//! # Module Organization
//!
//! - [`volume`] - Sphere, axis-aligned box and oriented box volumes
//! - [`primitives`] - Rays, world-axis bounding boxes and ray tests
//! - [`narrow_phase`] - Pairwise volume intersection with contact data

pub mod volume;
pub mod primitives;
pub mod narrow_phase;

// Re-export commonly used types
pub use volume::{CollisionVolume, VolumeType};
pub use primitives::{BoundingBox, Ray, RayHit, RayIntersection, ray_volume};
pub use narrow_phase::{Contact, ContactInfo, test_intersection};
