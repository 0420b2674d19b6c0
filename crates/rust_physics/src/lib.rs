//! # Rust Physics
//!
//! Rigid-body dynamics and collision detection for a 3D game world.
//!
//! ## Features
//!
//! - **Fixed-step integration**: semi-implicit Euler with substep accumulation
//! - **Two-phase collision**: sweep-and-prune broad phase, exact narrow phase
//!   for spheres, axis-aligned boxes and oriented boxes (separating axes)
//! - **Impulse resolution**: restitution, Coulomb friction, positional projection
//! - **Constraints**: relaxed distance constraints between objects
//! - **Events**: per-object outboxes of collision begin/end notifications
//!
//! ## Quick Start
//!
//! ```rust
//! use rust_physics::prelude::*;
//!
//! let mut world = GameWorld::new();
//! world.add_object(
//!     GameObject::new("floor")
//!         .with_volume(CollisionVolume::aabb(Vec3::new(50.0, 1.0, 50.0)))
//!         .with_body(RigidBody::immovable()),
//! );
//! let ball = world.add_object(
//!     GameObject::new("ball")
//!         .with_position(Vec3::new(0.0, 10.0, 0.0))
//!         .with_volume(CollisionVolume::sphere(1.0))
//!         .with_body(RigidBody::new(1.0)),
//! );
//!
//! let config = PhysicsConfig::default().with_gravity_enabled(true);
//! let mut physics = PhysicsSystem::new(config).expect("valid config");
//! for _ in 0..60 {
//!     physics.update(&mut world, 1.0 / 60.0);
//! }
//! assert!(world.object(ball).map_or(false, |b| b.transform.position.y < 10.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod events;
pub mod physics;
pub mod world;

/// Common imports for physics users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, PhysicsConfig},
        events::{CollisionEvent, CollisionEventKind, EventOutbox},
        foundation::{
            collections::{ConstraintHandle, ObjectHandle},
            math::{Mat4, Quat, Transform, Vec3, Vec4},
        },
        physics::{
            CollisionLayers, CollisionType, CollisionVolume, Constraint, FrameStats,
            PhysicsSystem, PositionConstraint, Ray, RayHit, RigidBody,
        },
        world::{GameObject, GameWorld, RenderHandle, WorldError},
    };
}
