//! Arena handles for world storage
//!
//! Objects and constraints live in slot maps owned by the world. Everything
//! else (constraints, contacts, events, ray hits) refers to them through these
//! copyable keys, never through references.

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable handle to a [`GameObject`](crate::world::GameObject) inside a world
    pub struct ObjectHandle;

    /// Stable handle to a constraint inside a world
    pub struct ConstraintHandle;
}

/// Storage for game objects keyed by handle
pub type ObjectMap<T> = SlotMap<ObjectHandle, T>;

/// Storage for constraints keyed by handle
pub type ConstraintMap<T> = SlotMap<ConstraintHandle, T>;
