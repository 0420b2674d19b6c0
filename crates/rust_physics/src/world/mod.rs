//! World: the authoritative container of game objects and constraints
//!
//! Objects and constraints live in slot-map arenas and are referred to by
//! handle everywhere else. A separate order list fixes the iteration order
//! used by the physics step and ray casts; it can be shuffled each update to
//! keep the solver from favouring whatever was added first.

mod game_object;

pub use game_object::{GameObject, RenderHandle};

use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::foundation::collections::{ConstraintHandle, ConstraintMap, ObjectHandle, ObjectMap};
use crate::physics::collision::{ray_volume, Ray, RayHit};
use crate::physics::Constraint;

/// World errors
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldError {
    /// The handle does not refer to a live object
    #[error("Unknown object: {0:?}")]
    UnknownObject(ObjectHandle),

    /// Both ends of a constraint are the same object
    #[error("Constraint joins object {0:?} to itself")]
    SelfConstraint(ObjectHandle),
}

/// Container for every object and constraint in a level
pub struct GameWorld {
    objects: ObjectMap<GameObject>,
    object_order: Vec<ObjectHandle>,
    constraints: ConstraintMap<Box<dyn Constraint>>,
    constraint_order: Vec<ConstraintHandle>,
    shuffle_objects: bool,
    shuffle_constraints: bool,
    rng: StdRng,
    world_id_counter: u32,
}

impl std::fmt::Debug for GameWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameWorld")
            .field("objects", &self.objects.len())
            .field("constraints", &self.constraints.len())
            .field("shuffle_objects", &self.shuffle_objects)
            .field("shuffle_constraints", &self.shuffle_constraints)
            .finish()
    }
}

impl Default for GameWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl GameWorld {
    /// Create an empty world with an entropy-seeded shuffler
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create an empty world whose shuffles are reproducible
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            objects: ObjectMap::with_key(),
            object_order: Vec::new(),
            constraints: ConstraintMap::with_key(),
            constraint_order: Vec::new(),
            shuffle_objects: false,
            shuffle_constraints: false,
            rng,
            world_id_counter: 0,
        }
    }

    /// Register an object, assigning it the next world id
    pub fn add_object(&mut self, mut object: GameObject) -> ObjectHandle {
        object.set_world_id(self.world_id_counter);
        self.world_id_counter += 1;

        let handle = self.objects.insert(object);
        self.object_order.push(handle);
        handle
    }

    /// Remove an object; constraints that use it become inert
    pub fn remove_object(&mut self, handle: ObjectHandle) -> Option<GameObject> {
        let object = self.objects.remove(handle)?;
        self.object_order.retain(|&h| h != handle);
        Some(object)
    }

    /// Register a constraint between two live, distinct objects
    pub fn add_constraint(&mut self, constraint: impl Constraint + 'static) -> Result<ConstraintHandle, WorldError> {
        let (a, b) = constraint.bodies();
        if a == b {
            return Err(WorldError::SelfConstraint(a));
        }
        for handle in [a, b] {
            if !self.objects.contains_key(handle) {
                return Err(WorldError::UnknownObject(handle));
            }
        }

        let handle = self.constraints.insert(Box::new(constraint));
        self.constraint_order.push(handle);
        Ok(handle)
    }

    /// Remove a constraint
    pub fn remove_constraint(&mut self, handle: ConstraintHandle) -> bool {
        if self.constraints.remove(handle).is_none() {
            return false;
        }
        self.constraint_order.retain(|&h| h != handle);
        true
    }

    /// Drop every object and constraint; world ids keep counting
    pub fn clear(&mut self) {
        log::info!(
            "Clearing world: {} objects, {} constraints",
            self.objects.len(),
            self.constraints.len()
        );
        self.objects.clear();
        self.object_order.clear();
        self.constraints.clear();
        self.constraint_order.clear();
    }

    /// Drop everything and restart world ids from zero
    pub fn clear_and_erase(&mut self) {
        self.clear();
        self.world_id_counter = 0;
    }

    /// Look up an object
    pub fn object(&self, handle: ObjectHandle) -> Option<&GameObject> {
        self.objects.get(handle)
    }

    /// Look up an object mutably
    pub fn object_mut(&mut self, handle: ObjectHandle) -> Option<&mut GameObject> {
        self.objects.get_mut(handle)
    }

    /// Borrow two distinct objects at once
    pub fn object_pair_mut(&mut self, a: ObjectHandle, b: ObjectHandle) -> Option<[&mut GameObject; 2]> {
        self.objects.get_disjoint_mut([a, b])
    }

    /// Look up a constraint
    pub fn constraint(&self, handle: ConstraintHandle) -> Option<&dyn Constraint> {
        self.constraints.get(handle).map(|constraint| constraint.as_ref())
    }

    /// Objects in iteration order
    pub fn objects(&self) -> impl Iterator<Item = (ObjectHandle, &GameObject)> + '_ {
        self.object_order
            .iter()
            .filter_map(|&handle| self.objects.get(handle).map(|object| (handle, object)))
    }

    /// Object handles in iteration order
    pub fn handles(&self) -> &[ObjectHandle] {
        &self.object_order
    }

    /// Constraint handles in solve order
    pub fn constraint_handles(&self) -> &[ConstraintHandle] {
        &self.constraint_order
    }

    /// Number of objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the world holds no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of constraints
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Visit every object mutably, in iteration order
    pub fn operate_on_contents(&mut self, mut f: impl FnMut(ObjectHandle, &mut GameObject)) {
        for &handle in &self.object_order {
            if let Some(object) = self.objects.get_mut(handle) {
                f(handle, object);
            }
        }
    }

    /// Run every constraint once, in solve order
    pub fn update_constraints(&mut self, dt: f32) {
        for &handle in &self.constraint_order {
            if let Some(constraint) = self.constraints.get(handle) {
                constraint.update_constraint(&mut self.objects, dt);
            }
        }
    }

    /// Shuffle object order on every [`GameWorld::update_world`]
    pub fn shuffle_objects(&mut self, enabled: bool) {
        self.shuffle_objects = enabled;
    }

    /// Shuffle constraint order on every [`GameWorld::update_world`]
    pub fn shuffle_constraints(&mut self, enabled: bool) {
        self.shuffle_constraints = enabled;
    }

    /// Per-frame housekeeping; applies the enabled shuffles
    pub fn update_world(&mut self) {
        if self.shuffle_objects {
            self.object_order.shuffle(&mut self.rng);
        }
        if self.shuffle_constraints {
            self.constraint_order.shuffle(&mut self.rng);
        }
    }

    /// Nearest hit among active objects with a volume that pass `filter`
    ///
    /// Equal distances go to the lowest world id, so the answer does not
    /// depend on the (possibly shuffled) iteration order.
    pub fn raycast(&self, ray: &Ray, mut filter: impl FnMut(ObjectHandle, &GameObject) -> bool) -> Option<RayHit> {
        let mut closest: Option<(RayHit, Option<u32>)> = None;

        for (handle, object) in self.objects() {
            if !object.active || !filter(handle, object) {
                continue;
            }
            let Some(volume) = object.volume() else {
                continue;
            };
            let Some(hit) = ray_volume(ray, volume, &object.transform) else {
                continue;
            };
            let world_id = object.world_id();
            let nearer = closest.map_or(true, |(best, best_id)| match hit.distance.total_cmp(&best.distance) {
                Ordering::Less => true,
                Ordering::Equal => world_id < best_id,
                Ordering::Greater => false,
            });
            if nearer {
                let hit = RayHit {
                    object: handle,
                    distance: hit.distance,
                    point: hit.point,
                    normal: hit.normal,
                };
                closest = Some((hit, world_id));
            }
        }

        closest.map(|(hit, _)| hit)
    }

    /// Nearest hit among all active objects
    pub fn raycast_closest(&self, ray: &Ray) -> Option<RayHit> {
        self.raycast(ray, |_, _| true)
    }
}
