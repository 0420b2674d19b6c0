//! Broad-phase pair pruning
//!
//! The broad phase turns the full O(n²) pair set into a short candidate list
//! using the world-axis bounding boxes refreshed at the start of each
//! collision pass. Candidates are only a superset; the narrow phase decides.

use std::cmp::Ordering;

use crate::foundation::collections::ObjectHandle;
use crate::physics::collision::BoundingBox;
use crate::physics::CollisionLayers;
use crate::world::GameWorld;

/// Collision pair representing two objects that may be colliding
///
/// Always stores the smaller handle first, so `(a, b)` and `(b, a)` produce
/// the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionPair {
    /// Smaller handle
    pub a: ObjectHandle,
    /// Larger handle
    pub b: ObjectHandle,
}

impl CollisionPair {
    /// Create a new collision pair in canonical order
    pub fn new(first: ObjectHandle, second: ObjectHandle) -> Self {
        if first <= second {
            Self { a: first, b: second }
        } else {
            Self { a: second, b: first }
        }
    }

    /// Whether `handle` is one of the two objects
    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.a == handle || self.b == handle
    }
}

/// What the broad phase needs to know about one object
#[derive(Debug, Clone, Copy)]
pub struct BroadPhaseEntry {
    /// Object the bounds belong to
    pub handle: ObjectHandle,
    /// World-axis bounds for this pass
    pub bounds: BoundingBox,
    /// Layers the object occupies
    pub layer: CollisionLayers,
    /// Layers the object collides with
    pub mask: CollisionLayers,
    /// Whether the object has a rigid body with finite mass
    pub movable: bool,
}

impl BroadPhaseEntry {
    /// Whether this pair is worth handing to the narrow phase at all
    pub fn can_collide_with(&self, other: &Self) -> bool {
        (self.movable || other.movable)
            && CollisionLayers::should_collide(self.layer, self.mask, other.layer, other.mask)
    }
}

/// Strategy producing candidate pairs
pub trait BroadPhase {
    /// Candidate pairs, sorted and free of duplicates
    fn find_pairs(&mut self, entries: &[BroadPhaseEntry]) -> Vec<CollisionPair>;

    /// Short name for logging
    fn name(&self) -> &'static str;
}

/// Refresh every active object's bounds and collect the broad-phase input
///
/// Objects are visited in world order; inactive or volume-less objects are
/// left out.
pub fn collect_entries(world: &mut GameWorld) -> Vec<BroadPhaseEntry> {
    let mut entries = Vec::with_capacity(world.len());
    world.operate_on_contents(|handle, object| {
        if !object.active {
            return;
        }
        if let Some(bounds) = object.update_broad_phase_bounds() {
            entries.push(BroadPhaseEntry {
                handle,
                bounds,
                layer: object.layer,
                mask: object.mask,
                movable: object.is_movable(),
            });
        }
    });
    entries
}

/// Sort-and-sweep along the world X axis
///
/// Entries are sorted by their minimum X; each entry is then only compared
/// against the entries whose X interval starts before it ends. Surviving
/// pairs get the full three-axis overlap check.
#[derive(Debug, Default)]
pub struct SweepAndPrune {
    order: Vec<usize>,
}

impl SweepAndPrune {
    /// Create an empty sweep
    pub fn new() -> Self {
        Self::default()
    }
}

impl BroadPhase for SweepAndPrune {
    fn find_pairs(&mut self, entries: &[BroadPhaseEntry]) -> Vec<CollisionPair> {
        self.order.clear();
        self.order.extend(0..entries.len());
        self.order.sort_by(|&i, &j| {
            entries[i]
                .bounds
                .min
                .x
                .total_cmp(&entries[j].bounds.min.x)
                .then_with(|| entries[i].handle.cmp(&entries[j].handle))
        });

        let mut pairs = Vec::new();
        for (position, &i) in self.order.iter().enumerate() {
            let first = &entries[i];
            for &j in &self.order[position + 1..] {
                let second = &entries[j];
                if second.bounds.min.x.total_cmp(&first.bounds.max.x) == Ordering::Greater {
                    break;
                }
                if first.bounds.intersects(&second.bounds) && first.can_collide_with(second) {
                    pairs.push(CollisionPair::new(first.handle, second.handle));
                }
            }
        }

        pairs.sort_unstable();
        pairs.dedup();
        pairs
    }

    fn name(&self) -> &'static str {
        "sweep-and-prune"
    }
}

/// Every eligible pair, no spatial pruning at all
#[derive(Debug, Default, Clone, Copy)]
pub struct BruteForce;

impl BroadPhase for BruteForce {
    fn find_pairs(&mut self, entries: &[BroadPhaseEntry]) -> Vec<CollisionPair> {
        let mut pairs = Vec::new();
        for (index, first) in entries.iter().enumerate() {
            for second in &entries[index + 1..] {
                if first.can_collide_with(second) {
                    pairs.push(CollisionPair::new(first.handle, second.handle));
                }
            }
        }
        pairs.sort_unstable();
        pairs.dedup();
        pairs
    }

    fn name(&self) -> &'static str {
        "brute-force"
    }
}
