//! Game objects: transform plus optional volume, body and render handle

use crate::events::{CollisionEvent, EventOutbox};
use crate::foundation::math::{Mat4, Transform, Vec3, Vec4};
use crate::physics::collision::{BoundingBox, CollisionVolume};
use crate::physics::{CollisionLayers, CollisionType, RigidBody};

/// Opaque visual description, never read by physics
#[derive(Debug, Clone, PartialEq)]
pub struct RenderHandle {
    /// Mesh identifier understood by the renderer
    pub mesh: String,
    /// RGBA colour
    pub colour: Vec4,
}

impl RenderHandle {
    /// Create a render handle
    pub fn new(mesh: impl Into<String>, colour: Vec4) -> Self {
        Self { mesh: mesh.into(), colour }
    }
}

/// Anything that lives in a [`GameWorld`](super::GameWorld)
///
/// Objects without a [`RigidBody`] still collide but behave as immovable.
/// Objects without a volume are skipped by collision detection and ray
/// casts entirely.
#[derive(Debug, Clone)]
pub struct GameObject {
    name: String,
    world_id: Option<u32>,

    /// World space placement
    pub transform: Transform,

    volume: Option<CollisionVolume>,
    body: Option<RigidBody>,
    render: Option<RenderHandle>,

    /// Inactive objects are neither simulated nor hit by rays
    pub active: bool,

    /// Whether the player can pick this up
    pub collectable: bool,

    /// Set by gameplay once picked up
    pub collected: bool,

    /// Free-form status text for debug display
    pub state_description: String,

    /// Where [`GameObject::reset_to_spawn`] puts the object back
    pub spawn_position: Vec3,

    /// Layers this object occupies
    pub layer: CollisionLayers,

    /// Layers this object collides with
    pub mask: CollisionLayers,

    broad_phase_bounds: Option<BoundingBox>,
    last_collision: CollisionType,
    outbox: EventOutbox,
}

impl GameObject {
    /// Create an active object at the origin with nothing attached
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            world_id: None,
            transform: Transform::identity(),
            volume: None,
            body: None,
            render: None,
            active: true,
            collectable: false,
            collected: false,
            state_description: String::new(),
            spawn_position: Vec3::zeros(),
            layer: CollisionLayers::ALL,
            mask: CollisionLayers::ALL,
            broad_phase_bounds: None,
            last_collision: CollisionType::None,
            outbox: EventOutbox::new(),
        }
    }

    /// Builder: place the object, also recording it as the spawn position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self.spawn_position = position;
        self
    }

    /// Builder: replace the whole transform, spawn position included
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.spawn_position = transform.position;
        self.transform = transform;
        self
    }

    /// Builder: attach a collision volume
    pub fn with_volume(mut self, volume: CollisionVolume) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Builder: attach a rigid body
    pub fn with_body(mut self, mut body: RigidBody) -> Self {
        body.update_inertia_tensor(&self.transform.orientation());
        self.body = Some(body);
        self
    }

    /// Builder: attach a render handle
    pub fn with_render(mut self, render: RenderHandle) -> Self {
        self.render = Some(render);
        self
    }

    /// Builder: set collision layer and mask
    pub fn with_layers(mut self, layer: CollisionLayers, mask: CollisionLayers) -> Self {
        self.layer = layer;
        self.mask = mask;
        self
    }

    /// Builder: mark as collectable
    pub fn with_collectable(mut self, collectable: bool) -> Self {
        self.collectable = collectable;
        self
    }

    /// Debug name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sequential id assigned by the world, `None` until registered
    pub fn world_id(&self) -> Option<u32> {
        self.world_id
    }

    pub(crate) fn set_world_id(&mut self, id: u32) {
        self.world_id = Some(id);
    }

    /// Collision volume, if any
    pub fn volume(&self) -> Option<&CollisionVolume> {
        self.volume.as_ref()
    }

    /// Replace or remove the collision volume
    pub fn set_volume(&mut self, volume: Option<CollisionVolume>) {
        self.volume = volume;
        self.broad_phase_bounds = None;
    }

    /// Rigid body, if any
    pub fn body(&self) -> Option<&RigidBody> {
        self.body.as_ref()
    }

    /// Mutable rigid body, if any
    pub fn body_mut(&mut self) -> Option<&mut RigidBody> {
        self.body.as_mut()
    }

    /// Split borrow for code that moves the transform from body state
    pub fn transform_and_body_mut(&mut self) -> (&mut Transform, Option<&mut RigidBody>) {
        (&mut self.transform, self.body.as_mut())
    }

    /// Render handle, if any
    pub fn render(&self) -> Option<&RenderHandle> {
        self.render.as_ref()
    }

    /// Inverse mass, zero for bodiless objects
    pub fn inverse_mass(&self) -> f32 {
        self.body.as_ref().map_or(0.0, RigidBody::inverse_mass)
    }

    /// True when physics may move this object
    pub fn is_movable(&self) -> bool {
        self.inverse_mass() > 0.0
    }

    /// Gameplay tag of the body, `None` for bodiless objects
    pub fn collision_type(&self) -> CollisionType {
        self.body.as_ref().map_or(CollisionType::None, |body| body.collision_type)
    }

    /// World matrix for rendering
    pub fn world_matrix(&self) -> Mat4 {
        self.transform.world_matrix()
    }

    /// Teleport back to the spawn position and stop all motion
    pub fn reset_to_spawn(&mut self) {
        self.transform.position = self.spawn_position;
        if let Some(body) = self.body.as_mut() {
            body.linear_velocity = Vec3::zeros();
            body.angular_velocity = Vec3::zeros();
            body.clear_forces();
        }
    }

    /// Bounding box computed by the last broad-phase refresh
    pub fn broad_phase_bounds(&self) -> Option<BoundingBox> {
        self.broad_phase_bounds
    }

    /// Recompute the world-axis bounds from the current transform
    pub fn update_broad_phase_bounds(&mut self) -> Option<BoundingBox> {
        self.broad_phase_bounds = self.volume.map(|volume| {
            let half = volume.broad_phase_half_size(&self.transform.orientation());
            BoundingBox::from_center_half_size(self.transform.position, half)
        });
        self.broad_phase_bounds
    }

    /// Tag of the last object this one was resolved against
    pub fn last_collision(&self) -> CollisionType {
        self.last_collision
    }

    /// Read and reset the last-collision tag
    pub fn take_last_collision(&mut self) -> CollisionType {
        std::mem::take(&mut self.last_collision)
    }

    pub(crate) fn set_last_collision(&mut self, collision_type: CollisionType) {
        self.last_collision = collision_type;
    }

    /// Events waiting to be handled by gameplay
    pub fn events(&self) -> &EventOutbox {
        &self.outbox
    }

    /// Take every pending event
    pub fn drain_events(&mut self) -> Vec<CollisionEvent> {
        self.outbox.drain()
    }

    pub(crate) fn push_event(&mut self, event: CollisionEvent) {
        self.outbox.push(event);
    }
}
