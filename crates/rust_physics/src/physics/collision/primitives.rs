//! Primitive collision shapes and intersection algorithms
//!
//! Provides rays, world-axis bounding boxes and the ray tests used by world
//! queries. All tests report "no intersection" as `None`.

use crate::foundation::collections::ObjectHandle;
use crate::foundation::math::{Transform, Vec3};

use super::volume::CollisionVolume;

/// A ray for ray casting and picking
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        debug_assert!(direction.magnitude_squared() > 0.0, "ray direction must be non-zero");
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Where a ray met a volume, before it is attributed to an object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayIntersection {
    /// Distance along the ray
    pub distance: f32,
    /// World space hit point
    pub point: Vec3,
    /// Surface normal at the hit point
    pub normal: Vec3,
}

/// Result of a world ray cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// The object that was hit
    pub object: ObjectHandle,
    /// The distance from the ray origin to the hit point
    pub distance: f32,
    /// The point of intersection in world space
    pub point: Vec3,
    /// The surface normal at the intersection point
    pub normal: Vec3,
}

/// World-axis bounding box used by the broad phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl BoundingBox {
    /// Create a box centered at a point with given half size
    pub fn from_center_half_size(center: Vec3, half_size: Vec3) -> Self {
        Self {
            min: center - half_size,
            max: center + half_size,
        }
    }

    /// Get the center of the box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the half size of the box
    pub fn half_size(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Check if this box contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Check if this box overlaps another on all three axes (touching counts)
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Slab test. Returns entry distance (0 when starting inside) and the
    /// outward normal of the face that was entered.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<RayIntersection> {
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;
        let mut entry_axis = 0;
        let mut entry_sign = -1.0;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];

            if direction.abs() < f32::EPSILON {
                // Parallel to this slab: must already be inside it
                if origin < self.min[axis] || origin > self.max[axis] {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / direction;
            let mut t1 = (self.min[axis] - origin) * inv;
            let mut t2 = (self.max[axis] - origin) * inv;
            let mut sign = -1.0;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
                sign = 1.0;
            }

            if t1 > t_min {
                t_min = t1;
                entry_axis = axis;
                entry_sign = sign;
            }
            t_max = t_max.min(t2);

            if t_min > t_max {
                return None;
            }
        }

        if t_max < 0.0 {
            return None; // Box is behind the ray
        }

        let distance = t_min.max(0.0);
        let mut normal = Vec3::zeros();
        if t_min >= 0.0 {
            normal[entry_axis] = entry_sign;
        } else {
            normal = -ray.direction;
        }

        Some(RayIntersection {
            distance,
            point: ray.point_at(distance),
            normal,
        })
    }
}

/// Test ray intersection with a sphere
pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<RayIntersection> {
    // Vector from ray origin to sphere center
    let oc = ray.origin - center;

    // Direction is unit length, so the quadratic's `a` term is 1
    let b = oc.dot(&ray.direction);
    let c = oc.dot(&oc) - radius * radius;

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None; // No intersection
    }

    let sqrt_discriminant = discriminant.sqrt();
    let t1 = -b - sqrt_discriminant;
    let t2 = -b + sqrt_discriminant;

    // Use the closest non-negative intersection
    let distance = if t1 >= 0.0 {
        t1
    } else if t2 >= 0.0 {
        0.0 // Origin inside the sphere
    } else {
        return None; // Ray pointing away from sphere
    };

    let point = ray.point_at(distance);
    let offset = point - center;
    let normal = if offset.magnitude_squared() > f32::EPSILON {
        offset.normalize()
    } else {
        -ray.direction
    };

    Some(RayIntersection { distance, point, normal })
}

/// Test ray intersection with an oriented box by moving the ray into box space
pub fn ray_obb(ray: &Ray, transform: &Transform, half_extents: Vec3) -> Option<RayIntersection> {
    let local_ray = Ray {
        origin: transform.world_to_local_point(ray.origin),
        direction: transform.orientation().inverse() * ray.direction,
    };
    let local_box = BoundingBox::from_center_half_size(Vec3::zeros(), half_extents);

    local_box.intersect_ray(&local_ray).map(|hit| RayIntersection {
        distance: hit.distance,
        point: ray.point_at(hit.distance),
        normal: transform.local_to_world_direction(hit.normal),
    })
}

/// Dispatch a ray test on the volume variant
pub fn ray_volume(ray: &Ray, volume: &CollisionVolume, transform: &Transform) -> Option<RayIntersection> {
    match volume {
        CollisionVolume::Sphere { radius } => ray_sphere(ray, transform.position, *radius),
        CollisionVolume::Aabb { half_extents } => {
            BoundingBox::from_center_half_size(transform.position, *half_extents).intersect_ray(ray)
        }
        CollisionVolume::Obb { half_extents } => ray_obb(ray, transform, *half_extents),
    }
}
