//! Collision volumes attached to game objects
//!
//! The shape set is closed, so volumes are a plain enum and every consumer
//! matches on it exhaustively. Extents are stored in world units and are not
//! affected by the transform's (visual) scale; position and orientation come
//! from the owning object's transform at test time.

use crate::foundation::math::{abs_matrix, utils, Quat, Vec3};

/// Discriminant of a [`CollisionVolume`], handy for logging and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolumeType {
    /// Sphere
    Sphere,
    /// Axis-aligned box
    Aabb,
    /// Oriented box
    Obb,
}

/// Collision shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionVolume {
    /// Sphere centred on the object position
    Sphere {
        /// Radius in world units
        radius: f32,
    },
    /// Box that never rotates, whatever the object's orientation
    Aabb {
        /// Half size along each world axis
        half_extents: Vec3,
    },
    /// Box that follows the object's orientation
    Obb {
        /// Half size along each local axis
        half_extents: Vec3,
    },
}

impl CollisionVolume {
    /// Creates a sphere volume
    pub fn sphere(radius: f32) -> Self {
        debug_assert!(radius.is_finite() && radius > 0.0, "sphere radius must be positive");
        Self::Sphere { radius }
    }

    /// Creates an axis-aligned box volume
    pub fn aabb(half_extents: Vec3) -> Self {
        debug_assert!(valid_extents(&half_extents), "box half extents must be positive");
        Self::Aabb { half_extents }
    }

    /// Creates an oriented box volume
    pub fn obb(half_extents: Vec3) -> Self {
        debug_assert!(valid_extents(&half_extents), "box half extents must be positive");
        Self::Obb { half_extents }
    }

    /// Which variant this is
    pub fn volume_type(&self) -> VolumeType {
        match self {
            Self::Sphere { .. } => VolumeType::Sphere,
            Self::Aabb { .. } => VolumeType::Aabb,
            Self::Obb { .. } => VolumeType::Obb,
        }
    }

    /// Half size of a world-axis box that bounds this volume at `orientation`
    pub fn broad_phase_half_size(&self, orientation: &Quat) -> Vec3 {
        match self {
            Self::Sphere { radius } => Vec3::repeat(*radius),
            Self::Aabb { half_extents } => *half_extents,
            Self::Obb { half_extents } => {
                let rotation = orientation.to_rotation_matrix().into_inner();
                abs_matrix(&rotation) * half_extents
            }
        }
    }
}

fn valid_extents(half_extents: &Vec3) -> bool {
    utils::is_finite(half_extents) && half_extents.iter().all(|&e| e > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sphere_bounds_ignore_orientation() {
        let volume = CollisionVolume::sphere(2.0);
        let rotated = utils::axis_angle_degrees(Vec3::new(1.0, 2.0, 3.0), 33.0);

        assert_eq!(volume.volume_type(), VolumeType::Sphere);
        assert_relative_eq!(volume.broad_phase_half_size(&rotated), Vec3::repeat(2.0));
    }

    #[test]
    fn test_aabb_bounds_ignore_orientation() {
        let volume = CollisionVolume::aabb(Vec3::new(1.0, 2.0, 3.0));
        let rotated = utils::axis_angle_degrees(Vec3::y(), 45.0);

        assert_relative_eq!(volume.broad_phase_half_size(&rotated), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_obb_bounds_grow_when_rotated() {
        let volume = CollisionVolume::obb(Vec3::new(1.0, 1.0, 1.0));
        let rotated = utils::axis_angle_degrees(Vec3::y(), 45.0);

        let half = volume.broad_phase_half_size(&rotated);
        assert_relative_eq!(half.x, std::f32::consts::SQRT_2, epsilon = 1e-5);
        assert_relative_eq!(half.y, 1.0, epsilon = 1e-5);
        assert_relative_eq!(half.z, std::f32::consts::SQRT_2, epsilon = 1e-5);
    }

    #[test]
    #[should_panic(expected = "positive")]
    #[cfg(debug_assertions)]
    fn test_zero_size_volume_asserts() {
        let _ = CollisionVolume::aabb(Vec3::new(1.0, 0.0, 1.0));
    }
}
