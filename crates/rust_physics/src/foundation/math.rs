//! Math utilities and types
//!
//! Fixed-size linear algebra used throughout the physics core. Everything is
//! `f32` and stack allocated; the aliases keep call sites short.

pub use nalgebra::{
    Vector3, Vector4,
    Matrix3, Matrix4,
    Quaternion,
    Unit,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type (colours, homogeneous coordinates)
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Unit quaternion type for orientations
pub type Quat = Unit<Quaternion<f32>>;

/// Position, orientation and scale of a body in world space
///
/// Orientation is renormalised after every mutation so that repeated
/// integration does not let it drift away from unit length.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// World space position
    pub position: Vec3,

    orientation: Quat,

    /// World space scale (visual only, collision volumes carry their own extents)
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            orientation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and orientation
    pub fn from_position_orientation(position: Vec3, orientation: Quat) -> Self {
        let mut transform = Self::from_position(position);
        transform.set_orientation(orientation);
        transform
    }

    /// Builder: set the scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Current orientation
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Replace the orientation
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
        self.renormalize();
    }

    /// Set the orientation from a raw (possibly non-unit) quaternion
    pub fn set_orientation_raw(&mut self, orientation: Quaternion<f32>) {
        self.orientation = Quat::new_normalize(orientation);
    }

    /// Apply an additional rotation on top of the current orientation
    pub fn rotate_by(&mut self, rotation: Quat) {
        self.orientation = rotation * self.orientation;
        self.renormalize();
    }

    /// Move the position by `delta`
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Counter floating point drift in the orientation
    pub fn renormalize(&mut self) {
        self.orientation = Quat::new_normalize(self.orientation.into_inner());
    }

    /// Rotation part as a 3x3 matrix
    pub fn rotation_matrix(&self) -> Mat3 {
        self.orientation.to_rotation_matrix().into_inner()
    }

    /// World matrix in TRS order
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.orientation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Transform a direction from local space into world space (rotation only)
    pub fn local_to_world_direction(&self, direction: Vec3) -> Vec3 {
        self.orientation * direction
    }

    /// Transform a world space point into the local rotated frame (no scale)
    pub fn world_to_local_point(&self, point: Vec3) -> Vec3 {
        self.orientation.inverse() * (point - self.position)
    }

    /// Transform a local rotated-frame point back into world space (no scale)
    pub fn local_to_world_point(&self, point: Vec3) -> Vec3 {
        self.orientation * point + self.position
    }
}

/// Component-wise absolute value of a matrix
///
/// Used to project box half-extents onto world axes.
pub fn abs_matrix(matrix: &Mat3) -> Mat3 {
    matrix.map(f32::abs)
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Quat, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Rotation of `degrees` about `axis` (axis need not be normalised)
    pub fn axis_angle_degrees(axis: Vec3, degrees: f32) -> Quat {
        match nalgebra::Unit::try_new(axis, f32::EPSILON) {
            Some(axis) => Quat::from_axis_angle(&axis, deg_to_rad(degrees)),
            None => Quat::identity(),
        }
    }

    /// True when every component is finite
    pub fn is_finite(v: &Vec3) -> bool {
        v.iter().all(|c| c.is_finite())
    }
}
