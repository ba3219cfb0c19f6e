//! Math utilities and types
//!
//! Thin aliases over nalgebra plus the handful of transform helpers the
//! lighting pipeline needs.

pub use nalgebra::{Matrix3, Matrix4, Quaternion, Unit, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Node transform: position and rotation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
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

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
        }
    }

    /// Create a transform at `position` whose forward axis (-Z) points along `direction`
    ///
    /// A zero direction leaves the rotation at identity.
    pub fn looking_along(position: Vec3, direction: Vec3) -> Self {
        let rotation = Quat::rotation_between(&-Vec3::z(), &direction).unwrap_or_else(|| {
            // Opposite vectors: any half turn around an axis orthogonal to Z works
            if direction.z > 0.0 {
                Quat::from_axis_angle(&Vec3::y_axis(), constants::PI)
            } else {
                Quat::identity()
            }
        });
        Self::from_position_rotation(position, rotation)
    }

    /// Forward direction of the node (rotated -Z axis)
    pub fn direction(&self) -> Vec3 {
        self.rotation * -Vec3::z()
    }
}

/// Transform a point by a matrix (w = 1)
pub fn transform_point(matrix: &Mat4, point: &Vec3) -> Vec3 {
    matrix.transform_point(&Point3::from(*point)).coords
}

/// Transform a direction by a matrix (w = 0) and normalize the result
///
/// Returns the zero vector when the transformed direction is degenerate.
pub fn transform_direction(matrix: &Mat4, direction: &Vec3) -> Vec3 {
    matrix
        .transform_vector(direction)
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vec3::zeros)
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
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }
}

/// Extension trait for Mat4 with view matrix construction
pub trait Mat4Ext {
    /// Create a right-handed look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        Mat4::look_at_rh(&Point3::from(eye), &Point3::from(target), &up)
    }
}
