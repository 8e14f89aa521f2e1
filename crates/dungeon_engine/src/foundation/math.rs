//! Math utilities and types
//!
//! Scene positions and scales are plain nalgebra vectors, orientations are
//! unit quaternions.

pub use nalgebra::{UnitQuaternion, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Rotation type
pub type Quat = UnitQuaternion<f32>;

/// Uniform scale vector
pub fn uniform_scale(factor: f32) -> Vec3 {
    Vec3::new(factor, factor, factor)
}

/// Position of a map cell on the ground plane
pub fn tile_position(x: i32, y: i32) -> Vec3 {
    #[allow(clippy::cast_precision_loss)]
    Vec3::new(x as f32, y as f32, 0.0)
}
