//! Math utilities and types
//!
//! Provides the vector and matrix aliases used by every contact test, plus a
//! few planar helpers that nalgebra does not offer for 2D vectors.

pub use nalgebra::{Matrix4, Vector2, Vector3, Vector4};

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

/// Z component of the 3D cross product of two planar vectors.
#[inline]
pub fn cross2(a: &Vec2, b: &Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Spin of the triangle `(a, b, c)`: twice its signed area.
///
/// Positive for counter-clockwise, negative for clockwise, zero when the
/// three points are collinear.
#[inline]
pub fn spin(a: &Vec2, b: &Vec2, c: &Vec2) -> f32 {
    cross2(&(b - a), &(c - a))
}

/// Left-hand perpendicular, i.e. `v` rotated by +90 degrees.
#[inline]
pub fn perp(v: &Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Spin of the tetrahedron `(a, b, c, d)`: six times its signed volume.
#[inline]
pub fn spin3(a: &Vec3, b: &Vec3, c: &Vec3, d: &Vec3) -> f32 {
    (b - a).cross(&(c - a)).dot(&(d - a))
}

/// Transform a vector as a point through a homogeneous matrix.
pub fn transform_point(matrix: &Mat4, point: &Vec3) -> Vec3 {
    matrix.transform_point(&Point3::from(*point)).coords
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;
}
