//! Geometric value types
//!
//! Plain data owned by the caller: bounding boxes, circles and spheres, rays,
//! triangles, tetrahedra, convex polygon rings and triangle soups.

pub mod bound_box;
pub mod polygon;
pub mod primitives;
pub mod skin;

pub use bound_box::{BoundBox2, BoundBox3};
pub use primitives::{Circle, Ray2, Ray3, Sphere, Tetra, Triangle};
pub use skin::Skin;
