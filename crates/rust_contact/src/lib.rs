//! # Rust Contact
//!
//! Contact tests between simple 2D and 3D shapes, plus a Kd-tree over
//! triangle soups.
//!
//! ## Features
//!
//! - **Planar tests**: points, segments, rays, boxes, circles and convex polygons
//! - **Spatial tests**: points, tetrahedra, boxes, spheres, triangles and skins
//! - **Contacts**: every pair has a cheap predicate and a detailed form reporting
//!   a point, a normal and a penetration depth
//! - **Kd-tree**: point containment and ray casts against large skins
//!
//! ## Quick Start
//!
//! ```rust
//! use rust_contact::prelude::*;
//! use rust_contact::contact2d;
//!
//! let a = Circle::new(Vec2::new(0.0, 0.0), 1.0);
//! let b = Circle::new(Vec2::new(1.5, 0.0), 1.0);
//! let contact = contact2d::circle_circle_contact(&a, &b).unwrap();
//! assert!(contact.normal.x > 0.0);
//!
//! let skin = Skin::icosphere(Vec3::zeros(), 1.0, 2);
//! let tree = SkinKdTree::build(&skin, &KdTreeConfig::default());
//! let ray = Ray3::new(Vec3::new(-5.0, 0.1, 0.2), Vec3::x());
//! let hit = tree.first_hit(&ray).unwrap();
//! assert!((hit.hit.t - 4.03).abs() < 0.05);
//! ```

#![warn(missing_docs)]

pub mod foundation;
pub mod config;
pub mod geometry;

// Declared before its users: provides the `contact_pair!` macro
pub mod contact;
pub mod contact2d;
pub mod contact3d;

pub mod spatial;

/// Common imports
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, ConfigFormat},
        contact::{Contact, Contact2, Contact3, RayHit, RayHit2, RayHit3},
        foundation::math::{Mat4, Vec2, Vec3, Vec4},
        geometry::{BoundBox2, BoundBox3, Circle, Ray2, Ray3, Skin, Sphere, Tetra, Triangle},
        spatial::{KdTreeConfig, SkinKdTree},
    };
}
