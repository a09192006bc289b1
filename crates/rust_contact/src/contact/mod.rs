//! Contact results shared by the planar and spatial tests
//!
//! Every pairwise test `x_y(a, b)` comes in two flavours: a predicate returning
//! `bool` and `x_y_contact` returning `Option<Contact>`. Both are thin wrappers
//! over one function generic over `const DETAIL: bool`, so the predicate and
//! the detailed form always agree on whether a contact exists.
//!
//! # Conventions
//!
//! - `normal` is a unit vector pointing from the first shape toward the second;
//!   to separate them the first shape moves along `-normal`. When the first
//!   shape is a point, the normal is the reverse of the outward normal of the
//!   nearest feature of the second shape.
//! - `penet` is positive when the shapes overlap, **except** for
//!   `circle_circle` and `sphere_sphere`, which report the signed separation
//!   `distance - radius_sum` (zero or negative when overlapping).
//! - A zero `normal` is only reported for concentric circles/spheres and
//!   degenerate (zero-area) input.

pub mod tolerance;

/// Generates the predicate and detailed entry points of one pairwise test
///
/// `$imp` must be generic over `const DETAIL: bool`; with `DETAIL == false`
/// its returned contact is never read.
macro_rules! contact_pair {
    (
        $(#[$meta:meta])*
        $pred:ident, $detail:ident => $imp:ident($($arg:ident: $ty:ty),* $(,)?) -> $contact:ty
    ) => {
        $(#[$meta])*
        pub fn $pred($($arg: $ty),*) -> bool {
            $imp::<false>($($arg),*).is_some()
        }

        $(#[$meta])*
        #[doc = ""]
        #[doc = concat!(
            "Detailed form of [`",
            stringify!($pred),
            "`]: `None` exactly when it returns `false`."
        )]
        pub fn $detail($($arg: $ty),*) -> Option<$contact> {
            $imp::<true>($($arg),*)
        }
    };
}

pub(crate) use contact_pair;

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

use crate::foundation::math::{Vec2, Vec3};

/// A measured overlap between two shapes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact<V> {
    /// Point attributed to the contact
    pub pt: V,
    /// Unit normal from the first shape toward the second
    pub normal: V,
    /// Penetration depth (see the module docs for the sign convention)
    pub penet: f32,
}

/// Planar contact
pub type Contact2 = Contact<Vec2>;

/// Spatial contact
pub type Contact3 = Contact<Vec3>;

impl<V> Contact<V> {
    /// Creates a new contact
    pub fn new(pt: V, normal: V, penet: f32) -> Self {
        Self { pt, normal, penet }
    }
}

impl Contact2 {
    /// Stand-in returned by the predicate path, which never reads it
    pub(crate) fn unresolved() -> Self {
        Self::new(Vec2::zeros(), Vec2::zeros(), 0.0)
    }

    /// Same contact seen from the other shape
    pub fn flipped(&self) -> Self {
        Self::new(self.pt, -self.normal, self.penet)
    }
}

impl Contact3 {
    /// Stand-in returned by the predicate path, which never reads it
    pub(crate) fn unresolved() -> Self {
        Self::new(Vec3::zeros(), Vec3::zeros(), 0.0)
    }

    /// Same contact seen from the other shape
    pub fn flipped(&self) -> Self {
        Self::new(self.pt, -self.normal, self.penet)
    }
}

/// Where a ray first meets a shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayHit<V> {
    /// Distance along the (normalized) ray
    pub t: f32,
    /// Hit location
    pub point: V,
    /// Outward surface normal at the hit
    pub normal: V,
}

/// Planar ray hit
pub type RayHit2 = RayHit<Vec2>;

/// Spatial ray hit
pub type RayHit3 = RayHit<Vec3>;

impl<V> RayHit<V> {
    /// Creates a new ray hit
    pub fn new(t: f32, point: V, normal: V) -> Self {
        Self { t, point, normal }
    }
}

impl RayHit2 {
    /// Stand-in returned by the predicate path, which never reads it
    pub(crate) fn unresolved(t: f32) -> Self {
        Self::new(t, Vec2::zeros(), Vec2::zeros())
    }
}

impl<V: AbsDiffEq<Epsilon = f32>> AbsDiffEq for Contact<V> {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.pt.abs_diff_eq(&other.pt, epsilon)
            && self.normal.abs_diff_eq(&other.normal, epsilon)
            && self.penet.abs_diff_eq(&other.penet, epsilon)
    }
}

impl<V: RelativeEq<Epsilon = f32>> RelativeEq for Contact<V> {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.pt.relative_eq(&other.pt, epsilon, max_relative)
            && self.normal.relative_eq(&other.normal, epsilon, max_relative)
            && self.penet.relative_eq(&other.penet, epsilon, max_relative)
    }
}

impl<V: AbsDiffEq<Epsilon = f32>> AbsDiffEq for RayHit<V> {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.t.abs_diff_eq(&other.t, epsilon)
            && self.point.abs_diff_eq(&other.point, epsilon)
            && self.normal.abs_diff_eq(&other.normal, epsilon)
    }
}

impl<V: RelativeEq<Epsilon = f32>> RelativeEq for RayHit<V> {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.t.relative_eq(&other.t, epsilon, max_relative)
            && self.point.relative_eq(&other.point, epsilon, max_relative)
            && self.normal.relative_eq(&other.normal, epsilon, max_relative)
    }
}
