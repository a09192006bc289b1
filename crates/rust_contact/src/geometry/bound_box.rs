//! Axis-aligned bounding boxes
//!
//! `BoundBox2` backs the planar box tests, `BoundBox3` the spatial ones and
//! every node of the skin Kd-tree.

use std::ops::Add;

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

use crate::foundation::math::{transform_point, Mat4, Vec2, Vec3, Vec4};

/// Planar axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundBox2 {
    /// Minimum corner of the bounding box
    pub min: Vec2,
    /// Maximum corner of the bounding box
    pub max: Vec2,
}

impl BoundBox2 {
    /// Create a new box from min and max corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create a box centered at a point with given half-size
    pub fn from_center_extents(center: Vec2, extents: Vec2) -> Self {
        Self::new(center - extents, center + extents)
    }

    /// Empty box: extending it with any point yields that point
    pub fn empty() -> Self {
        Self::new(Vec2::repeat(f32::INFINITY), Vec2::repeat(f32::NEG_INFINITY))
    }

    /// Smallest box holding every point
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec2>) -> Self {
        points.into_iter().fold(Self::empty(), |mut bounds, p| {
            bounds.extend(p);
            bounds
        })
    }

    /// Grow the box to include a point
    pub fn extend(&mut self, point: &Vec2) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    /// True when no point has been added
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Get the center of the box
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the box
    pub fn extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// Ring of the four corners, counter-clockwise from `min`
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }

    /// Check if this box contains a point (boundary included)
    pub fn contains_point(&self, point: &Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Check if this box intersects another box (touching counts)
    pub fn intersects(&self, other: &BoundBox2) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

impl From<Vec4> for BoundBox2 {
    /// Packed `(min.x, min.y, max.x, max.y)` layout
    fn from(v: Vec4) -> Self {
        Self::new(Vec2::new(v.x, v.y), Vec2::new(v.z, v.w))
    }
}

impl From<BoundBox2> for Vec4 {
    fn from(b: BoundBox2) -> Self {
        Vec4::new(b.min.x, b.min.y, b.max.x, b.max.y)
    }
}

impl Add for BoundBox2 {
    type Output = BoundBox2;

    /// Union of two boxes
    fn add(self, rhs: BoundBox2) -> BoundBox2 {
        BoundBox2::new(self.min.inf(&rhs.min), self.max.sup(&rhs.max))
    }
}

/// Spatial axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundBox3 {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl BoundBox3 {
    /// Create a new box from min and max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create a box centered at a point with given half-size
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self::new(center - extents, center + extents)
    }

    /// Empty box: extending it with any point yields that point
    pub fn empty() -> Self {
        Self::new(Vec3::repeat(f32::INFINITY), Vec3::repeat(f32::NEG_INFINITY))
    }

    /// Smallest box holding every point
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Self {
        points.into_iter().fold(Self::empty(), |mut bounds, p| {
            bounds.extend(p);
            bounds
        })
    }

    /// Grow the box to include a point
    pub fn extend(&mut self, point: &Vec3) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    /// True when no point has been added
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Get the center of the box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the box
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Full edge lengths
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Axis (0, 1 or 2) along which the box is longest
    pub fn longest_axis(&self) -> usize {
        self.size().imax()
    }

    /// The eight corners of the box
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Bounds of this box after an affine transform
    pub fn transform(&self, matrix: &Mat4) -> BoundBox3 {
        let corners = self.corners().map(|c| transform_point(matrix, &c));
        BoundBox3::from_points(corners.iter())
    }

    /// Split the box in two at `split` along `axis`
    pub fn split(&self, axis: usize, split: f32) -> (BoundBox3, BoundBox3) {
        let mut below = *self;
        let mut above = *self;
        below.max[axis] = split;
        above.min[axis] = split;
        (below, above)
    }

    /// Check if this box contains a point (boundary included)
    pub fn contains_point(&self, point: &Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Check if this box intersects another box (touching counts)
    pub fn intersects(&self, other: &BoundBox3) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Clip a ray against the box using the slab method
    ///
    /// Returns the parametric `(enter, exit)` interval along `direction`, which
    /// may start behind the origin. `None` when the ray's line misses the box.
    /// Based on "An Efficient and Robust Ray–Box Intersection Algorithm"
    pub fn clip_ray(&self, origin: &Vec3, direction: &Vec3) -> Option<(f32, f32)> {
        let mut enter = f32::NEG_INFINITY;
        let mut exit = f32::INFINITY;

        for axis in 0..3 {
            let d = direction[axis];
            let o = origin[axis];
            if d == 0.0 {
                // Parallel to this slab: either always inside it or never
                if o < self.min[axis] || o > self.max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let t1 = (self.min[axis] - o) * inv;
            let t2 = (self.max[axis] - o) * inv;
            enter = enter.max(t1.min(t2));
            exit = exit.min(t1.max(t2));
        }

        (exit >= enter).then_some((enter, exit))
    }

    /// Distance along a ray to its entry point, or `None` if the box is missed
    /// or lies behind the origin. Zero when the origin is inside.
    pub fn intersect_ray(&self, origin: &Vec3, direction: &Vec3) -> Option<f32> {
        let (enter, exit) = self.clip_ray(origin, direction)?;
        (exit >= 0.0).then(|| enter.max(0.0))
    }
}

impl Add for BoundBox3 {
    type Output = BoundBox3;

    /// Union of two boxes
    fn add(self, rhs: BoundBox3) -> BoundBox3 {
        BoundBox3::new(self.min.inf(&rhs.min), self.max.sup(&rhs.max))
    }
}

macro_rules! impl_approx_for_box {
    ($box:ty) => {
        impl AbsDiffEq for $box {
            type Epsilon = f32;

            fn default_epsilon() -> f32 {
                f32::default_epsilon()
            }

            fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
                self.min.abs_diff_eq(&other.min, epsilon)
                    && self.max.abs_diff_eq(&other.max, epsilon)
            }
        }

        impl RelativeEq for $box {
            fn default_max_relative() -> f32 {
                f32::default_max_relative()
            }

            fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
                self.min.relative_eq(&other.min, epsilon, max_relative)
                    && self.max.relative_eq(&other.max, epsilon, max_relative)
            }
        }
    };
}

impl_approx_for_box!(BoundBox2);
impl_approx_for_box!(BoundBox3);
