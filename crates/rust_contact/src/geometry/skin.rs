//! Triangle soups ("skins")
//!
//! A skin is the flat vertex stream a mesh part is drawn from: every three
//! points form one triangle, no vertex is shared, and triangles are expected
//! to wind counter-clockwise when seen from outside. Nothing here validates
//! that winding; the containment tests simply assume it.

use serde::{Deserialize, Serialize};

use super::bound_box::BoundBox3;
use super::primitives::Triangle;
use crate::foundation::math::{transform_point, Mat4, Vec3};

/// A triangle soup, stride three
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skin {
    points: Vec<Vec3>,
}

impl Skin {
    /// Wrap a flat point stream
    ///
    /// The length must be a multiple of three; a trailing partial triangle is
    /// ignored in release builds.
    pub fn new(points: Vec<Vec3>) -> Self {
        debug_assert!(
            points.len() % 3 == 0,
            "skin point count {} is not a multiple of 3",
            points.len()
        );
        Self { points }
    }

    /// Build a skin from triangles
    pub fn from_triangles(triangles: impl IntoIterator<Item = Triangle>) -> Self {
        let points = triangles
            .into_iter()
            .flat_map(|t| t.vertices())
            .collect();
        Self { points }
    }

    /// Unroll an indexed mesh into a skin
    ///
    /// Indices are read three at a time; a trailing partial triangle is
    /// dropped. Every index must be in range for `vertices`.
    pub fn from_indexed(vertices: &[Vec3], indices: &[u32]) -> Self {
        let points = indices
            .chunks_exact(3)
            .flat_map(|chunk| chunk.iter().map(|&i| vertices[i as usize]))
            .collect();
        Self { points }
    }

    /// Flat point stream
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Number of complete triangles
    pub fn triangle_count(&self) -> usize {
        self.points.len() / 3
    }

    /// True when the skin holds no triangle
    pub fn is_empty(&self) -> bool {
        self.triangle_count() == 0
    }

    /// Triangle `index`
    pub fn triangle(&self, index: usize) -> Triangle {
        let base = index * 3;
        Triangle::new(self.points[base], self.points[base + 1], self.points[base + 2])
    }

    /// Iterate over all triangles
    pub fn triangles(&self) -> impl ExactSizeIterator<Item = Triangle> + '_ {
        self.points
            .chunks_exact(3)
            .map(|p| Triangle::new(p[0], p[1], p[2]))
    }

    /// Bounding box of every point
    pub fn bound_box(&self) -> BoundBox3 {
        BoundBox3::from_points(self.points.iter())
    }

    /// Copy of the skin with every point transformed by `matrix`
    ///
    /// Mirror transforms flip the winding; callers owning such a transform
    /// must re-wind the result.
    pub fn transformed(&self, matrix: &Mat4) -> Skin {
        Skin {
            points: self.points.iter().map(|p| transform_point(matrix, p)).collect(),
        }
    }

    /// Geodesic sphere: an icosahedron subdivided `subdivisions` times
    ///
    /// Produces `20 * 4^subdivisions` outward-wound triangles with every
    /// vertex on the sphere.
    pub fn icosphere(center: Vec3, radius: f32, subdivisions: u32) -> Skin {
        let t = (1.0 + 5.0_f32.sqrt()) * 0.5;
        let corners = [
            Vec3::new(-1.0, t, 0.0),
            Vec3::new(1.0, t, 0.0),
            Vec3::new(-1.0, -t, 0.0),
            Vec3::new(1.0, -t, 0.0),
            Vec3::new(0.0, -1.0, t),
            Vec3::new(0.0, 1.0, t),
            Vec3::new(0.0, -1.0, -t),
            Vec3::new(0.0, 1.0, -t),
            Vec3::new(t, 0.0, -1.0),
            Vec3::new(t, 0.0, 1.0),
            Vec3::new(-t, 0.0, -1.0),
            Vec3::new(-t, 0.0, 1.0),
        ]
        .map(|c| c.normalize());

        const FACES: [[usize; 3]; 20] = [
            [0, 11, 5],
            [0, 5, 1],
            [0, 1, 7],
            [0, 7, 10],
            [0, 10, 11],
            [1, 5, 9],
            [5, 11, 4],
            [11, 10, 2],
            [10, 7, 6],
            [7, 1, 8],
            [3, 9, 4],
            [3, 4, 2],
            [3, 2, 6],
            [3, 6, 8],
            [3, 8, 9],
            [4, 9, 5],
            [2, 4, 11],
            [6, 2, 10],
            [8, 6, 7],
            [9, 8, 1],
        ];

        let mut faces: Vec<[Vec3; 3]> = FACES
            .iter()
            .map(|f| [corners[f[0]], corners[f[1]], corners[f[2]]])
            .collect();

        for _ in 0..subdivisions {
            faces = faces
                .iter()
                .flat_map(|[a, b, c]| {
                    let ab = (a + b).normalize();
                    let bc = (b + c).normalize();
                    let ca = (c + a).normalize();
                    [[*a, ab, ca], [*b, bc, ab], [*c, ca, bc], [ab, bc, ca]]
                })
                .collect();
        }

        Skin::from_triangles(faces.iter().map(|[a, b, c]| {
            orient_outward(
                Triangle::new(center + a * radius, center + b * radius, center + c * radius),
                &center,
            )
        }))
    }

    /// Surface of a box, each face split into a `divisions` x `divisions` grid
    ///
    /// Produces `12 * divisions^2` outward-wound triangles.
    pub fn box_grid(bounds: &BoundBox3, divisions: usize) -> Skin {
        let divisions = divisions.max(1);
        let center = bounds.center();
        let size = bounds.size();
        let step = 1.0 / divisions as f32;
        let mut triangles = Vec::with_capacity(12 * divisions * divisions);

        for axis in 0..3 {
            let u_axis = (axis + 1) % 3;
            let v_axis = (axis + 2) % 3;
            for side in [bounds.min[axis], bounds.max[axis]] {
                let corner = |i: usize, j: usize| {
                    let mut p = Vec3::zeros();
                    p[axis] = side;
                    p[u_axis] = bounds.min[u_axis] + size[u_axis] * (i as f32 * step);
                    p[v_axis] = bounds.min[v_axis] + size[v_axis] * (j as f32 * step);
                    p
                };
                for i in 0..divisions {
                    for j in 0..divisions {
                        let (p00, p10) = (corner(i, j), corner(i + 1, j));
                        let (p01, p11) = (corner(i, j + 1), corner(i + 1, j + 1));
                        triangles.push(orient_outward(Triangle::new(p00, p10, p11), &center));
                        triangles.push(orient_outward(Triangle::new(p00, p11, p01), &center));
                    }
                }
            }
        }

        Skin::from_triangles(triangles)
    }
}

/// Flip `tri` if its normal faces `center`
fn orient_outward(tri: Triangle, center: &Vec3) -> Triangle {
    if tri.scaled_normal().dot(&(tri.centroid() - center)) < 0.0 {
        tri.flipped()
    } else {
        tri
    }
}
