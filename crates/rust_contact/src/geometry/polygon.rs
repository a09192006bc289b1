//! Convex polygon helpers
//!
//! A polygon is an ordered ring of points, `&[Vec2]`, closed implicitly from
//! the last point back to the first. Rings carry no winding flag: every helper
//! infers it from the spin of the first triangle `(pts[0], pts[1], pts[2])`.

use crate::contact::tolerance::{area, linear};
use crate::foundation::math::{cross2, spin, Vec2};

/// Winding of a ring: `1.0` counter-clockwise, `-1.0` clockwise
///
/// Degenerate rings (fewer than three points or a flat first triangle) report
/// counter-clockwise.
pub fn winding(poly: &[Vec2]) -> f32 {
    if poly.len() < 3 {
        return 1.0;
    }
    if spin(&poly[0], &poly[1], &poly[2]) < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Edge `i` as a pair of endpoints
#[inline]
pub fn edge(poly: &[Vec2], i: usize) -> (Vec2, Vec2) {
    (poly[i], poly[(i + 1) % poly.len()])
}

/// Outward unit normal of edge `i` for a ring of the given winding
///
/// Zero for a zero-length edge.
pub fn outward_normal(poly: &[Vec2], i: usize, wind: f32) -> Vec2 {
    let (a, b) = edge(poly, i);
    let e = b - a;
    Vec2::new(e.y, -e.x)
        .try_normalize(linear::DEGENERATE_LENGTH)
        .map_or_else(Vec2::zeros, |n| n * wind)
}

/// Signed distance from `p` to the line through edge `i`, positive inside
pub fn inside_distance(poly: &[Vec2], i: usize, wind: f32, p: &Vec2) -> f32 {
    let (a, b) = edge(poly, i);
    let e = b - a;
    let len = e.norm();
    if len < linear::DEGENERATE_LENGTH {
        return f32::INFINITY;
    }
    wind * cross2(&e, &(p - a)) / len
}

/// Point-in-convex-polygon test, boundary included
pub fn contains(poly: &[Vec2], p: &Vec2) -> bool {
    if poly.len() < 3 {
        return false;
    }
    let wind = winding(poly);
    (0..poly.len()).all(|i| {
        let (a, b) = edge(poly, i);
        wind * cross2(&(b - a), &(p - a)) >= 0.0
    })
}

/// Average of the vertices
pub fn barycenter(poly: &[Vec2]) -> Vec2 {
    if poly.is_empty() {
        return Vec2::zeros();
    }
    poly.iter().sum::<Vec2>() / poly.len() as f32
}

/// Unsigned area and area centroid of a ring, fanned from `anchor`
///
/// Falls back to the barycenter when the ring encloses no area.
pub fn area_centroid_from(poly: &[Vec2], anchor: &Vec2) -> (f32, Vec2) {
    let mut total = 0.0;
    let mut moment = Vec2::zeros();

    for i in 0..poly.len() {
        let (a, b) = edge(poly, i);
        let doubled = spin(anchor, &a, &b);
        total += doubled;
        moment += (anchor + a + b) * (doubled / 3.0);
    }

    let signed_area = total * 0.5;
    if signed_area.abs() < area::DEGENERATE {
        return (0.0, barycenter(poly));
    }
    (signed_area.abs(), moment / total)
}

/// Unsigned area and area centroid of a ring
pub fn area_centroid(poly: &[Vec2]) -> (f32, Vec2) {
    match poly.first() {
        Some(anchor) => area_centroid_from(poly, anchor),
        None => (0.0, Vec2::zeros()),
    }
}

/// The edge nearest to an inside point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestEdge {
    /// Index of the edge
    pub index: usize,
    /// Distance from the point to the edge line, positive inside
    pub depth: f32,
    /// Projection of the point onto the edge, clamped to the segment
    pub foot: Vec2,
}

/// Edge whose line is nearest to `p`, measured inward
pub fn nearest_edge(poly: &[Vec2], wind: f32, p: &Vec2) -> NearestEdge {
    let mut best = NearestEdge {
        index: 0,
        depth: f32::INFINITY,
        foot: *p,
    };

    for i in 0..poly.len() {
        let depth = inside_distance(poly, i, wind, p);
        if depth < best.depth {
            let (a, b) = edge(poly, i);
            best = NearestEdge {
                index: i,
                depth,
                foot: closest_on_segment(&a, &b, p),
            };
        }
    }
    best
}

/// Closest point of segment `ab` to `p`
pub fn closest_on_segment(a: &Vec2, b: &Vec2, p: &Vec2) -> Vec2 {
    let e = b - a;
    let len_sq = e.norm_squared();
    if len_sq < linear::DEGENERATE_LENGTH {
        return *a;
    }
    let t = ((p - a).dot(&e) / len_sq).clamp(0.0, 1.0);
    a + e * t
}

/// Closest point on the ring's boundary to `p`, with its squared distance
pub fn closest_on_boundary(poly: &[Vec2], p: &Vec2) -> (Vec2, f32) {
    let mut best = (*p, f32::INFINITY);
    for i in 0..poly.len() {
        let (a, b) = edge(poly, i);
        let q = closest_on_segment(&a, &b, p);
        let d2 = (q - p).norm_squared();
        if d2 < best.1 {
            best = (q, d2);
        }
    }
    best
}

/// Ring in counter-clockwise order, reversing a clockwise input
pub fn to_ccw(poly: &[Vec2]) -> Vec<Vec2> {
    let mut ring = poly.to_vec();
    if winding(poly) < 0.0 {
        ring.reverse();
    }
    ring
}
