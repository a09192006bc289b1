//! Point containment in planar shapes

use crate::contact::tolerance::squared;
use crate::contact::{contact_pair, Contact2};
use crate::foundation::math::{spin, Vec2};
use crate::geometry::polygon::{self, nearest_edge, outward_normal, winding};
use crate::geometry::{BoundBox2, Circle};

contact_pair! {
    /// Point inside a triangle of either winding, boundary included
    point_tri, point_tri_contact => point_tri_impl(p: &Vec2, tri: &[Vec2; 3]) -> Contact2
}

contact_pair! {
    /// Point inside a convex polygon of either winding, boundary included
    point_poly, point_poly_contact => point_poly_impl(p: &Vec2, poly: &[Vec2]) -> Contact2
}

contact_pair! {
    /// Point inside an axis-aligned box, boundary included
    point_box, point_box_contact => point_box_impl(p: &Vec2, bounds: &BoundBox2) -> Contact2
}

contact_pair! {
    /// Point inside a disc, boundary included
    point_circle, point_circle_contact => point_circle_impl(p: &Vec2, circle: &Circle) -> Contact2
}

fn point_tri_impl<const DETAIL: bool>(p: &Vec2, tri: &[Vec2; 3]) -> Option<Contact2> {
    let s0 = spin(&tri[0], &tri[1], p);
    let s1 = spin(&tri[1], &tri[2], p);
    let s2 = spin(&tri[2], &tri[0], p);

    let inside = (s0 >= 0.0 && s1 >= 0.0 && s2 >= 0.0) || (s0 <= 0.0 && s1 <= 0.0 && s2 <= 0.0);
    if !inside {
        return None;
    }
    if !DETAIL {
        return Some(Contact2::unresolved());
    }
    Some(inside_ring_contact(p, tri))
}

fn point_poly_impl<const DETAIL: bool>(p: &Vec2, poly: &[Vec2]) -> Option<Contact2> {
    if !polygon::contains(poly, p) {
        return None;
    }
    if !DETAIL {
        return Some(Contact2::unresolved());
    }
    Some(inside_ring_contact(p, poly))
}

/// Contact of a point already known to lie inside a convex ring
///
/// A point within snapping distance of a vertex reports that vertex with zero
/// depth and the averaged normal of its two edges. Otherwise the nearest edge
/// line wins.
pub(crate) fn inside_ring_contact(p: &Vec2, ring: &[Vec2]) -> Contact2 {
    let wind = winding(ring);
    let n = ring.len();

    for (i, vertex) in ring.iter().enumerate() {
        if (vertex - p).norm_squared() < squared::VERTEX_SNAP {
            let prev = (i + n - 1) % n;
            let corner = outward_normal(ring, prev, wind) + outward_normal(ring, i, wind);
            let normal = corner.try_normalize(squared::COINCIDENT).unwrap_or_else(Vec2::zeros);
            return Contact2::new(*vertex, -normal, 0.0);
        }
    }

    let nearest = nearest_edge(ring, wind, p);
    if !nearest.depth.is_finite() {
        // Every edge collapsed to a point
        return Contact2::new(*p, Vec2::zeros(), 0.0);
    }
    let normal = -outward_normal(ring, nearest.index, wind);
    Contact2::new(nearest.foot, normal, nearest.depth.max(0.0))
}

fn point_box_impl<const DETAIL: bool>(p: &Vec2, bounds: &BoundBox2) -> Option<Contact2> {
    if !bounds.contains_point(p) {
        return None;
    }
    if !DETAIL {
        return Some(Contact2::unresolved());
    }

    // (distance to the face, outward normal of the face)
    let faces = [
        (p.x - bounds.min.x, Vec2::new(-1.0, 0.0)),
        (bounds.max.x - p.x, Vec2::new(1.0, 0.0)),
        (p.y - bounds.min.y, Vec2::new(0.0, -1.0)),
        (bounds.max.y - p.y, Vec2::new(0.0, 1.0)),
    ];
    let (depth, outward) = faces
        .into_iter()
        .min_by(|x, y| x.0.total_cmp(&y.0))
        .unwrap_or((f32::INFINITY, Vec2::zeros()));

    Some(Contact2::new(p + outward * depth, -outward, depth))
}

fn point_circle_impl<const DETAIL: bool>(p: &Vec2, circle: &Circle) -> Option<Contact2> {
    let offset = p - circle.center;
    let d2 = offset.norm_squared();
    if d2 > circle.radius * circle.radius {
        return None;
    }
    if !DETAIL {
        return Some(Contact2::unresolved());
    }

    let d = d2.sqrt();
    let dir = if d2 < squared::COINCIDENT {
        Vec2::x()
    } else {
        offset / d
    };
    Some(Contact2::new(
        circle.center + dir * circle.radius,
        -dir,
        circle.radius - d,
    ))
}
