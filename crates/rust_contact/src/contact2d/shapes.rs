//! Box and circle pairs

use super::ground::{segment_area, segment_centroid_offset};
use super::lines::cross_line_circle;
use crate::contact::tolerance::{area, linear, squared};
use crate::contact::{contact_pair, Contact2};
use crate::foundation::math::constants::TAU;
use crate::foundation::math::{cross2, Vec2};
use crate::geometry::polygon::{
    self, area_centroid, area_centroid_from, closest_on_boundary, edge, nearest_edge,
    outward_normal, to_ccw, winding,
};
use crate::geometry::{BoundBox2, Circle};

contact_pair! {
    /// Two axis-aligned boxes overlap, touching included
    ///
    /// The normal lies along the axis of least overlap.
    box_box, box_box_contact => box_box_impl(a: &BoundBox2, b: &BoundBox2) -> Contact2
}

contact_pair! {
    /// Box and disc overlap
    box_circle, box_circle_contact =>
        box_circle_impl(bounds: &BoundBox2, circle: &Circle) -> Contact2
}

contact_pair! {
    /// Two discs overlap
    ///
    /// `penet` is the signed separation `distance - (ra + rb)`, zero or
    /// negative for every reported contact.
    circle_circle, circle_circle_contact => circle_circle_impl(a: &Circle, b: &Circle) -> Contact2
}

contact_pair! {
    /// Disc and convex polygon overlap
    ///
    /// The contact point is the area centroid of their intersection.
    circle_poly, circle_poly_contact => circle_poly_impl(circle: &Circle, poly: &[Vec2]) -> Contact2
}

fn box_box_impl<const DETAIL: bool>(a: &BoundBox2, b: &BoundBox2) -> Option<Contact2> {
    let lo = a.min.sup(&b.min);
    let hi = a.max.inf(&b.max);
    if hi.x < lo.x || hi.y < lo.y {
        return None;
    }
    if !DETAIL {
        return Some(Contact2::unresolved());
    }

    let overlap = hi - lo;
    let axis = if overlap.x <= overlap.y { 0 } else { 1 };
    let mut normal = Vec2::zeros();
    normal[axis] = if b.center()[axis] >= a.center()[axis] { 1.0 } else { -1.0 };

    Some(Contact2::new((lo + hi) * 0.5, normal, overlap[axis]))
}

fn box_circle_impl<const DETAIL: bool>(bounds: &BoundBox2, circle: &Circle) -> Option<Contact2> {
    let c = circle.center;
    let r = circle.radius;
    let outside_x = c.x < bounds.min.x || c.x > bounds.max.x;
    let outside_y = c.y < bounds.min.y || c.y > bounds.max.y;

    match (outside_x, outside_y) {
        (true, true) => {
            let corner = c.sup(&bounds.min).inf(&bounds.max);
            let offset = c - corner;
            let d2 = offset.norm_squared();
            if d2 > r * r {
                return None;
            }
            if !DETAIL {
                return Some(Contact2::unresolved());
            }
            let d = d2.sqrt();
            Some(Contact2::new(corner, offset / d, r - d))
        }
        (true, false) | (false, true) => {
            let axis = usize::from(outside_y);
            let (dist, side, face) = if c[axis] < bounds.min[axis] {
                (bounds.min[axis] - c[axis], -1.0, bounds.min[axis])
            } else {
                (c[axis] - bounds.max[axis], 1.0, bounds.max[axis])
            };
            if dist > r {
                return None;
            }
            if !DETAIL {
                return Some(Contact2::unresolved());
            }
            let mut normal = Vec2::zeros();
            normal[axis] = side;
            let mut pt = c;
            pt[axis] = face;
            Some(Contact2::new(pt, normal, r - dist))
        }
        (false, false) => {
            if !DETAIL {
                return Some(Contact2::unresolved());
            }
            // Center inside: push out through the nearest face
            let faces = [
                (c.x - bounds.min.x, Vec2::new(-1.0, 0.0)),
                (bounds.max.x - c.x, Vec2::new(1.0, 0.0)),
                (c.y - bounds.min.y, Vec2::new(0.0, -1.0)),
                (bounds.max.y - c.y, Vec2::new(0.0, 1.0)),
            ];
            let (dist, outward) = faces
                .into_iter()
                .min_by(|x, y| x.0.total_cmp(&y.0))
                .unwrap_or((f32::INFINITY, Vec2::zeros()));
            Some(Contact2::new(c + outward * dist, outward, r + dist))
        }
    }
}

fn circle_circle_impl<const DETAIL: bool>(a: &Circle, b: &Circle) -> Option<Contact2> {
    let offset = b.center - a.center;
    let d2 = offset.norm_squared();
    let radius_sum = a.radius + b.radius;
    if d2 > radius_sum * radius_sum {
        return None;
    }
    if !DETAIL {
        return Some(Contact2::unresolved());
    }

    let d = d2.sqrt();
    let normal = if d2 < squared::COINCIDENT {
        Vec2::zeros()
    } else {
        offset / d
    };
    // (ca/ra + cb/rb) / (1/ra + 1/rb), scaled through by ra * rb
    let pt = if radius_sum < linear::DEGENERATE_LENGTH {
        (a.center + b.center) * 0.5
    } else {
        (a.center * b.radius + b.center * a.radius) / radius_sum
    };
    Some(Contact2::new(pt, normal, d - radius_sum))
}

fn circle_poly_impl<const DETAIL: bool>(circle: &Circle, poly: &[Vec2]) -> Option<Contact2> {
    if poly.len() < 3 {
        return None;
    }
    let c = circle.center;
    let r = circle.radius;
    let center_inside = polygon::contains(poly, &c);
    let (closest, d2) = closest_on_boundary(poly, &c);
    if !center_inside && d2 > r * r {
        return None;
    }
    if !DETAIL {
        return Some(Contact2::unresolved());
    }

    let wind = winding(poly);
    let nearest = nearest_edge(poly, wind, &c);
    let (normal, penet) = if center_inside {
        (-outward_normal(poly, nearest.index, wind), r + nearest.depth.max(0.0))
    } else {
        let d = d2.sqrt();
        let normal = (closest - c)
            .try_normalize(linear::DEGENERATE_LENGTH)
            .unwrap_or_else(|| -outward_normal(poly, nearest.index, wind));
        (normal, r - d)
    };

    let pt = overlap_centroid(circle, poly, center_inside).unwrap_or(closest);
    Some(Contact2::new(pt, normal, penet))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RingPoint {
    Vertex,
    Entry,
    Exit,
}

/// Area centroid of a disc intersected with a convex ring
///
/// `None` when the intersection has no measurable area.
fn overlap_centroid(circle: &Circle, poly: &[Vec2], center_inside: bool) -> Option<Vec2> {
    let c = circle.center;
    let r2 = circle.radius * circle.radius;
    let ring = to_ccw(poly);

    let mut flat: Vec<Vec2> = Vec::with_capacity(ring.len() + 4);
    let mut kinds: Vec<RingPoint> = Vec::with_capacity(ring.len() + 4);
    let mut crossed = false;

    for i in 0..ring.len() {
        let (a, b) = edge(&ring, i);
        if (a - c).norm_squared() <= r2 {
            flat.push(a);
            kinds.push(RingPoint::Vertex);
        }

        let crossings = cross_line_circle(&a, &b, circle);
        if crossings.is_tangent() {
            continue;
        }
        for &(_, p) in crossings.as_slice() {
            crossed = true;
            let entering = (p - c).dot(&(b - a)) < 0.0;
            flat.push(p);
            kinds.push(if entering { RingPoint::Entry } else { RingPoint::Exit });
        }
    }

    if !crossed {
        return if flat.len() == ring.len() {
            Some(area_centroid(&ring).1)
        } else if flat.is_empty() && center_inside {
            Some(c)
        } else {
            None
        };
    }

    let (flat_area, flat_centroid) = area_centroid_from(&flat, &c);
    let mut total = flat_area;
    let mut moment = flat_centroid * flat_area;

    // Every exit followed by an entry bounds a circular cap on the outside of
    // the flat ring.
    let n = flat.len();
    for k in 0..n {
        let next = (k + 1) % n;
        if kinds[k] != RingPoint::Exit || kinds[next] != RingPoint::Entry {
            continue;
        }
        let from = flat[k] - c;
        let to = flat[next] - c;
        let mut sweep = cross2(&from, &to).atan2(from.dot(&to));
        if sweep < 0.0 {
            sweep += TAU;
        }
        let alpha = sweep * 0.5;
        let cap_area = segment_area(circle.radius, alpha);
        if cap_area < area::DEGENERATE {
            continue;
        }
        let (sin, cos) = alpha.sin_cos();
        let from_dir = from / circle.radius;
        let mid_dir = Vec2::new(
            from_dir.x * cos - from_dir.y * sin,
            from_dir.x * sin + from_dir.y * cos,
        );
        let cap_centroid = c + mid_dir * segment_centroid_offset(circle.radius, alpha);
        total += cap_area;
        moment += cap_centroid * cap_area;
    }

    (total >= area::DEGENERATE).then(|| moment / total)
}
