//! Shapes against a horizontal floor
//!
//! The floor is the half-plane `y < limy`. The reported normal always points
//! down into it, `(0, -1)`, and `penet` is how far the lowest point of the
//! shape reaches past `limy`.

use super::lines::cross_yline_line;
use crate::contact::tolerance::area;
use crate::contact::{contact_pair, Contact2};
use crate::foundation::math::Vec2;
use crate::geometry::polygon::{area_centroid, edge};
use crate::geometry::Circle;

contact_pair! {
    /// Convex polygon reaching below the horizontal line `limy`
    ///
    /// The contact point is the area centroid of the part below the line.
    ydown_poly, ydown_poly_contact => ydown_poly_impl(poly: &[Vec2], limy: f32) -> Contact2
}

contact_pair! {
    /// Circle reaching below the horizontal line `limy`
    ///
    /// The contact point is the centroid of the circular segment below the
    /// line.
    ydown_circle, ydown_circle_contact => ydown_circle_impl(circle: &Circle, limy: f32) -> Contact2
}

fn floor_normal() -> Vec2 {
    Vec2::new(0.0, -1.0)
}

fn ydown_poly_impl<const DETAIL: bool>(poly: &[Vec2], limy: f32) -> Option<Contact2> {
    let (min_y, max_y) = poly
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));

    // Also rejects the empty ring
    if min_y >= limy {
        return None;
    }
    if !DETAIL {
        return Some(Contact2::unresolved());
    }

    let penet = limy - min_y;
    if max_y <= limy {
        let (_, centroid) = area_centroid(poly);
        return Some(Contact2::new(centroid, floor_normal(), penet));
    }

    // Keep the vertices on the floor side and close the gap with the points
    // where the outline crosses the limit.
    let mut clipped = Vec::with_capacity(poly.len() + 2);
    for i in 0..poly.len() {
        let (a, b) = edge(poly, i);
        if a.y <= limy {
            clipped.push(a);
        }
        if (a.y - limy) * (b.y - limy) < 0.0 {
            let t = cross_yline_line(limy, &a, &b);
            if t.is_finite() {
                clipped.push(a + (b - a) * t);
            }
        }
    }

    let (_, centroid) = area_centroid(&clipped);
    Some(Contact2::new(centroid, floor_normal(), penet))
}

fn ydown_circle_impl<const DETAIL: bool>(circle: &Circle, limy: f32) -> Option<Contact2> {
    let bottom = circle.center.y - circle.radius;
    if bottom >= limy {
        return None;
    }
    if !DETAIL {
        return Some(Contact2::unresolved());
    }

    let penet = limy - bottom;
    if circle.center.y + circle.radius <= limy {
        return Some(Contact2::new(circle.center, floor_normal(), penet));
    }

    // Half angle of the arc below the limit
    let alpha = ((circle.center.y - limy) / circle.radius).clamp(-1.0, 1.0).acos();
    let offset = segment_centroid_offset(circle.radius, alpha);
    let pt = Vec2::new(circle.center.x, circle.center.y - offset);
    Some(Contact2::new(pt, floor_normal(), penet))
}

/// Distance from the center to the centroid of a circular segment whose arc
/// spans `2 * alpha`
pub(crate) fn segment_centroid_offset(radius: f32, alpha: f32) -> f32 {
    let (sin, cos) = alpha.sin_cos();
    let shape = alpha - sin * cos;
    if shape < area::DEGENERATE {
        return radius;
    }
    2.0 * radius * sin * sin * sin / (3.0 * shape)
}

/// Area of a circular segment whose arc spans `2 * alpha`
pub(crate) fn segment_area(radius: f32, alpha: f32) -> f32 {
    let (sin, cos) = alpha.sin_cos();
    radius * radius * (alpha - sin * cos)
}
