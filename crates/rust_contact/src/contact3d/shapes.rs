//! Box, sphere and triangle pairs

use super::point::nearest_box_face;
use crate::contact::tolerance::{linear, squared};
use crate::contact::{contact_pair, Contact3};
use crate::foundation::math::Vec3;
use crate::geometry::{BoundBox3, Sphere, Triangle};

contact_pair! {
    /// Two axis-aligned boxes overlap, touching included
    ///
    /// The normal lies along the axis of least overlap. The Kd-tree builder
    /// uses the predicate to sort triangles into child boxes.
    box_box, box_box_contact => box_box_impl(a: &BoundBox3, b: &BoundBox3) -> Contact3
}

contact_pair! {
    /// Box and ball overlap
    box_sphere, box_sphere_contact =>
        box_sphere_impl(bounds: &BoundBox3, sphere: &Sphere) -> Contact3
}

contact_pair! {
    /// Two balls overlap
    ///
    /// `penet` is the signed separation `distance - (ra + rb)`, zero or
    /// negative for every reported contact.
    sphere_sphere, sphere_sphere_contact => sphere_sphere_impl(a: &Sphere, b: &Sphere) -> Contact3
}

contact_pair! {
    /// Triangle touches a ball
    ///
    /// Measured from the closest point of the triangle to the center; the
    /// normal points from the triangle toward the center.
    cross_tri_sphere, cross_tri_sphere_contact =>
        cross_tri_sphere_impl(tri: &Triangle, sphere: &Sphere) -> Contact3
}

fn box_box_impl<const DETAIL: bool>(a: &BoundBox3, b: &BoundBox3) -> Option<Contact3> {
    if !a.intersects(b) {
        return None;
    }
    if !DETAIL {
        return Some(Contact3::unresolved());
    }

    let lo = a.min.sup(&b.min);
    let hi = a.max.inf(&b.max);
    let overlap = hi - lo;
    let axis = overlap.imin();
    let mut normal = Vec3::zeros();
    normal[axis] = if b.center()[axis] >= a.center()[axis] { 1.0 } else { -1.0 };

    Some(Contact3::new((lo + hi) * 0.5, normal, overlap[axis]))
}

fn box_sphere_impl<const DETAIL: bool>(bounds: &BoundBox3, sphere: &Sphere) -> Option<Contact3> {
    let c = sphere.center;
    let r = sphere.radius;

    if bounds.contains_point(&c) {
        if !DETAIL {
            return Some(Contact3::unresolved());
        }
        let (dist, outward) = nearest_box_face(&c, bounds);
        return Some(Contact3::new(c + outward * dist, outward, r + dist));
    }

    let closest = c.sup(&bounds.min).inf(&bounds.max);
    let offset = c - closest;
    let d2 = offset.norm_squared();
    if d2 > r * r {
        return None;
    }
    if !DETAIL {
        return Some(Contact3::unresolved());
    }
    let d = d2.sqrt();
    Some(Contact3::new(closest, offset / d, r - d))
}

fn sphere_sphere_impl<const DETAIL: bool>(a: &Sphere, b: &Sphere) -> Option<Contact3> {
    let offset = b.center - a.center;
    let d2 = offset.norm_squared();
    let radius_sum = a.radius + b.radius;
    if d2 > radius_sum * radius_sum {
        return None;
    }
    if !DETAIL {
        return Some(Contact3::unresolved());
    }

    let d = d2.sqrt();
    let normal = if d2 < squared::COINCIDENT {
        Vec3::zeros()
    } else {
        offset / d
    };
    let pt = if radius_sum < linear::DEGENERATE_LENGTH {
        (a.center + b.center) * 0.5
    } else {
        (a.center * b.radius + b.center * a.radius) / radius_sum
    };
    Some(Contact3::new(pt, normal, d - radius_sum))
}

fn cross_tri_sphere_impl<const DETAIL: bool>(tri: &Triangle, sphere: &Sphere) -> Option<Contact3> {
    let closest = tri.closest_point(&sphere.center);
    let offset = sphere.center - closest;
    let d2 = offset.norm_squared();
    if d2 > sphere.radius * sphere.radius {
        return None;
    }
    if !DETAIL {
        return Some(Contact3::unresolved());
    }

    let d = d2.sqrt();
    let normal = if d2 < squared::COINCIDENT {
        tri.try_normal().unwrap_or_else(Vec3::zeros)
    } else {
        offset / d
    };
    Some(Contact3::new(closest, normal, sphere.radius - d))
}
