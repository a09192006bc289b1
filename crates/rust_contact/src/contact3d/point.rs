//! Point containment in solids

use crate::contact::tolerance::{area, squared};
use crate::contact::{contact_pair, Contact3};
use crate::foundation::math::Vec3;
use crate::geometry::{BoundBox3, Sphere, Tetra};

contact_pair! {
    /// Point inside a tetrahedron of either orientation, boundary included
    ///
    /// Flat tetrahedra contain nothing.
    point_tetra, point_tetra_contact => point_tetra_impl(p: &Vec3, tetra: &Tetra) -> Contact3
}

contact_pair! {
    /// Point inside an axis-aligned box, boundary included
    point_box, point_box_contact => point_box_impl(p: &Vec3, bounds: &BoundBox3) -> Contact3
}

contact_pair! {
    /// Point inside a ball, boundary included
    point_sphere, point_sphere_contact => point_sphere_impl(p: &Vec3, sphere: &Sphere) -> Contact3
}

fn point_tetra_impl<const DETAIL: bool>(p: &Vec3, tetra: &Tetra) -> Option<Contact3> {
    let spin = tetra.spin();
    if spin.abs() < area::DEGENERATE {
        return None;
    }
    let orientation = spin.signum();

    // (outward unit normal, a point on the face)
    let faces = Tetra::FACES.map(|(face, _)| {
        let [a, b, c] = face.map(|i| tetra.points[i]);
        ((b - a).cross(&(c - a)) * orientation, a)
    });

    if faces.iter().any(|(n, a)| n.dot(&(p - a)) > 0.0) {
        return None;
    }
    if !DETAIL {
        return Some(Contact3::unresolved());
    }

    let (depth, outward) = faces
        .iter()
        .filter_map(|(n, a)| {
            let unit = n.try_normalize(squared::COINCIDENT)?;
            Some((-unit.dot(&(p - a)), unit))
        })
        .min_by(|x, y| x.0.total_cmp(&y.0))
        .unwrap_or((f32::INFINITY, Vec3::zeros()));

    Some(Contact3::new(p + outward * depth, -outward, depth.max(0.0)))
}

fn point_box_impl<const DETAIL: bool>(p: &Vec3, bounds: &BoundBox3) -> Option<Contact3> {
    if !bounds.contains_point(p) {
        return None;
    }
    if !DETAIL {
        return Some(Contact3::unresolved());
    }

    let (depth, outward) = nearest_box_face(p, bounds);
    Some(Contact3::new(p + outward * depth, -outward, depth))
}

/// Distance to and outward normal of the box face nearest an inside point
pub(crate) fn nearest_box_face(p: &Vec3, bounds: &BoundBox3) -> (f32, Vec3) {
    let mut best = (f32::INFINITY, Vec3::zeros());
    for axis in 0..3 {
        let sides = [(p[axis] - bounds.min[axis], -1.0), (bounds.max[axis] - p[axis], 1.0)];
        for (dist, side) in sides {
            if dist < best.0 {
                let mut outward = Vec3::zeros();
                outward[axis] = side;
                best = (dist, outward);
            }
        }
    }
    best
}

fn point_sphere_impl<const DETAIL: bool>(p: &Vec3, sphere: &Sphere) -> Option<Contact3> {
    let offset = p - sphere.center;
    let d2 = offset.norm_squared();
    if d2 > sphere.radius * sphere.radius {
        return None;
    }
    if !DETAIL {
        return Some(Contact3::unresolved());
    }

    let d = d2.sqrt();
    let dir = if d2 < squared::COINCIDENT { Vec3::x() } else { offset / d };
    Some(Contact3::new(
        sphere.center + dir * sphere.radius,
        -dir,
        sphere.radius - d,
    ))
}
