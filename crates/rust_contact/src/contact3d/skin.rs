//! Tests against triangle soups
//!
//! Both tests scan every triangle. They treat the skin as the intersection of
//! the half-spaces behind its triangles, so they are exact for closed convex
//! skins with outward winding and only approximate otherwise. Nothing is
//! promised for open, non-manifold or inconsistently wound soups.

use super::shapes::{cross_tri_sphere, cross_tri_sphere_contact};
use crate::contact::tolerance::linear;
use crate::contact::{contact_pair, Contact3};
use crate::foundation::math::Vec3;
use crate::geometry::{Skin, Sphere};

contact_pair! {
    /// Point behind the supporting plane of every triangle of a skin
    ///
    /// Degenerate triangles are skipped; a skin without a usable triangle
    /// contains nothing. The detailed form reports the nearest plane.
    point_skin, point_skin_contact => point_skin_impl(p: &Vec3, skin: &Skin) -> Contact3
}

contact_pair! {
    /// Ball touching or inside a skin
    ///
    /// A center inside the skin is pushed out through the nearest plane;
    /// otherwise the closest triangle decides.
    sphere_skin, sphere_skin_contact => sphere_skin_impl(sphere: &Sphere, skin: &Skin) -> Contact3
}

fn point_skin_impl<const DETAIL: bool>(p: &Vec3, skin: &Skin) -> Option<Contact3> {
    // (signed distance, unit normal) of the plane the point is closest behind
    let mut nearest: Option<(f32, Vec3)> = None;

    for tri in skin.triangles() {
        let Some(normal) = tri.try_normal() else {
            continue;
        };
        let dist = normal.dot(&(p - tri.v0));
        if dist > linear::PLANE {
            return None;
        }
        if nearest.map_or(true, |(best, _)| dist > best) {
            nearest = Some((dist, normal));
        }
    }

    let (dist, normal) = nearest?;
    if !DETAIL {
        return Some(Contact3::unresolved());
    }
    Some(Contact3::new(p - normal * dist, -normal, (-dist).max(0.0)))
}

fn sphere_skin_impl<const DETAIL: bool>(sphere: &Sphere, skin: &Skin) -> Option<Contact3> {
    if let Some(inside) = point_skin_impl::<DETAIL>(&sphere.center, skin) {
        if !DETAIL {
            return Some(inside);
        }
        return Some(Contact3::new(
            inside.pt,
            inside.normal,
            sphere.radius + inside.penet,
        ));
    }

    if !DETAIL {
        return skin
            .triangles()
            .any(|tri| cross_tri_sphere(&tri, sphere))
            .then(Contact3::unresolved);
    }

    // Deepest touching triangle, i.e. the one closest to the center
    let closest = skin
        .triangles()
        .filter_map(|tri| cross_tri_sphere_contact(&tri, sphere))
        .fold(None, |best: Option<Contact3>, c| match best {
            Some(b) if b.penet >= c.penet => Some(b),
            _ => Some(c),
        })?;
    Some(closest.flipped())
}
