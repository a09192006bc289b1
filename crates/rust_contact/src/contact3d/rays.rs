//! Ray casts against solids and skins
//!
//! Rays are half-lines: hits behind the origin are ignored. A ray starting
//! inside a closed shape reports where it leaves.

use crate::contact::RayHit3;
use crate::foundation::math::Vec3;
use crate::geometry::{BoundBox3, Ray3, Skin, Sphere, Triangle};

/// A ray hit on a skin, with the triangle that was hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkinHit {
    /// Distance, point and triangle normal
    pub hit: RayHit3,
    /// Index of the triangle in the skin
    pub triangle: usize,
}

/// Ray crosses a triangle, from either side
pub fn ray_tri(ray: &Ray3, tri: &Triangle) -> bool {
    tri.intersect_ray(ray).is_some()
}

/// Where a ray crosses a triangle; the normal follows the winding
pub fn ray_tri_hit(ray: &Ray3, tri: &Triangle) -> Option<RayHit3> {
    let (t, _, _) = tri.intersect_ray(ray)?;
    Some(RayHit3::new(
        t,
        ray.point_at(t),
        tri.try_normal().unwrap_or_else(Vec3::zeros),
    ))
}

/// Ray meets a ball
pub fn ray_sphere(ray: &Ray3, sphere: &Sphere) -> bool {
    sphere.intersect_ray(ray).is_some()
}

/// First point where a ray meets a sphere
pub fn ray_sphere_hit(ray: &Ray3, sphere: &Sphere) -> Option<RayHit3> {
    let (t, point, normal) = sphere.intersect_ray(ray)?;
    Some(RayHit3::new(t, point, normal))
}

/// Ray meets a box
pub fn ray_box(ray: &Ray3, bounds: &BoundBox3) -> bool {
    bounds.intersect_ray(&ray.origin, &ray.direction).is_some()
}

/// First point where a ray meets the surface of a box
pub fn ray_box_hit(ray: &Ray3, bounds: &BoundBox3) -> Option<RayHit3> {
    let (enter, exit) = bounds.clip_ray(&ray.origin, &ray.direction)?;
    if exit < 0.0 {
        return None;
    }
    let t = if enter >= 0.0 { enter } else { exit };
    let point = ray.point_at(t);

    // The face is on the axis where the point sits furthest out, relative to
    // the box extents
    let extents = bounds.extents().map(|e| e.max(f32::EPSILON));
    let rel = (point - bounds.center()).component_div(&extents);
    let axis = rel.iamax();
    let mut normal = Vec3::zeros();
    normal[axis] = rel[axis].signum();

    Some(RayHit3::new(t, point, normal))
}

/// Ray crosses any triangle of a skin
pub fn ray_skin(ray: &Ray3, skin: &Skin) -> bool {
    skin.triangles().any(|tri| tri.intersect_ray(ray).is_some())
}

/// Nearest triangle of a skin along a ray, by linear scan
pub fn ray_skin_hit(ray: &Ray3, skin: &Skin) -> Option<SkinHit> {
    skin.triangles()
        .enumerate()
        .filter_map(|(index, tri)| {
            ray_tri_hit(ray, &tri).map(|hit| SkinHit {
                hit,
                triangle: index,
            })
        })
        .min_by(|a, b| a.hit.t.total_cmp(&b.hit.t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ray_tri_hit_and_normal() {
        let tri = Triangle::new(Vec3::zeros(), Vec3::x(), Vec3::y());
        let ray = Ray3::new(Vec3::new(0.2, 0.2, 3.0), -Vec3::z());
        let hit = ray_tri_hit(&ray, &tri).unwrap();
        assert_relative_eq!(hit.t, 3.0, epsilon = 1e-6);
        assert_relative_eq!(hit.point, Vec3::new(0.2, 0.2, 0.0), epsilon = 1e-6);
        assert_relative_eq!(hit.normal, Vec3::z());
        assert!(!ray_tri(&Ray3::new(Vec3::new(0.2, 0.2, 3.0), Vec3::z()), &tri));
    }

    #[test]
    fn test_ray_box_hit_faces() {
        let bounds = BoundBox3::new(Vec3::zeros(), Vec3::new(2.0, 2.0, 2.0));
        let hit = ray_box_hit(&Ray3::new(Vec3::new(1.0, 1.0, -3.0), Vec3::z()), &bounds).unwrap();
        assert_relative_eq!(hit.t, 3.0);
        assert_relative_eq!(hit.normal, -Vec3::z());

        let leaving = ray_box_hit(&Ray3::new(Vec3::repeat(1.0), Vec3::x()), &bounds).unwrap();
        assert_relative_eq!(leaving.t, 1.0);
        assert_relative_eq!(leaving.normal, Vec3::x());

        assert!(!ray_box(&Ray3::new(Vec3::new(1.0, 1.0, 3.0), Vec3::z()), &bounds));
    }

    #[test]
    fn test_ray_skin_nearest_triangle() {
        let skin = Skin::box_grid(&BoundBox3::new(Vec3::zeros(), Vec3::repeat(2.0)), 2);
        let ray = Ray3::new(Vec3::new(0.7, 1.3, 5.0), -Vec3::z());
        let hit = ray_skin_hit(&ray, &skin).unwrap();
        assert_relative_eq!(hit.hit.t, 3.0, epsilon = 1e-5);
        assert_relative_eq!(hit.hit.normal, Vec3::z(), epsilon = 1e-6);
        assert!(ray_tri(&ray, &skin.triangle(hit.triangle)));
        assert!(!ray_skin(&Ray3::new(Vec3::new(3.0, 1.0, 5.0), -Vec3::z()), &skin));
    }

    #[test]
    fn test_ray_sphere_matches_primitive() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0);
        let hit = ray_sphere_hit(&Ray3::new(Vec3::zeros(), Vec3::z()), &sphere).unwrap();
        assert_relative_eq!(hit.t, 4.0, epsilon = 1e-6);
        assert_relative_eq!(hit.normal, -Vec3::z(), epsilon = 1e-6);
        assert!(!ray_sphere(&Ray3::new(Vec3::zeros(), -Vec3::z()), &sphere));
    }
}
