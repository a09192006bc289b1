//! Spatial contact tests
//!
//! Mirrors [`crate::contact2d`] in three dimensions: points, tetrahedra,
//! axis-aligned boxes, spheres, triangles and skins. Each pair `x_y` has a
//! predicate and a detailed `x_y_contact` returning [`Contact3`]; ray casts
//! come as `ray_x` / `ray_x_hit`.
//!
//! [`Contact3`]: crate::contact::Contact3

mod point;
mod rays;
mod shapes;
mod skin;

pub use point::{
    point_box, point_box_contact, point_sphere, point_sphere_contact, point_tetra,
    point_tetra_contact,
};
pub use rays::{
    ray_box, ray_box_hit, ray_skin, ray_skin_hit, ray_sphere, ray_sphere_hit, ray_tri, ray_tri_hit,
    SkinHit,
};
pub use shapes::{
    box_box, box_box_contact, box_sphere, box_sphere_contact, cross_tri_sphere,
    cross_tri_sphere_contact, sphere_sphere, sphere_sphere_contact,
};
pub use skin::{point_skin, point_skin_contact, sphere_skin, sphere_skin_contact};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::geometry::{BoundBox3, Skin, Sphere, Tetra, Triangle};

    fn lattice(step: f32, span: f32) -> impl Iterator<Item = Vec3> {
        let n = (2.0 * span / step) as i32;
        (0..=n).flat_map(move |i| {
            (0..=n).flat_map(move |j| {
                (0..=n).map(move |k| {
                    Vec3::new(
                        -span + i as f32 * step + 0.021,
                        -span + j as f32 * step + 0.013,
                        -span + k as f32 * step - 0.007,
                    )
                })
            })
        })
    }

    #[test]
    fn test_predicates_agree_with_contacts() {
        let tetra = Tetra::new(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.2, -0.8, -0.9),
            Vec3::new(0.1, 1.1, -0.7),
            Vec3::new(0.0, 0.2, 1.3),
        );
        let bounds = BoundBox3::new(Vec3::new(-0.6, -0.5, -0.4), Vec3::new(0.7, 0.4, 0.9));
        let sphere = Sphere::new(Vec3::new(0.1, -0.2, 0.3), 0.8);
        let tri = Triangle::new(
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, -0.3, 0.2),
            Vec3::new(0.0, 1.0, -0.4),
        );
        let skin = Skin::box_grid(&bounds, 2);

        for p in lattice(0.3, 1.5) {
            assert_eq!(point_tetra(&p, &tetra), point_tetra_contact(&p, &tetra).is_some());
            assert_eq!(point_box(&p, &bounds), point_box_contact(&p, &bounds).is_some());
            assert_eq!(point_sphere(&p, &sphere), point_sphere_contact(&p, &sphere).is_some());
            assert_eq!(point_skin(&p, &skin), point_skin_contact(&p, &skin).is_some());
            assert_eq!(point_skin(&p, &skin), point_box(&p, &bounds));

            let ball = Sphere::new(p, 0.3);
            let cube = BoundBox3::from_center_extents(p, Vec3::repeat(0.25));
            assert_eq!(
                sphere_sphere(&sphere, &ball),
                sphere_sphere_contact(&sphere, &ball).is_some()
            );
            assert_eq!(box_sphere(&bounds, &ball), box_sphere_contact(&bounds, &ball).is_some());
            assert_eq!(box_box(&bounds, &cube), box_box_contact(&bounds, &cube).is_some());
            assert_eq!(
                cross_tri_sphere(&tri, &ball),
                cross_tri_sphere_contact(&tri, &ball).is_some()
            );
            assert_eq!(sphere_skin(&ball, &skin), sphere_skin_contact(&ball, &skin).is_some());
        }
    }
}
