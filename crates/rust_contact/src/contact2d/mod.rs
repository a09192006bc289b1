//! Planar contact tests
//!
//! Pairwise tests between points, segments, rays, axis-aligned boxes, circles
//! and convex polygons. Each pair `x_y` has a predicate `x_y(..) -> bool` and
//! a detailed `x_y_contact(..) -> Option<Contact2>`; see [`crate::contact`]
//! for the normal and penetration conventions.
//!
//! Polygons are `&[Vec2]` rings of either winding. The horizontal floor tests
//! (`ydown_*`) treat everything below `limy` as solid.
//!
//! [`Contact2`]: crate::contact::Contact2

mod ground;
mod lines;
mod point;
mod poly;
mod shapes;

pub use ground::{ydown_circle, ydown_circle_contact, ydown_poly, ydown_poly_contact};
pub use lines::{
    cross_line_circle, cross_line_line, cross_yline_line, ray_box, ray_box_hit, ray_circle,
    ray_circle_hit, ray_poly, ray_poly_hit, segment_segment, CircleCrossings,
};
pub use point::{
    point_box, point_box_contact, point_circle, point_circle_contact, point_poly,
    point_poly_contact, point_tri, point_tri_contact,
};
pub use poly::{box_poly, box_poly_contact, poly_poly, poly_poly_contact};
pub use shapes::{
    box_box, box_box_contact, box_circle, box_circle_contact, circle_circle,
    circle_circle_contact, circle_poly, circle_poly_contact,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::TAU;
    use crate::foundation::math::Vec2;
    use crate::geometry::{BoundBox2, Circle};

    /// Deterministic scatter over `[-span, span]^2`
    fn scatter(count: usize, span: f32) -> Vec<Vec2> {
        let mut state = 0x2545_f491_u32;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state as f32 / u32::MAX as f32) * 2.0 - 1.0
        };
        (0..count).map(|_| Vec2::new(next() * span, next() * span)).collect()
    }

    fn hexagon(center: Vec2, radius: f32) -> Vec<Vec2> {
        (0..6)
            .map(|i| {
                let a = i as f32 * TAU / 6.0;
                center + Vec2::new(a.cos(), a.sin()) * radius
            })
            .collect()
    }

    #[test]
    fn test_predicates_agree_with_contacts() {
        let tri = [Vec2::new(-1.0, -1.0), Vec2::new(1.5, -0.5), Vec2::new(0.0, 1.5)];
        let hex = hexagon(Vec2::zeros(), 1.2);
        let bounds = BoundBox2::new(Vec2::new(-0.8, -0.4), Vec2::new(0.9, 0.7));
        let circle = Circle::new(Vec2::new(0.2, -0.1), 0.9);

        for p in scatter(200, 2.0) {
            assert_eq!(point_tri(&p, &tri), point_tri_contact(&p, &tri).is_some());
            assert_eq!(point_poly(&p, &hex), point_poly_contact(&p, &hex).is_some());
            assert_eq!(point_box(&p, &bounds), point_box_contact(&p, &bounds).is_some());
            assert_eq!(point_circle(&p, &circle), point_circle_contact(&p, &circle).is_some());

            let moved_circle = Circle::new(p, 0.5);
            let moved_hex = hexagon(p, 0.6);
            let moved_box = BoundBox2::from_center_extents(p, Vec2::new(0.4, 0.3));

            assert_eq!(
                circle_circle(&circle, &moved_circle),
                circle_circle_contact(&circle, &moved_circle).is_some()
            );
            assert_eq!(
                circle_poly(&moved_circle, &hex),
                circle_poly_contact(&moved_circle, &hex).is_some()
            );
            assert_eq!(poly_poly(&hex, &moved_hex), poly_poly_contact(&hex, &moved_hex).is_some());
            assert_eq!(poly_poly(&moved_hex, &tri), poly_poly_contact(&moved_hex, &tri).is_some());
            assert_eq!(
                box_box(&bounds, &moved_box),
                box_box_contact(&bounds, &moved_box).is_some()
            );
            assert_eq!(box_poly(&moved_box, &hex), box_poly_contact(&moved_box, &hex).is_some());
            assert_eq!(
                box_circle(&moved_box, &circle),
                box_circle_contact(&moved_box, &circle).is_some()
            );
            assert_eq!(ydown_poly(&moved_hex, 0.0), ydown_poly_contact(&moved_hex, 0.0).is_some());
            assert_eq!(
                ydown_circle(&moved_circle, 0.0),
                ydown_circle_contact(&moved_circle, 0.0).is_some()
            );
        }
    }

    #[test]
    fn test_poly_poly_normals_flip_on_swap() {
        let hex = hexagon(Vec2::zeros(), 1.0);
        for p in scatter(100, 1.5) {
            let other = hexagon(p, 0.7);
            let ab = poly_poly_contact(&hex, &other);
            let ba = poly_poly_contact(&other, &hex);
            if let (Some(ab), Some(ba)) = (ab, ba) {
                assert!((ab.normal + ba.normal).norm() < 1e-4, "{ab:?} vs {ba:?}");
            }
        }
    }
}
