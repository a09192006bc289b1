//! Lines, segments and rays against planar shapes

use crate::contact::tolerance::{linear, squared};
use crate::contact::RayHit2;
use crate::foundation::math::{cross2, Vec2};
use crate::geometry::polygon::{edge, outward_normal, winding};
use crate::geometry::{BoundBox2, Circle, Ray2};

/// Parameter along `a0 -> a1` where the line through it meets the line
/// through `b0 -> b1`
///
/// `f32::NEG_INFINITY` when the lines are parallel. The result is not
/// restricted to the segment; compare it against `[0, 1]` for that.
pub fn cross_line_line(a0: &Vec2, a1: &Vec2, b0: &Vec2, b1: &Vec2) -> f32 {
    line_params(a0, a1, b0, b1).map_or(f32::NEG_INFINITY, |(t, _)| t)
}

/// Parameters `(t, s)` of the intersection of two lines, along `a` and `b`
pub(crate) fn line_params(a0: &Vec2, a1: &Vec2, b0: &Vec2, b1: &Vec2) -> Option<(f32, f32)> {
    let da = a1 - a0;
    let db = b1 - b0;
    let det = cross2(&da, &db);
    if det.abs() < linear::PARALLEL_DET {
        return None;
    }
    let offset = b0 - a0;
    Some((cross2(&offset, &db) / det, cross2(&offset, &da) / det))
}

/// Crossing point of two segments, endpoints included
pub fn segment_segment(a0: &Vec2, a1: &Vec2, b0: &Vec2, b1: &Vec2) -> Option<Vec2> {
    let (t, s) = line_params(a0, a1, b0, b1)?;
    ((0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&s)).then(|| a0 + (a1 - a0) * t)
}

/// Parameter along `a0 -> a1` where it crosses the horizontal line at `y`
///
/// `f32::NEG_INFINITY` when the segment is horizontal.
pub fn cross_yline_line(y: f32, a0: &Vec2, a1: &Vec2) -> f32 {
    let dy = a1.y - a0.y;
    if dy.abs() < linear::PARALLEL_DET {
        return f32::NEG_INFINITY;
    }
    (y - a0.y) / dy
}

/// Where a segment crosses a circle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleCrossings {
    points: [(f32, Vec2); 2],
    len: usize,
    tangent: bool,
}

impl CircleCrossings {
    fn empty() -> Self {
        Self {
            points: [(0.0, Vec2::zeros()); 2],
            len: 0,
            tangent: false,
        }
    }

    fn push(&mut self, t: f32, point: Vec2) {
        self.points[self.len] = (t, point);
        self.len += 1;
    }

    /// Crossings as `(segment parameter, point)`, in increasing parameter
    pub fn as_slice(&self) -> &[(f32, Vec2)] {
        &self.points[..self.len]
    }

    /// Number of crossings
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the segment stays clear of the circle outline
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True when the line only grazes the circle
    pub fn is_tangent(&self) -> bool {
        self.tangent
    }
}

/// Crossings of the segment `a0 -> a1` with the outline of `circle`
///
/// A discriminant within `linear::TANGENT_DISCRIMINANT` below zero collapses
/// to a single tangent point. Otherwise each root is kept on its own when its
/// parameter lies in `[0, 1]`.
pub fn cross_line_circle(a0: &Vec2, a1: &Vec2, circle: &Circle) -> CircleCrossings {
    let mut crossings = CircleCrossings::empty();

    let d = a1 - a0;
    let f = a0 - circle.center;
    let a = d.norm_squared();
    if a < squared::COINCIDENT {
        return crossings;
    }
    let b = 2.0 * f.dot(&d);
    let c = f.norm_squared() - circle.radius * circle.radius;
    let disc = b * b - 4.0 * a * c;

    if disc < -linear::TANGENT_DISCRIMINANT {
        return crossings;
    }

    if disc <= 0.0 {
        crossings.tangent = true;
        let t = -b / (2.0 * a);
        if (0.0..=1.0).contains(&t) {
            crossings.push(t, a0 + d * t);
        }
        return crossings;
    }

    let root = disc.sqrt();
    for t in [(-b - root) / (2.0 * a), (-b + root) / (2.0 * a)] {
        if (0.0..=1.0).contains(&t) {
            crossings.push(t, a0 + d * t);
        }
    }
    crossings
}

/// Ray meets the disc, including rays starting inside it
pub fn ray_circle(ray: &Ray2, circle: &Circle) -> bool {
    ray_circle_impl::<false>(ray, circle).is_some()
}

/// First point where the ray meets the circle outline
pub fn ray_circle_hit(ray: &Ray2, circle: &Circle) -> Option<RayHit2> {
    ray_circle_impl::<true>(ray, circle)
}

fn ray_circle_impl<const DETAIL: bool>(ray: &Ray2, circle: &Circle) -> Option<RayHit2> {
    let oc = ray.origin - circle.center;
    let b = oc.dot(&ray.direction);
    let c = oc.norm_squared() - circle.radius * circle.radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }

    let root = disc.sqrt();
    let t = if -b - root >= 0.0 {
        -b - root
    } else if -b + root >= 0.0 {
        -b + root
    } else {
        return None;
    };

    if !DETAIL {
        return Some(RayHit2::unresolved(t));
    }
    let point = ray.point_at(t);
    let normal = (point - circle.center)
        .try_normalize(linear::DEGENERATE_LENGTH)
        .unwrap_or_else(|| -ray.direction);
    Some(RayHit2::new(t, point, normal))
}

/// Ray meets the box, including rays starting inside it
pub fn ray_box(ray: &Ray2, bounds: &BoundBox2) -> bool {
    ray_box_impl::<false>(ray, bounds).is_some()
}

/// First point where the ray meets the box outline
///
/// A ray starting inside reports where it leaves.
pub fn ray_box_hit(ray: &Ray2, bounds: &BoundBox2) -> Option<RayHit2> {
    ray_box_impl::<true>(ray, bounds)
}

fn ray_box_impl<const DETAIL: bool>(ray: &Ray2, bounds: &BoundBox2) -> Option<RayHit2> {
    // (parameter, outward normal of the face crossed there)
    let mut enter = (f32::NEG_INFINITY, Vec2::zeros());
    let mut exit = (f32::INFINITY, Vec2::zeros());

    for axis in 0..2 {
        let o = ray.origin[axis];
        let d = ray.direction[axis];
        if d == 0.0 {
            if o < bounds.min[axis] || o > bounds.max[axis] {
                return None;
            }
            continue;
        }

        let mut n_min = Vec2::zeros();
        n_min[axis] = -1.0;
        let t_min = (bounds.min[axis] - o) / d;
        let t_max = (bounds.max[axis] - o) / d;
        let (near, far) = if t_min < t_max {
            ((t_min, n_min), (t_max, -n_min))
        } else {
            ((t_max, -n_min), (t_min, n_min))
        };

        if near.0 > enter.0 {
            enter = near;
        }
        if far.0 < exit.0 {
            exit = far;
        }
    }

    if exit.0 < enter.0 || exit.0 < 0.0 {
        return None;
    }
    let (t, normal) = if enter.0 >= 0.0 { enter } else { exit };
    if !DETAIL {
        return Some(RayHit2::unresolved(t));
    }
    Some(RayHit2::new(t, ray.point_at(t), normal))
}

/// Ray meets the outline of a convex polygon
pub fn ray_poly(ray: &Ray2, poly: &[Vec2]) -> bool {
    ray_poly_impl::<false>(ray, poly).is_some()
}

/// Nearest point where the ray crosses the polygon outline
pub fn ray_poly_hit(ray: &Ray2, poly: &[Vec2]) -> Option<RayHit2> {
    ray_poly_impl::<true>(ray, poly)
}

fn ray_poly_impl<const DETAIL: bool>(ray: &Ray2, poly: &[Vec2]) -> Option<RayHit2> {
    let mut best: Option<(f32, usize)> = None;

    for i in 0..poly.len() {
        let (a, b) = edge(poly, i);
        let e = b - a;
        let det = cross2(&ray.direction, &e);
        if det.abs() < linear::PARALLEL_DET {
            continue;
        }
        let offset = a - ray.origin;
        let t = cross2(&offset, &e) / det;
        let s = cross2(&offset, &ray.direction) / det;
        if t >= 0.0 && (0.0..=1.0).contains(&s) && best.map_or(true, |(bt, _)| t < bt) {
            best = Some((t, i));
        }
    }

    let (t, index) = best?;
    if !DETAIL {
        return Some(RayHit2::unresolved(t));
    }
    let normal = outward_normal(poly, index, winding(poly));
    Some(RayHit2::new(t, ray.point_at(t), normal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cross_line_line_parameter() {
        let t = cross_line_line(
            &Vec2::new(0.0, 0.0),
            &Vec2::new(4.0, 0.0),
            &Vec2::new(1.0, -1.0),
            &Vec2::new(1.0, 1.0),
        );
        assert_relative_eq!(t, 0.25);
    }

    #[test]
    fn test_parallel_lines_report_sentinel() {
        let t = cross_line_line(
            &Vec2::new(0.0, 0.0),
            &Vec2::new(1.0, 0.0),
            &Vec2::new(0.0, 1.0),
            &Vec2::new(2.0, 1.0),
        );
        assert_eq!(t, f32::NEG_INFINITY);
        let flat = cross_yline_line(3.0, &Vec2::new(0.0, 1.0), &Vec2::new(5.0, 1.0));
        assert_eq!(flat, f32::NEG_INFINITY);
    }

    #[test]
    fn test_segment_segment_bounds() {
        let hit = segment_segment(
            &Vec2::new(0.0, 0.0),
            &Vec2::new(2.0, 2.0),
            &Vec2::new(0.0, 2.0),
            &Vec2::new(2.0, 0.0),
        );
        assert_relative_eq!(hit.unwrap(), Vec2::new(1.0, 1.0));

        let miss = segment_segment(
            &Vec2::new(0.0, 0.0),
            &Vec2::new(0.4, 0.4),
            &Vec2::new(0.0, 2.0),
            &Vec2::new(2.0, 0.0),
        );
        assert!(miss.is_none());
    }

    #[test]
    fn test_cross_yline_line() {
        let t = cross_yline_line(0.5, &Vec2::new(0.0, 0.0), &Vec2::new(2.0, 2.0));
        assert_relative_eq!(t, 0.25);
    }

    #[test]
    fn test_cross_line_circle_two_one_and_tangent() {
        let circle = Circle::new(Vec2::zeros(), 1.0);

        let through = cross_line_circle(&Vec2::new(-2.0, 0.0), &Vec2::new(2.0, 0.0), &circle);
        assert_eq!(through.len(), 2);
        assert_relative_eq!(through.as_slice()[0].1, Vec2::new(-1.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(through.as_slice()[1].1, Vec2::new(1.0, 0.0), epsilon = 1e-6);

        let from_inside = cross_line_circle(&Vec2::zeros(), &Vec2::new(2.0, 0.0), &circle);
        assert_eq!(from_inside.len(), 1);
        assert_relative_eq!(from_inside.as_slice()[0].0, 0.5, epsilon = 1e-6);

        let grazing = cross_line_circle(&Vec2::new(-2.0, 1.0), &Vec2::new(2.0, 1.0), &circle);
        assert!(grazing.is_tangent());
        assert_eq!(grazing.len(), 1);
        assert_relative_eq!(grazing.as_slice()[0].1, Vec2::new(0.0, 1.0), epsilon = 1e-5);

        let clear = cross_line_circle(&Vec2::new(-2.0, 1.5), &Vec2::new(2.0, 1.5), &circle);
        assert!(clear.is_empty());
        assert!(!clear.is_tangent());
    }

    #[test]
    fn test_ray_circle_hit_outside_and_inside() {
        let circle = Circle::new(Vec2::new(5.0, 0.0), 1.0);
        let hit = ray_circle_hit(&Ray2::new(Vec2::zeros(), Vec2::x()), &circle).unwrap();
        assert_relative_eq!(hit.t, 4.0, epsilon = 1e-6);
        assert_relative_eq!(hit.normal, Vec2::new(-1.0, 0.0), epsilon = 1e-6);

        let inside = ray_circle_hit(&Ray2::new(Vec2::new(5.0, 0.0), Vec2::y()), &circle).unwrap();
        assert_relative_eq!(inside.point, Vec2::new(5.0, 1.0), epsilon = 1e-6);
        assert!(!ray_circle(&Ray2::new(Vec2::zeros(), -Vec2::x()), &circle));
    }

    #[test]
    fn test_ray_box_faces() {
        let bounds = BoundBox2::new(Vec2::new(1.0, -1.0), Vec2::new(3.0, 1.0));
        let hit = ray_box_hit(&Ray2::new(Vec2::zeros(), Vec2::x()), &bounds).unwrap();
        assert_relative_eq!(hit.t, 1.0);
        assert_relative_eq!(hit.normal, Vec2::new(-1.0, 0.0));

        let leaving = ray_box_hit(&Ray2::new(Vec2::new(2.0, 0.0), Vec2::y()), &bounds).unwrap();
        assert_relative_eq!(leaving.t, 1.0);
        assert_relative_eq!(leaving.normal, Vec2::new(0.0, 1.0));

        assert!(!ray_box(&Ray2::new(Vec2::new(0.0, 2.0), Vec2::x()), &bounds));
    }

    #[test]
    fn test_ray_poly_nearest_edge() {
        let diamond = [
            Vec2::new(2.0, 0.0),
            Vec2::new(3.0, 1.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(1.0, 1.0),
        ];
        let hit = ray_poly_hit(&Ray2::new(Vec2::new(0.0, 0.5), Vec2::x()), &diamond).unwrap();
        assert_relative_eq!(hit.t, 1.5, epsilon = 1e-6);
        let expected = Vec2::new(-1.0, -1.0).normalize();
        assert_relative_eq!(hit.normal, expected, epsilon = 1e-6);
        assert!(ray_poly(&Ray2::new(Vec2::new(0.0, 1.0), Vec2::x()), &diamond));
        assert!(!ray_poly(&Ray2::new(Vec2::new(0.0, 3.0), Vec2::x()), &diamond));
    }
}
