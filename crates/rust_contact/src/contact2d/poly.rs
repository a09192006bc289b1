//! Convex polygon against convex polygon

use super::lines::line_params;
use crate::contact::tolerance::squared;
use crate::contact::{contact_pair, Contact2};
use crate::foundation::math::{cross2, perp, Vec2};
use crate::geometry::polygon::{
    self, area_centroid_from, barycenter, edge, inside_distance, nearest_edge, outward_normal,
    winding,
};
use crate::geometry::BoundBox2;

contact_pair! {
    /// Two convex polygons of any winding overlap
    ///
    /// The normal points from `a` toward `b`; swapping the arguments negates
    /// it. The contact point is the area centroid of the overlap and `penet`
    /// its extent along the normal.
    poly_poly, poly_poly_contact => poly_poly_impl(a: &[Vec2], b: &[Vec2]) -> Contact2
}

contact_pair! {
    /// Axis-aligned box against a convex polygon, through [`poly_poly`]
    box_poly, box_poly_contact => box_poly_impl(bounds: &BoundBox2, poly: &[Vec2]) -> Contact2
}

fn box_poly_impl<const DETAIL: bool>(bounds: &BoundBox2, poly: &[Vec2]) -> Option<Contact2> {
    poly_poly_impl::<DETAIL>(&bounds.corners(), poly)
}

/// Where an edge of `a` crosses the outline of `b`
#[derive(Debug, Clone, Copy)]
struct Crossing {
    /// Edge index of `a` plus the parameter along it; orders crossings along `a`
    order: f32,
    point: Vec2,
    /// `a` passes from outside `b` to inside here
    entering: bool,
}

fn crossings<'a>(a: &'a [Vec2], b: &'a [Vec2]) -> impl Iterator<Item = Crossing> + 'a {
    let wind_b = winding(b);
    (0..a.len()).flat_map(move |i| {
        let (a0, a1) = edge(a, i);
        (0..b.len()).filter_map(move |j| {
            let (b0, b1) = edge(b, j);
            let (t, s) = line_params(&a0, &a1, &b0, &b1)?;
            if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&s) {
                return None;
            }
            Some(Crossing {
                order: i as f32 + t,
                point: a0 + (a1 - a0) * t,
                entering: wind_b * cross2(&(b1 - b0), &(a1 - a0)) > 0.0,
            })
        })
    })
}

fn poly_poly_impl<const DETAIL: bool>(a: &[Vec2], b: &[Vec2]) -> Option<Contact2> {
    if a.len() < 3 || b.len() < 3 {
        return None;
    }

    if DETAIL {
        let mut found: Vec<Crossing> = crossings(a, b).collect();
        if !found.is_empty() {
            found.sort_by(|x, y| x.order.total_cmp(&y.order));
            return Some(crossing_contact(a, b, &found));
        }
    } else if crossings(a, b).next().is_some() {
        return Some(Contact2::unresolved());
    }

    containment_contact::<DETAIL>(a, b)
}

/// Contact of two outlines that cross; `found` is sorted along `a`
fn crossing_contact(a: &[Vec2], b: &[Vec2], found: &[Crossing]) -> Contact2 {
    let n = found.len();

    // Every stretch of `a` inside `b` runs from an entry to the exit right
    // after it; the chords of those stretches cut the overlap off `a`. With
    // the usual two crossings this is the single chord between them.
    let chords: Vec2 = (0..n)
        .filter(|&k| found[k].entering && !found[(k + 1) % n].entering)
        .map(|k| found[k].point - found[(k + 1) % n].point)
        .sum();

    let normal = perp(&chords)
        .try_normalize(squared::COINCIDENT)
        .map(|dir| dir * winding(a))
        .or_else(|| (barycenter(b) - barycenter(a)).try_normalize(squared::COINCIDENT))
        .or_else(|| nearest_edge_normal(a, b))
        .unwrap_or_else(Vec2::zeros);

    let mut region: Vec<Vec2> = a
        .iter()
        .filter(|p| polygon::contains(b, p))
        .chain(b.iter().filter(|p| polygon::contains(a, p)))
        .copied()
        .chain(found.iter().map(|c| c.point))
        .collect();

    let mean = barycenter(&region);
    region.sort_by(|p, q| {
        let ap = (p.y - mean.y).atan2(p.x - mean.x);
        let aq = (q.y - mean.y).atan2(q.x - mean.x);
        ap.total_cmp(&aq)
    });
    let chord_mid = found.iter().map(|c| c.point).sum::<Vec2>() / n as f32;
    let (_, pt) = area_centroid_from(&region, &chord_mid);

    let (lo, hi) = region.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
        let d = p.dot(&normal);
        (lo.min(d), hi.max(d))
    });

    Contact2::new(pt, normal, hi - lo)
}

/// Normal through the edge of `b` nearest the middle of `a`
///
/// Used when the crossings give no direction, as for coincident outlines
/// whose crossings all sit on shared vertices.
fn nearest_edge_normal(a: &[Vec2], b: &[Vec2]) -> Option<Vec2> {
    let wind = winding(b);
    let nearest = nearest_edge(b, wind, &barycenter(a));
    let outward = outward_normal(b, nearest.index, wind);
    (outward != Vec2::zeros()).then_some(-outward)
}

/// One outline entirely inside the other, or the two apart
fn containment_contact<const DETAIL: bool>(a: &[Vec2], b: &[Vec2]) -> Option<Contact2> {
    let a_inside = a.iter().any(|p| polygon::contains(b, p));
    let (inner, container) = if a_inside {
        (a, b)
    } else if b.iter().any(|p| polygon::contains(a, p)) {
        (b, a)
    } else {
        return None;
    };

    let center = barycenter(inner);
    if !polygon::contains(container, &center) {
        return None;
    }
    if !DETAIL {
        return Some(Contact2::unresolved());
    }

    let wind = winding(container);
    let nearest = nearest_edge(container, wind, &center);
    let outward = outward_normal(container, nearest.index, wind);
    let penet = inner
        .iter()
        .map(|p| inside_distance(container, nearest.index, wind, p))
        .fold(0.0_f32, f32::max);

    // `a` leaves through the container edge when inside, or lets `b` out
    // through its own edge otherwise
    let normal = if a_inside { -outward } else { outward };
    Some(Contact2::new(center, normal, penet))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(min: Vec2, max: Vec2) -> [Vec2; 4] {
        [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)]
    }

    #[test]
    fn test_poly_poly_side_overlap() {
        let a = square(Vec2::zeros(), Vec2::new(2.0, 2.0));
        let b = square(Vec2::new(1.0, 0.5), Vec2::new(3.0, 1.5));
        let c = poly_poly_contact(&a, &b).unwrap();
        assert_relative_eq!(c.normal, Vec2::new(1.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(c.pt, Vec2::new(1.5, 1.0), epsilon = 1e-5);
        assert_relative_eq!(c.penet, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_poly_poly_swap_negates_normal() {
        let a = [Vec2::new(0.0, 0.0), Vec2::new(3.0, 0.0), Vec2::new(0.0, 3.0)];
        let b_cw = [Vec2::new(1.0, 1.0), Vec2::new(1.0, 4.0), Vec2::new(4.0, 1.0)];
        let b_ccw = [Vec2::new(1.0, 1.0), Vec2::new(4.0, 1.0), Vec2::new(1.0, 4.0)];
        let a_cw = [a[0], a[2], a[1]];

        for (x, y) in [(&a[..], &b_cw[..]), (&a[..], &b_ccw[..]), (&a_cw[..], &b_ccw[..])] {
            let ab = poly_poly_contact(x, y).unwrap();
            let ba = poly_poly_contact(y, x).unwrap();
            assert_relative_eq!(ab.normal, -ba.normal, epsilon = 1e-6);
            assert_relative_eq!(ab.pt, ba.pt, epsilon = 1e-5);
            assert!(ab.normal.x > 0.0 && ab.normal.y > 0.0);
        }
    }

    #[test]
    fn test_small_triangle_inside_reports_barycenter() {
        let big = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0)];
        let small = [Vec2::new(1.0, 1.0), Vec2::new(2.0, 1.0), Vec2::new(1.0, 2.0)];
        let center = barycenter(&small);

        let c = poly_poly_contact(&small, &big).unwrap();
        assert_relative_eq!(c.pt, center);
        // Nearest container edge is y = 0 (x = 0 ties, bottom comes first)
        assert_relative_eq!(c.normal, Vec2::new(0.0, 1.0), epsilon = 1e-6);
        assert_relative_eq!(c.penet, 2.0, epsilon = 1e-6);

        let swapped = poly_poly_contact(&big, &small).unwrap();
        assert_relative_eq!(swapped.pt, center);
        assert_relative_eq!(swapped.normal, -c.normal, epsilon = 1e-6);
        assert!(poly_poly(&big, &small));
    }

    #[test]
    fn test_coincident_polygons_separate_through_an_edge() {
        let sq = square(Vec2::zeros(), Vec2::new(1.0, 1.0));
        let c = poly_poly_contact(&sq, &sq).unwrap();
        // All edges tie; the first one (y = 0) wins
        assert_relative_eq!(c.normal, Vec2::new(0.0, 1.0), epsilon = 1e-6);
        assert_relative_eq!(c.penet, 1.0, epsilon = 1e-5);
        assert_relative_eq!(c.pt, Vec2::new(0.5, 0.5), epsilon = 1e-5);

        let bounds = BoundBox2::new(Vec2::zeros(), Vec2::new(1.0, 1.0));
        let tile = box_poly_contact(&bounds, &bounds.corners()).unwrap();
        assert_relative_eq!(tile.normal.norm(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(tile.penet, 1.0, epsilon = 1e-5);
        assert!(box_poly(&bounds, &sq));
    }

    #[test]
    fn test_disjoint_polygons() {
        let a = square(Vec2::zeros(), Vec2::new(1.0, 1.0));
        let b = square(Vec2::new(2.0, 0.0), Vec2::new(3.0, 1.0));
        assert!(!poly_poly(&a, &b));
        assert!(poly_poly_contact(&b, &a).is_none());
    }

    #[test]
    fn test_box_poly_matches_poly_poly() {
        let bounds = BoundBox2::new(Vec2::zeros(), Vec2::new(2.0, 2.0));
        let tri = [Vec2::new(1.5, 1.0), Vec2::new(3.0, 0.0), Vec2::new(3.0, 2.0)];
        let via_box = box_poly_contact(&bounds, &tri).unwrap();
        let via_poly = poly_poly_contact(&bounds.corners(), &tri).unwrap();
        assert_relative_eq!(via_box, via_poly);
        assert!(via_box.normal.x > 0.0);
        let far = [Vec2::new(5.0, 5.0), Vec2::new(6.0, 5.0), Vec2::new(5.0, 6.0)];
        assert!(!box_poly(&bounds, &far));
    }
}
