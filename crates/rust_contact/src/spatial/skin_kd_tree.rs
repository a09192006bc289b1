//! Kd-tree over the triangles of a skin
//!
//! Nodes are split breadth-first on the longest axis of their box, at its
//! center. A triangle whose box touches both halves goes to both children, so
//! after compaction the same triangle can occupy several slots of the tree's
//! buffer; [`SkinKdTree::source_index`] maps a slot back to the skin.
//!
//! Node and slot indices are limited to 15 bits so that every node packs into
//! a [`PackedKdNode`].

use std::collections::VecDeque;
use std::ops::{ControlFlow, Range};

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::contact3d::{box_box, ray_tri_hit, SkinHit};
use crate::foundation::math::Vec3;
use crate::geometry::{BoundBox3, Ray3, Skin, Triangle};

/// Most triangles a tree can index, counting duplicates
pub const KD_MAX_TRIANGLES: usize = (1 << 15) - 1;

/// Most nodes a tree can hold
pub const KD_MAX_NODES: usize = 1 << 15;

/// Hard limit on tree depth, and the size of the ray traversal stack
pub const KD_MAX_DEPTH: usize = 32;

/// Relative padding of the box rays are clipped against, so that faces lying
/// on the root box are strictly inside the traversal interval
const ROOT_MARGIN: f32 = 1e-4;

/// Slack on leaf intervals when looking for the nearest hit
const LEAF_SLACK: f32 = 1e-5;

/// Skewed direction for parity tests, unlikely to graze edges of
/// axis-aligned geometry
const PARITY_DIRECTION: [f32; 3] = [1.0, 0.3183, 0.1415];

/// Build limits for a [`SkinKdTree`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdTreeConfig {
    /// Maximum subdivision depth, clamped to [`KD_MAX_DEPTH`]
    pub max_depth: u32,

    /// A split is kept only if neither child receives more than this share
    /// of the parent's triangles
    pub max_child_share: f32,

    /// Nodes with fewer triangles stay leaves
    pub min_split_triangles: usize,
}

impl Default for KdTreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 16,
            max_child_share: 0.75,
            min_split_triangles: 4,
        }
    }
}

impl Config for KdTreeConfig {}

impl KdTreeConfig {
    /// Depth limit actually used by the builder
    pub fn effective_max_depth(&self) -> u32 {
        if self.max_depth as usize > KD_MAX_DEPTH {
            log::warn!(
                "Kd-tree max_depth {} exceeds the limit, clamping to {}",
                self.max_depth,
                KD_MAX_DEPTH
            );
            KD_MAX_DEPTH as u32
        } else {
            self.max_depth
        }
    }
}

/// A node of the tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KdNode {
    /// Splits its box at `split` along `axis`; `left` holds the lower half
    Interior {
        /// 0, 1 or 2
        axis: u8,
        /// Node index of the lower child
        left: u32,
        /// Node index of the upper child
        right: u32,
        /// Split coordinate
        split: f32,
    },
    /// Triangle slots `start..end` of the tree's buffer
    Leaf {
        /// First slot
        start: u32,
        /// One past the last slot
        end: u32,
    },
}

impl KdNode {
    /// Pack into the 15/15/2 bit layout
    pub fn pack(&self) -> PackedKdNode {
        match *self {
            KdNode::Interior {
                axis,
                left,
                right,
                split,
            } => {
                debug_assert!(axis < 3);
                debug_assert!((left as usize) < KD_MAX_NODES && (right as usize) < KD_MAX_NODES);
                PackedKdNode {
                    flags: (left << 17) | (right << 2) | (u32::from(axis) + 1),
                    split,
                }
            }
            KdNode::Leaf { start, end } => {
                debug_assert!(start <= end && end as usize <= KD_MAX_TRIANGLES);
                PackedKdNode {
                    flags: (start << 17) | (end << 2),
                    split: 0.0,
                }
            }
        }
    }

    /// True for leaves
    pub fn is_leaf(&self) -> bool {
        matches!(self, KdNode::Leaf { .. })
    }
}

/// A node packed into eight bytes
///
/// `flags` holds the left child (or first slot) in bits 17..32, the right
/// child (or end slot) in bits 2..17 and `axis + 1` in bits 0..2. Zero in
/// the low two bits marks a leaf.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PackedKdNode {
    /// Packed indices and axis
    pub flags: u32,
    /// Split coordinate, zero for leaves
    pub split: f32,
}

impl PackedKdNode {
    /// True for leaves
    pub fn is_leaf(&self) -> bool {
        self.flags & 0b11 == 0
    }

    /// Expand back into a [`KdNode`]
    pub fn unpack(&self) -> KdNode {
        let high = self.flags >> 17;
        let low = (self.flags >> 2) & 0x7fff;
        match self.flags & 0b11 {
            0 => KdNode::Leaf {
                start: high,
                end: low,
            },
            tag => KdNode::Interior {
                axis: (tag - 1) as u8,
                left: high,
                right: low,
                split: self.split,
            },
        }
    }
}

/// Kd-tree over a skin's triangles
///
/// Immutable once built; rebuild when the skin changes.
#[derive(Debug, Clone)]
pub struct SkinKdTree {
    bounds: BoundBox3,
    nodes: Vec<KdNode>,
    triangles: Vec<Triangle>,
    source_indices: Vec<u32>,
    depth: u32,
}

/// Node waiting to be split or turned into a leaf
struct PendingNode {
    node: usize,
    bounds: BoundBox3,
    depth: u32,
    triangles: Vec<u32>,
}

/// An accepted split of a pending node
struct Split {
    axis: usize,
    split: f32,
    below: (BoundBox3, Vec<u32>),
    above: (BoundBox3, Vec<u32>),
}

impl SkinKdTree {
    /// Build the tree for a skin
    ///
    /// # Panics
    ///
    /// If the skin has more than [`KD_MAX_TRIANGLES`] triangles, or the
    /// duplicated leaf buffer would, or the tree would need more than
    /// [`KD_MAX_NODES`] nodes.
    pub fn build(skin: &Skin, config: &KdTreeConfig) -> Self {
        let count = skin.triangle_count();
        assert!(
            count <= KD_MAX_TRIANGLES,
            "skin has {count} triangles, a Kd-tree indexes at most {KD_MAX_TRIANGLES}"
        );

        let max_depth = config.effective_max_depth();
        let boxes: Vec<BoundBox3> = skin.triangles().map(|tri| tri.bound_box()).collect();
        let bounds = boxes.iter().fold(BoundBox3::empty(), |acc, b| acc + *b);

        let mut nodes = vec![KdNode::Leaf { start: 0, end: 0 }];
        let mut leaves: Vec<(usize, Vec<u32>)> = Vec::new();
        let mut pending = VecDeque::from([PendingNode {
            node: 0,
            bounds,
            depth: 0,
            triangles: (0..count as u32).collect(),
        }]);
        let mut depth = 0;

        while let Some(item) = pending.pop_front() {
            depth = depth.max(item.depth);
            let Some(split) = try_split(&item, &boxes, config, max_depth) else {
                leaves.push((item.node, item.triangles));
                continue;
            };

            let left = nodes.len();
            assert!(
                left + 2 <= KD_MAX_NODES,
                "Kd-tree needs more than {KD_MAX_NODES} nodes"
            );
            nodes.push(KdNode::Leaf { start: 0, end: 0 });
            nodes.push(KdNode::Leaf { start: 0, end: 0 });
            nodes[item.node] = KdNode::Interior {
                axis: split.axis as u8,
                left: left as u32,
                right: left as u32 + 1,
                split: split.split,
            };

            let children = [(left, split.below), (left + 1, split.above)];
            for (node, (child_bounds, child_triangles)) in children {
                pending.push_back(PendingNode {
                    node,
                    bounds: child_bounds,
                    depth: item.depth + 1,
                    triangles: child_triangles,
                });
            }
        }

        // Compact leaves into one buffer, duplicating shared triangles
        let slots: usize = leaves.iter().map(|(_, tris)| tris.len()).sum();
        assert!(
            slots <= KD_MAX_TRIANGLES,
            "Kd-tree leaves hold {slots} triangles after duplication, \
             at most {KD_MAX_TRIANGLES} fit"
        );
        let mut triangles = Vec::with_capacity(slots);
        let mut source_indices = Vec::with_capacity(slots);
        for (node, leaf_triangles) in leaves {
            let start = triangles.len() as u32;
            for index in leaf_triangles {
                triangles.push(skin.triangle(index as usize));
                source_indices.push(index);
            }
            nodes[node] = KdNode::Leaf {
                start,
                end: triangles.len() as u32,
            };
        }

        let tree = Self {
            bounds,
            nodes,
            triangles,
            source_indices,
            depth,
        };
        log::debug!(
            "Built Kd-tree: {} triangles in {} slots, {} nodes, {} leaves, depth {}",
            count,
            tree.triangles.len(),
            tree.nodes.len(),
            tree.leaf_count(),
            tree.depth
        );
        tree
    }

    /// Union of all triangle boxes
    pub fn bounds(&self) -> &BoundBox3 {
        &self.bounds
    }

    /// Nodes in breadth-first order; the root is node 0
    pub fn nodes(&self) -> &[KdNode] {
        &self.nodes
    }

    /// The leaf buffer, shared triangles duplicated
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Skin triangle index stored in a buffer slot
    pub fn source_index(&self, slot: usize) -> usize {
        self.source_indices[slot] as usize
    }

    /// Number of leaves
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Depth of the deepest leaf
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Nodes in the packed layout
    pub fn packed_nodes(&self) -> Vec<PackedKdNode> {
        self.nodes.iter().map(KdNode::pack).collect()
    }

    /// Buffer slots of the leaf holding a point
    ///
    /// Points on a split plane go to the upper child. `None` outside the
    /// root box.
    pub fn leaf_at(&self, p: &Vec3) -> Option<Range<usize>> {
        if !self.bounds.contains_point(p) {
            return None;
        }
        let mut node = 0;
        loop {
            match self.nodes[node] {
                KdNode::Interior {
                    axis,
                    left,
                    right,
                    split,
                } => {
                    let next = if p[axis as usize] < split { left } else { right };
                    node = next as usize;
                }
                KdNode::Leaf { start, end } => return Some(start as usize..end as usize),
            }
        }
    }

    /// Run `pred` over the triangles of the leaf holding `p`, stopping at the
    /// first `true`
    pub fn query_point<F>(&self, p: &Vec3, mut pred: F) -> bool
    where
        F: FnMut(&Triangle) -> bool,
    {
        self.leaf_at(p)
            .is_some_and(|range| self.triangles[range].iter().any(|tri| pred(tri)))
    }

    /// Visit the leaves a ray passes through, nearest first
    ///
    /// `visit` gets the leaf's triangles and the `[enter, exit]` interval of
    /// the ray inside the leaf, clipped to `[0, max_t]`. Intervals of
    /// consecutive leaves share their end points. Returns true if `visit`
    /// broke out early.
    pub fn trace_ray<F>(&self, ray: &Ray3, max_t: f32, mut visit: F) -> bool
    where
        F: FnMut(&[Triangle], f32, f32) -> ControlFlow<()>,
    {
        self.traverse(ray, max_t, |range, enter, exit| {
            visit(&self.triangles[range], enter, exit)
        })
    }

    /// Nearest triangle hit along a ray
    pub fn first_hit(&self, ray: &Ray3) -> Option<SkinHit> {
        let mut best: Option<SkinHit> = None;
        self.traverse(ray, f32::INFINITY, |range, enter, exit| {
            let slack = LEAF_SLACK * (1.0 + exit.abs());
            for slot in range {
                let Some(hit) = ray_tri_hit(ray, &self.triangles[slot]) else {
                    continue;
                };
                if hit.t < enter - slack || hit.t > exit + slack {
                    continue;
                }
                if best.map_or(true, |b| hit.t < b.hit.t) {
                    best = Some(SkinHit {
                        hit,
                        triangle: self.source_index(slot),
                    });
                }
            }
            if best.is_some() {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        best
    }

    /// Number of surface crossings along a ray
    ///
    /// A hit only counts in the leaf whose interval holds it, so duplicated
    /// triangles are counted once.
    pub fn count_hits(&self, ray: &Ray3) -> usize {
        let mut hits = 0;
        self.traverse(ray, f32::INFINITY, |range, enter, exit| {
            hits += self.triangles[range]
                .iter()
                .filter_map(|tri| tri.intersect_ray(ray))
                .filter(|(t, _, _)| *t >= enter && *t < exit)
                .count();
            ControlFlow::Continue(())
        });
        hits
    }

    /// Point enclosed by the skin, by crossing parity
    ///
    /// Works for any closed skin, convex or not. A ray through an edge or
    /// vertex can miscount.
    pub fn contains_point(&self, p: &Vec3) -> bool {
        if !self.bounds.contains_point(p) {
            return false;
        }
        let ray = Ray3::new(*p, Vec3::from(PARITY_DIRECTION));
        self.count_hits(&ray) % 2 == 1
    }

    fn traverse<F>(&self, ray: &Ray3, max_t: f32, mut visit: F) -> bool
    where
        F: FnMut(Range<usize>, f32, f32) -> ControlFlow<()>,
    {
        if self.triangles.is_empty() {
            return false;
        }
        let pad = ROOT_MARGIN * self.bounds.size().max().max(1e-3);
        let clip_box = BoundBox3::new(
            self.bounds.min.add_scalar(-pad),
            self.bounds.max.add_scalar(pad),
        );
        let Some((enter, exit)) = clip_box.clip_ray(&ray.origin, &ray.direction) else {
            return false;
        };

        let mut t_min = enter.max(0.0);
        let mut t_max = exit.min(max_t);
        if t_min > t_max {
            return false;
        }

        let inv_dir = ray.direction.map(|d| 1.0 / d);
        let mut stack = [(0u32, 0.0f32, 0.0f32); KD_MAX_DEPTH];
        let mut top = 0;
        let mut node = 0u32;

        loop {
            match self.nodes[node as usize] {
                KdNode::Interior {
                    axis,
                    left,
                    right,
                    split,
                } => {
                    let axis = axis as usize;
                    let origin = ray.origin[axis];
                    let dir = ray.direction[axis];
                    let below_first = origin < split || (origin == split && dir <= 0.0);
                    let (near, far) = if below_first { (left, right) } else { (right, left) };

                    if dir == 0.0 {
                        node = near;
                        continue;
                    }

                    let t_split = (split - origin) * inv_dir[axis];
                    if t_split > t_max || t_split <= 0.0 {
                        node = near;
                    } else if t_split < t_min {
                        node = far;
                    } else {
                        stack[top] = (far, t_split, t_max);
                        top += 1;
                        node = near;
                        t_max = t_split;
                    }
                }
                KdNode::Leaf { start, end } => {
                    if visit(start as usize..end as usize, t_min, t_max).is_break() {
                        return true;
                    }
                    if top == 0 {
                        return false;
                    }
                    top -= 1;
                    (node, t_min, t_max) = stack[top];
                }
            }
        }
    }
}

fn try_split(
    item: &PendingNode,
    boxes: &[BoundBox3],
    config: &KdTreeConfig,
    max_depth: u32,
) -> Option<Split> {
    let count = item.triangles.len();
    if item.depth >= max_depth || count < config.min_split_triangles {
        return None;
    }

    let axis = item.bounds.longest_axis();
    if item.bounds.size()[axis] <= 0.0 {
        return None;
    }
    let split = item.bounds.center()[axis];
    let (below_box, above_box) = item.bounds.split(axis, split);

    let children = |half: &BoundBox3| -> Vec<u32> {
        item.triangles
            .iter()
            .copied()
            .filter(|&i| box_box(&boxes[i as usize], half))
            .collect()
    };
    let below = children(&below_box);
    let above = children(&above_box);

    let limit = config.max_child_share * count as f32;
    let accepted = below.len() as f32 <= limit && above.len() as f32 <= limit;
    log::trace!(
        "Kd-tree depth {}: {} triangles on axis {} at {:.4} -> {} + {} ({})",
        item.depth,
        count,
        axis,
        split,
        below.len(),
        above.len(),
        if accepted { "split" } else { "leaf" }
    );

    accepted.then_some(Split {
        axis,
        split,
        below: (below_box, below),
        above: (above_box, above),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;
    use crate::contact3d::{point_skin, ray_skin_hit};
    use crate::geometry::Sphere;
    use approx::assert_relative_eq;

    fn test_bounds() -> BoundBox3 {
        BoundBox3::new(Vec3::new(-1.0, -0.8, -1.2), Vec3::new(1.1, 0.9, 1.0))
    }

    fn lattice(bounds: &BoundBox3, steps: usize) -> Vec<Vec3> {
        let lo = bounds.min - Vec3::repeat(0.3);
        let size = bounds.size() + Vec3::repeat(0.6);
        let mut points = Vec::new();
        for i in 0..=steps {
            for j in 0..=steps {
                for k in 0..=steps {
                    let f = Vec3::new(i as f32, j as f32, k as f32) / steps as f32;
                    points.push(lo + size.component_mul(&f) + Vec3::new(0.017, 0.011, -0.009));
                }
            }
        }
        points
    }

    /// Small xorshift generator for repeatable ray sets
    struct XorShift(u32);

    impl XorShift {
        fn next(&mut self) -> f32 {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 17;
            self.0 ^= self.0 << 5;
            (self.0 as f32 / u32::MAX as f32) * 2.0 - 1.0
        }

        fn vec3(&mut self) -> Vec3 {
            Vec3::new(self.next(), self.next(), self.next())
        }
    }

    #[test]
    fn test_tree_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SkinKdTree>();
    }

    #[test]
    fn test_small_cube_stays_one_leaf() {
        let bounds = test_bounds();
        let skin = Skin::box_grid(&bounds, 1);
        let tree = SkinKdTree::build(&skin, &KdTreeConfig::default());

        assert_eq!(tree.nodes(), &[KdNode::Leaf { start: 0, end: 12 }]);
        assert_eq!(tree.triangles().len(), 12);
        for p in lattice(&bounds, 6) {
            assert_eq!(tree.contains_point(&p), point_skin(&p, &skin), "{p:?}");
        }
    }

    #[test]
    fn test_containment_matches_linear_scan() {
        let bounds = test_bounds();
        let skin = Skin::box_grid(&bounds, 4);
        let tree = SkinKdTree::build(&skin, &KdTreeConfig::default());
        assert!(tree.nodes().len() > 1);
        assert!(tree.triangles().len() > skin.triangle_count());

        let mut points = lattice(&bounds, 9);
        // Points straddling every split plane
        for node in tree.nodes() {
            if let KdNode::Interior { axis, split, .. } = *node {
                for p in lattice(&bounds, 3) {
                    for offset in [-0.001, 0.001] {
                        let mut q = p;
                        q[axis as usize] = split + offset;
                        points.push(q);
                    }
                }
            }
        }

        for p in &points {
            assert_eq!(tree.contains_point(p), point_skin(p, &skin), "{p:?}");
        }
    }

    #[test]
    fn test_leaf_holds_every_triangle_around_point() {
        let bounds = test_bounds();
        let skin = Skin::box_grid(&bounds, 4);
        let tree = SkinKdTree::build(&skin, &KdTreeConfig::default());

        for p in lattice(&bounds, 7) {
            let Some(range) = tree.leaf_at(&p) else {
                assert!(!bounds.contains_point(&p));
                continue;
            };
            let held: Vec<usize> = range.map(|slot| tree.source_index(slot)).collect();
            for (index, tri) in skin.triangles().enumerate() {
                if tri.bound_box().contains_point(&p) {
                    assert!(held.contains(&index), "triangle {index} missing around {p:?}");
                }
            }
        }
    }

    #[test]
    fn test_query_point_runs_on_leaf() {
        let skin = Skin::box_grid(&test_bounds(), 4);
        let tree = SkinKdTree::build(&skin, &KdTreeConfig::default());
        let p = Vec3::new(1.1, 0.1, 0.2);

        let mut visited = 0;
        assert!(!tree.query_point(&p, |_| {
            visited += 1;
            false
        }));
        assert_eq!(visited, tree.leaf_at(&p).map_or(0, |r| r.len()));
        assert!(tree.query_point(&p, |tri| tri.bound_box().contains_point(&p)));
        assert!(!tree.query_point(&Vec3::new(3.0, 0.0, 0.0), |_| true));
    }

    #[test]
    fn test_trace_ray_intervals_are_contiguous() {
        let skin = Skin::icosphere(Vec3::zeros(), 1.0, 2);
        let tree = SkinKdTree::build(&skin, &KdTreeConfig::default());
        let ray = Ray3::new(Vec3::new(-3.0, -0.7, -0.4), Vec3::new(1.0, 0.2, 0.15));

        let mut intervals = Vec::new();
        let broke = tree.trace_ray(&ray, f32::INFINITY, |_, enter, exit| {
            intervals.push((enter, exit));
            ControlFlow::Continue(())
        });
        assert!(!broke);
        assert!(intervals.len() > 1);
        for pair in intervals.windows(2) {
            assert!(pair[0].0 <= pair[0].1);
            assert_eq!(pair[0].1, pair[1].0);
        }

        let mut visits = 0;
        assert!(tree.trace_ray(&ray, f32::INFINITY, |_, _, _| {
            visits += 1;
            ControlFlow::Break(())
        }));
        assert_eq!(visits, 1);
    }

    #[test]
    fn test_sphere_hits_match_analytic_sphere() {
        let sphere = Sphere::new(Vec3::zeros(), 1.0);
        let skin = Skin::icosphere(sphere.center, sphere.radius, 2);
        let tree = SkinKdTree::build(&skin, &KdTreeConfig::default());

        let origin = Vec3::new(-3.0, -0.8, -0.35);
        let through_center = Ray3::new(origin, -origin);
        let hit = tree.first_hit(&through_center).unwrap();
        let (t, _, _) = sphere.intersect_ray(&through_center).unwrap();
        assert!(hit.hit.t > 0.0);
        assert_relative_eq!(hit.hit.t, t, epsilon = 0.05);
        assert_eq!(tree.count_hits(&through_center), 2);

        let from_center = Ray3::new(Vec3::zeros(), Vec3::new(0.3, -0.5, 0.8));
        assert_eq!(tree.count_hits(&from_center), 1);
        assert!(tree.contains_point(&Vec3::new(0.1, 0.2, -0.3)));
        assert!(!tree.contains_point(&Vec3::new(0.95, 0.95, 0.0)));
    }

    #[test]
    fn test_first_hit_matches_linear_scan() {
        let skin = Skin::icosphere(Vec3::new(0.2, -0.1, 0.3), 1.2, 2);
        let tree = SkinKdTree::build(&skin, &KdTreeConfig::default());
        let mut rng = XorShift(0x9e37_79b9);

        for _ in 0..200 {
            let origin = rng.vec3() * 4.0;
            let target = rng.vec3() * 1.5;
            let ray = Ray3::new(origin, target - origin);

            let tree_hit = tree.first_hit(&ray);
            let scan_hit = ray_skin_hit(&ray, &skin);
            assert_eq!(tree_hit.is_some(), scan_hit.is_some(), "{ray:?}");
            if let (Some(a), Some(b)) = (tree_hit, scan_hit) {
                assert_relative_eq!(a.hit.t, b.hit.t, epsilon = 1e-4);
                assert_relative_eq!(a.hit.point, b.hit.point, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn test_empty_skin() {
        let tree = SkinKdTree::build(&Skin::default(), &KdTreeConfig::default());
        assert_eq!(tree.leaf_count(), 1);
        assert!(!tree.contains_point(&Vec3::zeros()));
        assert!(tree.first_hit(&Ray3::new(Vec3::zeros(), Vec3::x())).is_none());
        assert!(tree.leaf_at(&Vec3::zeros()).is_none());
    }

    #[test]
    #[should_panic(expected = "a Kd-tree indexes at most")]
    fn test_too_many_triangles_panics() {
        let skin = Skin::new(vec![Vec3::zeros(); 3 * (KD_MAX_TRIANGLES + 1)]);
        SkinKdTree::build(&skin, &KdTreeConfig::default());
    }

    #[test]
    #[should_panic(expected = "after duplication")]
    fn test_duplication_overflow_panics() {
        // Nearly every split is accepted, so shared triangles pile up
        let skin = Skin::icosphere(Vec3::zeros(), 1.0, 5);
        let config = KdTreeConfig {
            max_child_share: 0.99,
            min_split_triangles: 1,
            ..KdTreeConfig::default()
        };
        SkinKdTree::build(&skin, &config);
    }

    #[test]
    #[should_panic(expected = "nodes")]
    fn test_node_overflow_panics() {
        // Every non-empty node splits down to the hard depth limit
        let skin = Skin::icosphere(Vec3::zeros(), 1.0, 2);
        let config = KdTreeConfig {
            max_depth: KD_MAX_DEPTH as u32,
            max_child_share: 1.0,
            min_split_triangles: 1,
        };
        SkinKdTree::build(&skin, &config);
    }

    #[test]
    fn test_depth_limit() {
        crate::foundation::logging::init();
        let skin = Skin::icosphere(Vec3::zeros(), 1.0, 3);
        let config = KdTreeConfig {
            max_depth: 2,
            ..KdTreeConfig::default()
        };
        let tree = SkinKdTree::build(&skin, &config);
        assert!(tree.depth() <= 2);
        assert!(tree.leaf_count() <= 4);
    }

    #[test]
    fn test_packed_layout() {
        let interior = KdNode::Interior {
            axis: 2,
            left: 1,
            right: 2,
            split: 0.5,
        };
        let packed = interior.pack();
        assert_eq!(packed.flags, (1 << 17) | (2 << 2) | 3);
        assert!(!packed.is_leaf());
        assert_eq!(packed.unpack(), interior);

        let leaf = KdNode::Leaf { start: 7, end: 32767 };
        assert!(leaf.pack().is_leaf());
        assert_eq!(leaf.pack().unpack(), leaf);
        assert_eq!(PackedKdNode::zeroed().unpack(), KdNode::Leaf { start: 0, end: 0 });

        let tree = SkinKdTree::build(&Skin::box_grid(&test_bounds(), 4), &KdTreeConfig::default());
        let packed = tree.packed_nodes();
        let bytes: &[u8] = bytemuck::cast_slice(&packed);
        assert_eq!(bytes.len(), 8 * tree.nodes().len());
        for (node, packed) in tree.nodes().iter().zip(&packed) {
            assert_eq!(packed.unpack(), *node);
        }
    }

    #[test]
    fn test_config_formats() {
        let toml =
            KdTreeConfig::from_str_with_format("max_depth = 8\n", ConfigFormat::Toml).unwrap();
        assert_eq!(toml.max_depth, 8);
        assert_relative_eq!(toml.max_child_share, 0.75);
        assert_eq!(toml.min_split_triangles, 4);

        let ron = KdTreeConfig::from_str_with_format("(max_depth: 40)", ConfigFormat::Ron).unwrap();
        assert_eq!(ron.effective_max_depth(), KD_MAX_DEPTH as u32);
        assert_eq!(KdTreeConfig::default().effective_max_depth(), 16);
    }
}
