//! Contact probe
//!
//! Builds an icosphere skin and its Kd-tree, then cross-checks tree queries
//! against the linear scans and the analytic sphere:
//! - seeded rays: tree `first_hit` against `ray_skin_hit` and `ray_sphere_hit`
//! - a containment grid: tree parity against `point_skin` and `point_sphere`
//!
//! Usage: `contact_probe [config.toml|config.ron]`

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use rust_contact::config::Config;
use rust_contact::contact3d::{point_skin, point_sphere, ray_skin_hit, ray_sphere_hit};
use rust_contact::foundation::logging;
use rust_contact::foundation::math::Vec3;
use rust_contact::geometry::{Ray3, Skin, Sphere};
use rust_contact::spatial::{KdTreeConfig, SkinKdTree};

/// Largest tree/scan disagreement in `t` that still counts as a match
const HIT_TOLERANCE: f32 = 1e-4;

/// Probe settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct ProbeConfig {
    /// Tree build limits
    kd_tree: KdTreeConfig,
    /// Radius of the probed sphere
    sphere_radius: f32,
    /// Icosphere refinement level
    sphere_subdivisions: u32,
    /// Number of random rays
    ray_count: usize,
    /// Grid points per axis for the containment check
    grid_steps: usize,
    /// Random seed
    seed: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            kd_tree: KdTreeConfig::default(),
            sphere_radius: 1.0,
            sphere_subdivisions: 3,
            ray_count: 10_000,
            grid_steps: 24,
            seed: 0x5eed,
        }
    }
}

impl Config for ProbeConfig {}

#[derive(Debug, Default)]
struct RayReport {
    hits: usize,
    scan_mismatches: usize,
    max_sphere_error: f32,
    tree_time: Duration,
    scan_time: Duration,
}

#[derive(Debug, Default)]
struct GridReport {
    points: usize,
    inside: usize,
    skin_mismatches: usize,
    sphere_mismatches: usize,
}

fn fire_rays(config: &ProbeConfig, sphere: &Sphere, skin: &Skin, tree: &SkinKdTree) -> RayReport {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut report = RayReport::default();
    let r = config.sphere_radius;

    for _ in 0..config.ray_count {
        let toward = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        let origin = toward.try_normalize(1e-6).unwrap_or_else(Vec3::x) * (3.0 * r);
        let target = Vec3::new(
            rng.gen_range(-1.2..1.2),
            rng.gen_range(-1.2..1.2),
            rng.gen_range(-1.2..1.2),
        ) * r;
        let ray = Ray3::new(origin, target - origin);

        let start = Instant::now();
        let tree_hit = tree.first_hit(&ray);
        report.tree_time += start.elapsed();

        let start = Instant::now();
        let scan_hit = ray_skin_hit(&ray, skin);
        report.scan_time += start.elapsed();

        match (tree_hit, scan_hit) {
            (Some(a), Some(b)) if (a.hit.t - b.hit.t).abs() <= HIT_TOLERANCE => {}
            (None, None) => {}
            (a, b) => {
                report.scan_mismatches += 1;
                log::warn!("Tree and scan disagree on {:?}: {:?} vs {:?}", ray, a, b);
            }
        }

        if let Some(hit) = tree_hit {
            report.hits += 1;
            if let Some(exact) = ray_sphere_hit(&ray, sphere) {
                report.max_sphere_error = report.max_sphere_error.max((hit.hit.t - exact.t).abs());
            }
        }
    }

    report
}

fn check_grid(config: &ProbeConfig, sphere: &Sphere, skin: &Skin, tree: &SkinKdTree) -> GridReport {
    let mut report = GridReport::default();
    let steps = config.grid_steps.max(1);
    let span = 1.2 * config.sphere_radius;
    // Off-lattice jitter keeps grid points off facet planes
    let jitter = Vec3::new(0.0131, 0.0073, -0.0057) * config.sphere_radius;

    for i in 0..=steps {
        for j in 0..=steps {
            for k in 0..=steps {
                let f = Vec3::new(i as f32, j as f32, k as f32) / steps as f32;
                let p = Vec3::repeat(-span) + f * (2.0 * span) + jitter;

                let inside = tree.contains_point(&p);
                report.points += 1;
                report.inside += usize::from(inside);
                if inside != point_skin(&p, skin) {
                    report.skin_mismatches += 1;
                    log::debug!("Containment differs from the linear scan at {:?}", p);
                }
                // Facets sit inside the sphere, so only tree-inside points must be in the ball
                if inside && !point_sphere(&p, sphere) {
                    report.sphere_mismatches += 1;
                }
            }
        }
    }

    report
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_default("info");

    let config = match std::env::args().nth(1) {
        Some(path) => ProbeConfig::load_or_default(path)?,
        None => ProbeConfig::default(),
    };
    log::info!("Probe configuration: {:?}", config);

    let sphere = Sphere::new(Vec3::zeros(), config.sphere_radius);
    let skin = Skin::icosphere(sphere.center, sphere.radius, config.sphere_subdivisions);

    let start = Instant::now();
    let tree = SkinKdTree::build(&skin, &config.kd_tree);
    log::info!(
        "Kd-tree over {} triangles: {} nodes, {} leaves, {} slots, depth {} ({:?})",
        skin.triangle_count(),
        tree.nodes().len(),
        tree.leaf_count(),
        tree.triangles().len(),
        tree.depth(),
        start.elapsed()
    );

    let rays = fire_rays(&config, &sphere, &skin, &tree);
    log::info!(
        "Rays: {} fired, {} hit, {} tree/scan mismatches, max error vs sphere {:.5}",
        config.ray_count,
        rays.hits,
        rays.scan_mismatches,
        rays.max_sphere_error
    );
    log::info!(
        "Ray time: tree {:?}, linear scan {:?}",
        rays.tree_time,
        rays.scan_time
    );

    let grid = check_grid(&config, &sphere, &skin, &tree);
    log::info!(
        "Grid: {} points, {} inside, {} skin mismatches, {} outside the sphere",
        grid.points,
        grid.inside,
        grid.skin_mismatches,
        grid.sphere_mismatches
    );

    if rays.scan_mismatches > 0 || grid.skin_mismatches > 0 {
        log::warn!("Tree queries disagreed with the linear scans");
    }
    Ok(())
}
