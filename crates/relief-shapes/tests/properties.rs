//! Randomized checks of the height-field shape against brute force.

use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use relief_math::{Point3, Transform, Vec3};
use relief_shapes::heightfield::{barycentric_weights, intersect_triangle};
use relief_shapes::{Heightfield, Ray, ShadingMode, Shape};

const SEED: u64 = 0x5eed_f1e1d;

fn random_field(rng: &mut StdRng, mode: ShadingMode) -> Heightfield {
    let nx = rng.gen_range(2..9);
    let ny = rng.gen_range(2..9);
    let z: Vec<f64> = (0..nx * ny).map(|_| rng.gen_range(-1.0..1.0)).collect();
    Heightfield::new(Transform::identity(), false, nx, ny, &z, mode).unwrap()
}

fn random_ray(rng: &mut StdRng) -> Ray {
    let origin = Point3::new(
        rng.gen_range(-1.0..2.0),
        rng.gen_range(-1.0..2.0),
        rng.gen_range(-2.0..3.0),
    );
    // Aim at a point over the footprint so most rays cross the field.
    let target = Point3::new(
        rng.gen_range(-0.2..1.2),
        rng.gen_range(-0.2..1.2),
        rng.gen_range(-1.5..1.5),
    );
    Ray::new(origin, target - origin)
}

/// Nearest hit over every triangle of every cell.
fn brute_force(hf: &Heightfield, ray: &Ray) -> Option<f64> {
    let grid = hf.grid();
    grid.cells()
        .flat_map(|cell| cell.triangles())
        .filter_map(|tri| intersect_triangle(ray, &grid.triangle_points(tri)))
        .min_by(f64::total_cmp)
}

#[test]
fn marcher_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut hits = 0;
    for _ in 0..50 {
        let hf = random_field(&mut rng, ShadingMode::Flat);
        for _ in 0..200 {
            let ray = random_ray(&mut rng);
            let expected = brute_force(&hf, &ray);
            let found = hf.intersect(&ray).map(|hit| hit.t_hit);
            match (expected, found) {
                (Some(e), Some(f)) => {
                    assert_abs_diff_eq!(e, f, epsilon = 1e-9);
                    assert!(f >= ray.t_min && f <= ray.t_max);
                    hits += 1;
                }
                (None, None) => {}
                other => panic!("marcher and brute force disagree: {other:?} for {ray:?}"),
            }
        }
    }
    // The sample must actually exercise hits.
    assert!(hits > 1000, "only {hits} hits");
}

#[test]
fn bounded_rays_match_brute_force() {
    let mut rng = StdRng::seed_from_u64(SEED + 1);
    for _ in 0..30 {
        let hf = random_field(&mut rng, ShadingMode::Flat);
        for _ in 0..100 {
            let t_min = rng.gen_range(0.0..0.5);
            let t_max = t_min + rng.gen_range(0.0..1.5);
            let ray = random_ray(&mut rng).with_range(t_min, t_max);
            let expected = brute_force(&hf, &ray);
            let found = hf.intersect(&ray).map(|hit| hit.t_hit);
            assert_eq!(expected.is_some(), found.is_some(), "{ray:?}");
            if let (Some(e), Some(f)) = (expected, found) {
                assert_abs_diff_eq!(e, f, epsilon = 1e-9);
            }
        }
    }
}

/// A footprint coordinate on grid line `k`, or a hair to either side of it.
fn snapped(rng: &mut StdRng, n: usize, delta: f64) -> f64 {
    let k = rng.gen_range(0..n);
    let offset = [0.0, -1e-12, 1e-12][rng.gen_range(0..3)];
    k as f64 * delta + offset
}

fn assert_agrees_with_brute_force(hf: &Heightfield, ray: &Ray) -> bool {
    let expected = brute_force(hf, ray);
    let found = hf.intersect(ray).map(|hit| hit.t_hit);
    match (expected, found) {
        (Some(e), Some(f)) => assert_abs_diff_eq!(e, f, epsilon = 1e-9),
        (None, None) => {}
        other => panic!("marcher and brute force disagree: {other:?} for {ray:?}"),
    }
    assert_eq!(hf.intersect_p(ray), expected.is_some(), "{ray:?}");
    expected.is_some()
}

#[test]
fn vertical_rays_on_grid_lines_match_brute_force() {
    let mut rng = StdRng::seed_from_u64(SEED + 8);
    let mut hits = 0;
    for _ in 0..40 {
        let hf = random_field(&mut rng, ShadingMode::Flat);
        let (nx, ny, dx, dy) = {
            let g = hf.grid();
            (g.nx(), g.ny(), g.dx(), g.dy())
        };
        for _ in 0..100 {
            // Snap x, y or both onto lines.
            let (x, y) = match rng.gen_range(0..3) {
                0 => (snapped(&mut rng, nx, dx), rng.gen_range(0.0..1.0)),
                1 => (rng.gen_range(0.0..1.0), snapped(&mut rng, ny, dy)),
                _ => (snapped(&mut rng, nx, dx), snapped(&mut rng, ny, dy)),
            };
            let ray = Ray::new(Point3::new(x, y, 2.0), Vec3::new(0.0, 0.0, -1.0));
            if assert_agrees_with_brute_force(&hf, &ray) {
                hits += 1;
            }
        }
    }
    // Only snaps a hair outside [0, 1] miss.
    assert!(hits > 2500, "only {hits} hits");
}

#[test]
fn oblique_rays_through_grid_lines_match_brute_force() {
    let mut rng = StdRng::seed_from_u64(SEED + 9);
    let mut hits = 0;
    for _ in 0..40 {
        let hf = random_field(&mut rng, ShadingMode::Flat);
        let (nx, ny, dx, dy) = {
            let g = hf.grid();
            (g.nx(), g.ny(), g.dx(), g.dy())
        };
        for _ in 0..100 {
            // Pass through a point on a grid line inside the elevation slab.
            let through = Point3::new(snapped(&mut rng, nx, dx), rng.gen_range(0.0..1.0), rng.gen_range(-1.0..1.0));
            let mut dir = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..-0.1),
            );
            // Some rays run along the line itself.
            if rng.gen_bool(0.25) {
                dir.x = 0.0;
            }
            let start = through - dir * rng.gen_range(0.0..2.0);
            if assert_agrees_with_brute_force(&hf, &Ray::new(start, dir)) {
                hits += 1;
            }

            // The same with the roles of x and y swapped.
            let through = Point3::new(through.y, snapped(&mut rng, ny, dy), through.z);
            let dir = Vec3::new(dir.y, dir.x, dir.z);
            let start = through - dir * rng.gen_range(0.0..2.0);
            if assert_agrees_with_brute_force(&hf, &Ray::new(start, dir)) {
                hits += 1;
            }
        }
    }
    assert!(hits > 1000, "only {hits} hits");
}

#[test]
fn existence_test_agrees_with_full_test() {
    let mut rng = StdRng::seed_from_u64(SEED + 2);
    for _ in 0..30 {
        let hf = random_field(&mut rng, ShadingMode::Flat);
        for _ in 0..200 {
            let ray = random_ray(&mut rng);
            assert_eq!(hf.intersect_p(&ray), hf.intersect(&ray).is_some(), "{ray:?}");
        }
    }
}

#[test]
fn shading_mode_leaves_geometry_alone() {
    let mut rng = StdRng::seed_from_u64(SEED + 3);
    for _ in 0..20 {
        let seed = rng.gen();
        let flat = random_field(&mut StdRng::seed_from_u64(seed), ShadingMode::Flat);
        let smooth = random_field(&mut StdRng::seed_from_u64(seed), ShadingMode::Smooth);
        for _ in 0..100 {
            let ray = random_ray(&mut rng);
            match (flat.intersect(&ray), smooth.intersect(&ray)) {
                (Some(a), Some(b)) => {
                    assert_eq!(a.t_hit, b.t_hit);
                    assert_eq!(a.dg.p, b.dg.p);
                    assert_eq!(a.dg.nn, b.dg.nn);
                    let shaded = smooth.shading_geometry(&Transform::identity(), &b.dg);
                    assert_eq!(shaded.p, b.dg.p);
                    assert_eq!(shaded.dpdu, b.dg.dpdu);
                    assert_abs_diff_eq!(shaded.nn.norm(), 1.0, epsilon = 1e-12);
                    // Shading normals stay on the geometric side.
                    assert!(shaded.nn.dot(&b.dg.nn) >= 0.0);
                }
                (None, None) => {}
                other => panic!("shading mode changed hit/miss: {other:?}"),
            }
        }
    }
}

#[test]
fn object_bound_is_exact() {
    let mut rng = StdRng::seed_from_u64(SEED + 4);
    for _ in 0..50 {
        let hf = random_field(&mut rng, ShadingMode::Flat);
        let z = hf.grid().elevations();
        let lo = z.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = z.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let b = hf.object_bound();
        assert_eq!(b.min, Point3::new(0.0, 0.0, lo));
        assert_eq!(b.max, Point3::new(1.0, 1.0, hi));
    }
}

#[test]
fn rays_missing_the_bounds_miss_the_shape() {
    let mut rng = StdRng::seed_from_u64(SEED + 5);
    for _ in 0..20 {
        let hf = random_field(&mut rng, ShadingMode::Smooth);
        for _ in 0..100 {
            // Start beyond x = 1 and head further away.
            let origin = Point3::new(rng.gen_range(1.5..3.0), rng.gen_range(-1.0..2.0), rng.gen_range(-2.0..2.0));
            let dir = Vec3::new(rng.gen_range(0.1..1.0), rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
            let ray = Ray::new(origin, dir);
            assert!(hf.object_bound().intersect_ray(&ray).is_none());
            assert!(hf.intersect(&ray).is_none());
            assert!(!hf.intersect_p(&ray));
        }
    }
}

#[test]
fn barycentric_weights_inside_triangles() {
    let mut rng = StdRng::seed_from_u64(SEED + 6);
    for _ in 0..20 {
        let hf = random_field(&mut rng, ShadingMode::Flat);
        let grid = hf.grid();
        for cell in grid.cells() {
            for tri in cell.triangles() {
                let p = grid.triangle_points(tri);
                let a: f64 = rng.gen_range(0.05..0.9);
                let b: f64 = rng.gen_range(0.05..(0.95 - a).max(0.06));
                let c = 1.0 - a - b;
                let inside = Point3::from(p[0].coords * a + p[1].coords * b + p[2].coords * c);
                let w = barycentric_weights(&inside, &p);
                assert!(w.iter().all(|&x| x > 0.0), "{w:?}");
                assert_abs_diff_eq!(w.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
                assert_abs_diff_eq!(w[0], a, epsilon = 1e-9);
                assert_abs_diff_eq!(w[1], b, epsilon = 1e-9);
            }
        }
    }
}

#[test]
fn smooth_normal_converges_to_vertex_normal() {
    let mut rng = StdRng::seed_from_u64(SEED + 7);
    let hf = random_field(&mut rng, ShadingMode::Smooth);
    let grid = hf.grid();
    let normals = hf.smooth_normals().unwrap();
    let o2w = Transform::identity();
    for row in 0..grid.ny() - 1 {
        for col in 0..grid.nx() - 1 {
            // Just inside the upper triangle of the cell whose corner this is.
            let x = col as f64 * grid.dx() + 1e-8 * grid.dx();
            let y = row as f64 * grid.dy() + 2e-8 * grid.dy();
            let ray = Ray::new(Point3::new(x, y, 5.0), Vec3::new(0.0, 0.0, -1.0));
            let hit = hf.intersect(&ray).unwrap();
            let shaded = hf.shading_geometry(&o2w, &hit.dg);
            let expected = normals.vertex_normal(row, col).normalize();
            assert!((shaded.nn - expected).norm() < 1e-5, "vertex ({row}, {col})");
        }
    }
}
