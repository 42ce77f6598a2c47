//! Ray tests against the two triangles of a grid cell.

use relief_math::Point3;

use super::grid::{Cell, HeightGrid, TriangleId};
use crate::Ray;

/// Nearest triangle hit inside one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    /// Ray parameter of the hit.
    pub t: f64,
    /// Triangle that was hit.
    pub triangle: TriangleId,
}

/// Barycentric ray/triangle test.
///
/// Returns the hit parameter when the ray crosses the triangle inside
/// `[ray.t_min, ray.t_max]`. A ray parallel to the triangle's plane (zero
/// divisor) is a miss, as is any test that produces NaN.
pub fn intersect_triangle(ray: &Ray, p: &[Point3; 3]) -> Option<f64> {
    let e1 = p[1] - p[0];
    let e2 = p[2] - p[0];
    let s1 = ray.direction.cross(&e2);
    let divisor = s1.dot(&e1);
    if divisor == 0.0 {
        return None;
    }
    let inv_divisor = 1.0 / divisor;

    // First barycentric coordinate.
    let s = ray.origin - p[0];
    let b1 = s.dot(&s1) * inv_divisor;
    if !(0.0..=1.0).contains(&b1) {
        return None;
    }

    // Second barycentric coordinate.
    let s2 = s.cross(&e1);
    let b2 = ray.direction.dot(&s2) * inv_divisor;
    if !(b2 >= 0.0 && b1 + b2 <= 1.0) {
        return None;
    }

    let t = e2.dot(&s2) * inv_divisor;
    (ray.t_min..=ray.t_max).contains(&t).then_some(t)
}

/// Nearest hit among the cell's triangles. Uses the literal vertex
/// positions, so the result never depends on the shading mode.
pub(crate) fn intersect_cell(grid: &HeightGrid, ray: &Ray, cell: Cell) -> Option<TriangleHit> {
    cell.triangles()
        .into_iter()
        .filter_map(|triangle| {
            intersect_triangle(ray, &grid.triangle_points(triangle)).map(|t| TriangleHit { t, triangle })
        })
        .min_by(|a, b| a.t.total_cmp(&b.t))
}

/// Whether the ray hits either triangle of the cell.
pub(crate) fn cell_occludes(grid: &HeightGrid, ray: &Ray, cell: Cell) -> bool {
    cell.triangles()
        .into_iter()
        .any(|triangle| intersect_triangle(ray, &grid.triangle_points(triangle)).is_some())
}
