//! Front-to-back traversal of the cells under a ray.
//!
//! An incremental slab-stepping walk over the footprint grid. The x and y
//! axes step across cell boundaries; a third z axis tracks where the ray
//! leaves the elevation slab so the walk ends there instead of running on to
//! the footprint edge.

use super::grid::{Cell, HeightGrid};
use crate::Ray;

/// Axis to step for each comparison pattern
/// `(t_y < t_x) << 2 | (t_z < t_x) << 1 | (t_z < t_y)`.
///
/// Ties go to the lowest axis index (x before y before z). Patterns 2 and 5
/// are contradictory orderings that only NaN can produce; they end the walk.
const STEP_AXIS: [Option<usize>; 8] = [
    Some(0),
    Some(0),
    None,
    Some(2),
    Some(1),
    None,
    Some(1),
    Some(2),
];

fn next_axis(t_next: &[f64; 3]) -> Option<usize> {
    let pattern = (usize::from(t_next[1] < t_next[0]) << 2)
        | (usize::from(t_next[2] < t_next[0]) << 1)
        | usize::from(t_next[2] < t_next[1]);
    STEP_AXIS[pattern]
}

/// Per-axis stepping state.
#[derive(Debug, Clone, Copy)]
struct Axis {
    coord: i64,
    t_next: f64,
    t_step: f64,
    step: i64,
    boundary: i64,
}

impl Axis {
    /// Footprint axis with cell size `delta` and `cells` cells, starting in
    /// cell `coord`. A zero direction component never crosses a boundary.
    fn footprint(coord: usize, origin: f64, dir: f64, delta: f64, cells: usize) -> Self {
        let coord = coord as i64;
        if dir > 0.0 {
            Self {
                coord,
                t_next: ((coord + 1) as f64 * delta - origin) / dir,
                t_step: delta / dir,
                step: 1,
                boundary: cells as i64,
            }
        } else if dir < 0.0 {
            Self {
                coord,
                t_next: (coord as f64 * delta - origin) / dir,
                t_step: -delta / dir,
                step: -1,
                boundary: -1,
            }
        } else {
            Self {
                coord,
                t_next: f64::INFINITY,
                t_step: f64::INFINITY,
                step: 0,
                boundary: -1,
            }
        }
    }

    /// Elevation axis: a single step out through the top or bottom of the
    /// slab ends the walk.
    fn elevation(origin: f64, dir: f64, min_z: f64, max_z: f64) -> Self {
        let (t_next, step) = if dir > 0.0 {
            ((max_z - origin) / dir, 1)
        } else if dir < 0.0 {
            ((min_z - origin) / dir, -1)
        } else {
            (f64::INFINITY, 0)
        };
        Self {
            coord: 0,
            t_next,
            t_step: f64::INFINITY,
            step,
            boundary: step,
        }
    }
}

/// Walks the cells a ray crosses, nearest first.
///
/// The ray must already be in the grid's object space.
#[derive(Debug, Clone, Copy)]
pub struct GridRayMarcher<'a> {
    grid: &'a HeightGrid,
}

impl<'a> GridRayMarcher<'a> {
    /// Marcher over `grid`.
    pub fn new(grid: &'a HeightGrid) -> Self {
        Self { grid }
    }

    /// Call `visit` on each cell under the ray in front-to-back order and
    /// return the first `Some` it produces.
    ///
    /// Cells are visited in order of increasing ray parameter, so the first
    /// cell holding a hit holds the nearest one. The walk ends when the next
    /// boundary crossing lies past `ray.t_max`, or the ray leaves the grid
    /// footprint or the elevation slab.
    pub fn march<T>(&self, ray: &Ray, mut visit: impl FnMut(Cell) -> Option<T>) -> Option<T> {
        let grid = self.grid;
        let bounds = grid.bounds();

        let t_init = if bounds.inside(&ray.at(ray.t_min)) {
            ray.t_min
        } else {
            match bounds.intersect_ray(ray) {
                Some((t0, _)) => t0,
                None => {
                    log::trace!("ray misses height field bounds");
                    return None;
                }
            }
        };

        let entry = ray.at(t_init);
        let start = grid.cell_containing(entry.x, entry.y);
        let (mut twin_x, mut twin_y) = grid.line_twins(entry.x, entry.y, start);
        let mut axes = [
            Axis::footprint(start.x, ray.origin.x, ray.direction.x, grid.dx(), grid.nx() - 1),
            Axis::footprint(start.y, ray.origin.y, ray.direction.y, grid.dy(), grid.ny() - 1),
            Axis::elevation(ray.origin.z, ray.direction.z, grid.min_z(), grid.max_z()),
        ];

        loop {
            let cell = Cell::new(axes[0].coord as usize, axes[1].coord as usize);
            if let Some(found) = visit(cell) {
                return Some(found);
            }
            // On a shared grid line the cells across it touch the ray too.
            let twins = [
                twin_x.map(|x| Cell::new(x, cell.y)),
                twin_y.map(|y| Cell::new(cell.x, y)),
                twin_x.zip(twin_y).map(|(x, y)| Cell::new(x, y)),
            ];
            for twin in twins.into_iter().flatten() {
                if let Some(found) = visit(twin) {
                    return Some(found);
                }
            }
            // Only an axis the ray does not move along keeps it on the line.
            if ray.direction.x != 0.0 {
                twin_x = None;
            }
            if ray.direction.y != 0.0 {
                twin_y = None;
            }

            let t_next = [axes[0].t_next, axes[1].t_next, axes[2].t_next];
            let axis = &mut axes[next_axis(&t_next)?];
            if !(axis.t_next <= ray.t_max && axis.t_next.is_finite()) {
                return None;
            }
            axis.coord += axis.step;
            if axis.coord == axis.boundary {
                return None;
            }
            axis.t_next += axis.t_step;
        }
    }
}
