//! Elevation grid storage and the fixed cell triangulation.

use relief_math::Point3;

use crate::{Aabb3, Result, ShapeError};

/// Distance in cell units within which a footprint coordinate counts as lying
/// on a grid line, so the cell across that line is also tested.
pub(crate) const CELL_EPS: f64 = 1e-10;

/// One grid quad, identified by its lower-left vertex `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Column of the lower-left vertex.
    pub x: usize,
    /// Row of the lower-left vertex.
    pub y: usize,
}

impl Cell {
    /// Create a cell reference.
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// The two triangles tiling this cell.
    pub fn triangles(self) -> [TriangleId; 2] {
        [
            TriangleId { cell: self, half: Half::Lower },
            TriangleId { cell: self, half: Half::Upper },
        ]
    }
}

/// Which side of the cell diagonal from `(x, y)` to `(x + 1, y + 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Half {
    /// Vertices `(y, x)`, `(y, x + 1)`, `(y + 1, x + 1)`.
    Lower,
    /// Vertices `(y, x)`, `(y + 1, x + 1)`, `(y + 1, x)`.
    Upper,
}

/// One of the two triangles of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriangleId {
    /// Owning cell.
    pub cell: Cell,
    /// Side of the diagonal.
    pub half: Half,
}

impl TriangleId {
    /// Grid vertices as `(row, col)` pairs, in winding order.
    ///
    /// Traversal, intersection and shading all resolve triangles through
    /// this one function.
    pub fn vertices(&self) -> [(usize, usize); 3] {
        let Cell { x, y } = self.cell;
        match self.half {
            Half::Lower => [(y, x), (y, x + 1), (y + 1, x + 1)],
            Half::Upper => [(y, x), (y + 1, x + 1), (y + 1, x)],
        }
    }
}

/// A regular grid of elevation samples over the unit square.
///
/// Vertex `(row, col)` sits at `(col * dx, row * dy, z[row * nx + col])` in
/// object space. Immutable after construction.
#[derive(Debug, Clone)]
pub struct HeightGrid {
    nx: usize,
    ny: usize,
    dx: f64,
    dy: f64,
    z: Vec<f64>,
    pt: Vec<Point3>,
    min_z: f64,
    max_z: f64,
    bbox: Aabb3,
}

impl HeightGrid {
    /// Build a grid from `nx * ny` row-major elevation samples.
    pub fn new(nx: usize, ny: usize, z: &[f64]) -> Result<Self> {
        if nx < 2 || ny < 2 {
            return Err(ShapeError::InvalidResolution {
                nx: nx as i64,
                ny: ny as i64,
            });
        }
        let Some(expected) = nx.checked_mul(ny) else {
            return Err(ShapeError::InvalidResolution {
                nx: i64::try_from(nx).unwrap_or(i64::MAX),
                ny: i64::try_from(ny).unwrap_or(i64::MAX),
            });
        };
        if z.len() != expected {
            return Err(ShapeError::SampleCountMismatch {
                expected,
                actual: z.len(),
            });
        }
        if let Some(index) = z.iter().position(|h| !h.is_finite()) {
            return Err(ShapeError::NonFiniteSample { index });
        }

        let dx = 1.0 / (nx - 1) as f64;
        let dy = 1.0 / (ny - 1) as f64;

        let mut pt = Vec::with_capacity(expected);
        for row in 0..ny {
            for col in 0..nx {
                pt.push(Point3::new(col as f64 * dx, row as f64 * dy, z[row * nx + col]));
            }
        }

        let (min_z, max_z) = z[1..]
            .iter()
            .fold((z[0], z[0]), |(lo, hi), &h| (lo.min(h), hi.max(h)));
        let bbox = Aabb3::new(Point3::new(0.0, 0.0, min_z), Point3::new(1.0, 1.0, max_z));

        Ok(Self {
            nx,
            ny,
            dx,
            dy,
            z: z.to_vec(),
            pt,
            min_z,
            max_z,
            bbox,
        })
    }

    /// Samples per row.
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Samples per column.
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Cell width in footprint units.
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Cell height in footprint units.
    pub fn dy(&self) -> f64 {
        self.dy
    }

    /// Lowest elevation.
    pub fn min_z(&self) -> f64 {
        self.min_z
    }

    /// Highest elevation.
    pub fn max_z(&self) -> f64 {
        self.max_z
    }

    /// Exact object-space bounds `[0,1] x [0,1] x [min_z, max_z]`.
    pub fn bounds(&self) -> Aabb3 {
        self.bbox
    }

    /// The elevation samples, row-major.
    pub fn elevations(&self) -> &[f64] {
        &self.z
    }

    /// Number of cells, `(nx - 1) * (ny - 1)`.
    pub fn cell_count(&self) -> usize {
        (self.nx - 1) * (self.ny - 1)
    }

    /// Row-major index of vertex `(row, col)`.
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.ny, "row {row} out of range 0..{}", self.ny);
        debug_assert!(col < self.nx, "col {col} out of range 0..{}", self.nx);
        row * self.nx + col
    }

    /// Elevation at vertex `(row, col)`.
    pub fn elevation(&self, row: usize, col: usize) -> f64 {
        self.z[self.index(row, col)]
    }

    /// Object-space position of vertex `(row, col)`.
    #[inline]
    pub fn point(&self, row: usize, col: usize) -> Point3 {
        self.pt[self.index(row, col)]
    }

    /// Object-space corners of a triangle.
    #[inline]
    pub fn triangle_points(&self, tri: TriangleId) -> [Point3; 3] {
        tri.vertices().map(|(row, col)| self.point(row, col))
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.ny - 1).flat_map(move |y| (0..self.nx - 1).map(move |x| Cell::new(x, y)))
    }

    /// Cell whose footprint contains `(x, y)`. Points on or beyond the far
    /// edge map to the last cell, points before the near edge to the first.
    pub fn cell_containing(&self, x: f64, y: f64) -> Cell {
        Cell::new(
            Self::cell_coord(x, self.nx),
            Self::cell_coord(y, self.ny),
        )
    }

    fn cell_coord(f: f64, n: usize) -> usize {
        let last = (n - 2) as f64;
        // NaN saturates to 0 in the cast.
        (f * (n - 1) as f64).floor().clamp(0.0, last) as usize
    }

    /// Columns and rows across a grid line from `cell` when `(x, y)` lies on
    /// one of its edges, within `CELL_EPS` cell units.
    ///
    /// `cell` is the cell `cell_containing(x, y)` returned. Boundary lines
    /// of the footprint have no cell across them.
    pub(crate) fn line_twins(&self, x: f64, y: f64, cell: Cell) -> (Option<usize>, Option<usize>) {
        (
            Self::twin_coord(x, self.nx, cell.x),
            Self::twin_coord(y, self.ny, cell.y),
        )
    }

    fn twin_coord(f: f64, n: usize, coord: usize) -> Option<usize> {
        let frac = f * (n - 1) as f64 - coord as f64;
        if frac.abs() < CELL_EPS {
            coord.checked_sub(1)
        } else if (frac - 1.0).abs() < CELL_EPS && coord + 2 < n {
            Some(coord + 1)
        } else {
            None
        }
    }

    /// Triangle containing footprint point `(u, v)`.
    pub fn locate(&self, u: f64, v: f64) -> TriangleId {
        let cell = self.cell_containing(u, v);
        let lu = u / self.dx - cell.x as f64;
        let lv = v / self.dy - cell.y as f64;
        let half = if lu <= lv { Half::Upper } else { Half::Lower };
        TriangleId { cell, half }
    }
}
