//! Per-triangle tangent frames and vertex-averaged normals.

use relief_math::{Point3, Vec3};

use super::grid::{Half, HeightGrid, TriangleId};

/// Face normal and flat tangent frame of one triangle, in object space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleFrame {
    /// Unit face normal (always has positive z).
    pub normal: Vec3,
    /// Surface derivative along x, treating the face as a height function.
    pub dpdu: Vec3,
    /// Surface derivative along y, treating the face as a height function.
    pub dpdv: Vec3,
}

impl TriangleFrame {
    /// Frame of the triangle `p`.
    ///
    /// With `n = (p1 - p0) x (p2 - p0)` the face is the graph of
    /// `z = c - (n.x x + n.y y) / n.z`, giving `dpdu = (1, 0, -n.x/n.z)` and
    /// `dpdv = (0, 1, -n.y/n.z)`. Grid triangles always project onto the
    /// footprint with nonzero area, so `n.z > 0`.
    pub fn from_points(p: &[Point3; 3]) -> Self {
        let n = (p[1] - p[0]).cross(&(p[2] - p[0]));
        let z_inv = 1.0 / n.z;
        Self {
            normal: n.normalize(),
            dpdu: Vec3::new(1.0, 0.0, -n.x * z_inv),
            dpdv: Vec3::new(0.0, 1.0, -n.y * z_inv),
        }
    }
}

/// Precomputed data for smooth shading: a frame for every triangle and an
/// averaged normal for every grid vertex.
#[derive(Debug, Clone)]
pub struct SmoothNormals {
    cells_per_row: usize,
    frames: Vec<TriangleFrame>,
    vertex_normals: Vec<Vec3>,
}

impl SmoothNormals {
    /// Triangulate every cell and average incident face normals per vertex.
    ///
    /// The average is the plain mean of the unit face normals of the
    /// incident triangles (up to six for interior vertices). It is left
    /// unnormalized; interpolation normalizes the blend.
    pub fn build(grid: &HeightGrid) -> Self {
        let cells_per_row = grid.nx() - 1;
        let mut frames = Vec::with_capacity(grid.cell_count() * 2);
        let mut sums = vec![Vec3::zeros(); grid.nx() * grid.ny()];
        let mut counts = vec![0u32; grid.nx() * grid.ny()];

        for cell in grid.cells() {
            for tri in cell.triangles() {
                let frame = TriangleFrame::from_points(&grid.triangle_points(tri));
                for (row, col) in tri.vertices() {
                    let i = grid.index(row, col);
                    sums[i] += frame.normal;
                    counts[i] += 1;
                }
                frames.push(frame);
            }
        }

        let vertex_normals = sums
            .into_iter()
            .zip(counts)
            .map(|(sum, count)| sum / f64::from(count))
            .collect();

        log::debug!(
            "precomputed {} triangle frames and {} vertex normals",
            frames.len(),
            grid.nx() * grid.ny()
        );

        Self {
            cells_per_row,
            frames,
            vertex_normals,
        }
    }

    /// Precomputed frame of a triangle.
    pub fn frame(&self, tri: TriangleId) -> &TriangleFrame {
        let cell = tri.cell.y * self.cells_per_row + tri.cell.x;
        let half = match tri.half {
            Half::Lower => 0,
            Half::Upper => 1,
        };
        &self.frames[cell * 2 + half]
    }

    /// Averaged normal at grid vertex `(row, col)`.
    pub fn vertex_normal(&self, row: usize, col: usize) -> Vec3 {
        self.vertex_normals[row * (self.cells_per_row + 1) + col]
    }
}
