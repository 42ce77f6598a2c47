//! Shading normals: flat facets or vertex-normal interpolation.

use std::fmt;
use std::str::FromStr;

use relief_math::{Point3, Transform, Vec3};
use serde::{Deserialize, Serialize};

use super::grid::HeightGrid;
use super::triangulate::SmoothNormals;
use crate::geometry::face_forward;
use crate::DifferentialGeometry;

/// How a height field reports shading normals. Geometry is the same in both
/// modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadingMode {
    /// The hit triangle's face normal.
    #[default]
    Flat,
    /// Vertex-averaged normals blended across the hit triangle.
    Smooth,
}

impl fmt::Display for ShadingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flat => write!(f, "flat"),
            Self::Smooth => write!(f, "smooth"),
        }
    }
}

impl FromStr for ShadingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flat" => Ok(Self::Flat),
            "smooth" => Ok(Self::Smooth),
            other => Err(format!("unknown shading mode '{other}'")),
        }
    }
}

/// Shading strategy chosen once per shape. Only smooth shading pays for
/// the per-triangle and per-vertex tables.
#[derive(Debug, Clone)]
pub(crate) enum Shading {
    Flat,
    Smooth(SmoothNormals),
}

impl Shading {
    pub(crate) fn new(mode: ShadingMode, grid: &HeightGrid) -> Self {
        match mode {
            ShadingMode::Flat => Self::Flat,
            ShadingMode::Smooth => Self::Smooth(SmoothNormals::build(grid)),
        }
    }

    pub(crate) fn mode(&self) -> ShadingMode {
        match self {
            Self::Flat => ShadingMode::Flat,
            Self::Smooth(_) => ShadingMode::Smooth,
        }
    }

    pub(crate) fn smooth_normals(&self) -> Option<&SmoothNormals> {
        match self {
            Self::Flat => None,
            Self::Smooth(normals) => Some(normals),
        }
    }

    /// Shading record for the geometric record `dg`. Only `nn` may change.
    pub(crate) fn shading_geometry(
        &self,
        grid: &HeightGrid,
        object_to_world: &Transform,
        dg: &DifferentialGeometry,
    ) -> DifferentialGeometry {
        let Self::Smooth(normals) = self else {
            return *dg;
        };

        let tri = grid.locate(dg.u, dg.v);
        let corners = grid
            .triangle_points(tri)
            .map(|p| object_to_world.apply_point(&p));
        let weights = barycentric_weights(&dg.p, &corners);

        let blended = tri
            .vertices()
            .iter()
            .zip(weights)
            .fold(Vec3::zeros(), |acc, (&(row, col), w)| {
                acc + normals.vertex_normal(row, col) * w
            });

        let Some(n) = object_to_world.apply_normal(&blended).try_normalize(0.0) else {
            log::trace!("degenerate blended normal at ({}, {})", dg.u, dg.v);
            return *dg;
        };

        let mut shading = *dg;
        shading.nn = face_forward(n, &dg.nn);
        shading
    }
}

/// Barycentric weights of `p` with respect to triangle `tri`.
///
/// Each weight is the signed area of the sub-triangle opposite a vertex,
/// taken as the determinant `det[a, b, n]` of two edge vectors from `p` and
/// the face normal `n`, then divided by the sum. For `p` in the plane of the
/// triangle the weights reproduce `p` and sum to one; strictly inside they
/// are all positive.
pub fn barycentric_weights(p: &Point3, tri: &[Point3; 3]) -> [f64; 3] {
    let n = (tri[1] - tri[0]).cross(&(tri[2] - tri[0]));
    let det = |a: Vec3, b: Vec3| a.cross(&b).dot(&n);
    let to = tri.map(|v| v - p);
    let w = [det(to[1], to[2]), det(to[2], to[0]), det(to[0], to[1])];
    let sum = w[0] + w[1] + w[2];
    if sum == 0.0 {
        return [1.0 / 3.0; 3];
    }
    w.map(|x| x / sum)
}
