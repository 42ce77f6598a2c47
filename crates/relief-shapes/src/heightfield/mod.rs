//! Height-field shape.
//!
//! A regular grid of elevation samples over the unit square, intersected
//! directly by marching the cells under a ray rather than by building a
//! triangle mesh.
//!
//! # Layout
//!
//! - [`grid`] - Elevation storage, cell and triangle addressing
//! - [`triangulate`] - Triangle frames and averaged vertex normals
//! - [`march`] - Front-to-back cell traversal
//! - [`cell`] - Ray tests against a cell's two triangles
//! - [`shading`] - Flat or interpolated shading normals

pub mod cell;
pub mod grid;
pub mod march;
pub mod shading;
pub mod triangulate;

use std::sync::Arc;

use relief_math::{Point3, Transform, Vec3};

use crate::{
    Aabb3, DifferentialGeometry, Intersection, ParamSet, Ray, Result, Shape, ShapeBase, ShapeError,
};

pub use cell::{intersect_triangle, TriangleHit};
pub use grid::{Cell, Half, HeightGrid, TriangleId};
pub use march::GridRayMarcher;
pub use shading::{barycentric_weights, ShadingMode};
pub use triangulate::{SmoothNormals, TriangleFrame};

use shading::Shading;

/// Offset scale for secondary rays spawned at a hit.
const RAY_EPSILON_SCALE: f64 = 1e-3;

/// Nearest hit found by the marcher, in object space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridHit {
    /// Ray parameter.
    pub t: f64,
    /// Object-space hit point.
    pub point: Point3,
    /// Triangle that was hit.
    pub triangle: TriangleId,
}

/// A height-field surface placed in the world by an object-to-world
/// transform.
#[derive(Debug, Clone)]
pub struct Heightfield {
    base: ShapeBase,
    grid: HeightGrid,
    shading: Shading,
}

impl Heightfield {
    /// Build a height field from `nx * ny` row-major elevation samples.
    pub fn new(
        object_to_world: Transform,
        reverse_orientation: bool,
        nx: usize,
        ny: usize,
        z: &[f64],
        mode: ShadingMode,
    ) -> Result<Self> {
        let grid = HeightGrid::new(nx, ny, z)?;
        let shading = Shading::new(mode, &grid);
        let base = ShapeBase::new(object_to_world, reverse_orientation);
        log::debug!(
            "built {} height field {nx}x{ny}, z in [{}, {}], {} shading",
            base.id,
            grid.min_z(),
            grid.max_z(),
            mode
        );
        Ok(Self {
            base,
            grid,
            shading,
        })
    }

    /// Build from scene parameters: integers `nu` and `nv` give the grid
    /// resolution, the float list `Pz` the elevations, and the optional
    /// boolean `smooth` selects smooth shading.
    pub fn from_params(
        object_to_world: Transform,
        reverse_orientation: bool,
        params: &ParamSet,
    ) -> Result<Self> {
        let nu = params.find_one_int("nu", -1);
        let nv = params.find_one_int("nv", -1);
        if nu == -1 {
            return Err(ShapeError::MissingParameter("nu"));
        }
        if nv == -1 {
            return Err(ShapeError::MissingParameter("nv"));
        }
        let (Ok(nx), Ok(ny)) = (usize::try_from(nu), usize::try_from(nv)) else {
            return Err(ShapeError::InvalidResolution { nx: nu, ny: nv });
        };
        if nx < 2 || ny < 2 {
            return Err(ShapeError::InvalidResolution { nx: nu, ny: nv });
        }
        let z = params
            .find_floats("Pz")
            .ok_or(ShapeError::MissingParameter("Pz"))?;
        let mode = if params.find_one_bool("smooth", false) {
            ShadingMode::Smooth
        } else {
            ShadingMode::Flat
        };
        Self::new(object_to_world, reverse_orientation, nx, ny, &z, mode)
    }

    /// The elevation grid.
    pub fn grid(&self) -> &HeightGrid {
        &self.grid
    }

    /// Shading mode chosen at construction.
    pub fn shading_mode(&self) -> ShadingMode {
        self.shading.mode()
    }

    /// Precomputed smooth-shading tables, when smooth shading is on.
    pub fn smooth_normals(&self) -> Option<&SmoothNormals> {
        self.shading.smooth_normals()
    }

    /// Nearest hit of an object-space ray.
    pub fn intersect_local(&self, ray: &Ray) -> Option<GridHit> {
        GridRayMarcher::new(&self.grid)
            .march(ray, |c| cell::intersect_cell(&self.grid, ray, c))
            .map(|hit| GridHit {
                t: hit.t,
                point: ray.at(hit.t),
                triangle: hit.triangle,
            })
    }

    /// Whether an object-space ray hits the surface.
    pub fn occluded_local(&self, ray: &Ray) -> bool {
        GridRayMarcher::new(&self.grid)
            .march(ray, |c| cell::cell_occludes(&self.grid, ray, c).then_some(()))
            .is_some()
    }

    fn frame(&self, tri: TriangleId) -> TriangleFrame {
        match self.shading.smooth_normals() {
            Some(normals) => *normals.frame(tri),
            None => TriangleFrame::from_points(&self.grid.triangle_points(tri)),
        }
    }
}

impl Shape for Heightfield {
    fn base(&self) -> &ShapeBase {
        &self.base
    }

    fn object_bound(&self) -> Aabb3 {
        self.grid.bounds()
    }

    fn refine(&self) -> Result<Vec<Arc<dyn Shape>>> {
        Err(ShapeError::RefineUnsupported("heightfield"))
    }

    fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        let local = ray.transformed(&self.base.world_to_object);
        let hit = self.intersect_local(&local)?;

        let frame = self.frame(hit.triangle);
        let o2w = &self.base.object_to_world;
        let dg = DifferentialGeometry::new(
            o2w.apply_point(&hit.point),
            o2w.apply_vec(&frame.dpdu),
            o2w.apply_vec(&frame.dpdv),
            Vec3::zeros(),
            Vec3::zeros(),
            hit.point.x,
            hit.point.y,
            self.base.shape_ref(),
        );

        Some(Intersection {
            t_hit: hit.t,
            ray_epsilon: RAY_EPSILON_SCALE * hit.t,
            dg,
        })
    }

    fn intersect_p(&self, ray: &Ray) -> bool {
        self.occluded_local(&ray.transformed(&self.base.world_to_object))
    }

    fn shading_geometry(
        &self,
        object_to_world: &Transform,
        dg: &DifferentialGeometry,
    ) -> DifferentialGeometry {
        self.shading.shading_geometry(&self.grid, object_to_world, dg)
    }
}
