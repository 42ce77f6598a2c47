//! The shape capability set shared by every renderable surface.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use relief_math::Transform;

use crate::{Aabb3, DifferentialGeometry, Intersection, Ray, Result};

static NEXT_SHAPE_ID: AtomicU32 = AtomicU32::new(1);

/// Process-unique identifier of a constructed shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u32);

impl ShapeId {
    fn next() -> Self {
        Self(NEXT_SHAPE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape#{}", self.0)
    }
}

/// What a differential-geometry record needs to know about its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeRef {
    /// Owning shape.
    pub id: ShapeId,
    /// Whether the shape's normals are flipped by the scene description.
    pub reverse_orientation: bool,
    /// Whether the object-to-world transform flips handedness.
    pub swaps_handedness: bool,
}

/// State every shape carries: its identity and placement in the world.
#[derive(Debug, Clone)]
pub struct ShapeBase {
    /// Unique id.
    pub id: ShapeId,
    /// Object space to world space.
    pub object_to_world: Transform,
    /// World space to object space.
    pub world_to_object: Transform,
    /// Flip the surface normals.
    pub reverse_orientation: bool,
    /// Cached `object_to_world.swaps_handedness()`.
    pub transform_swaps_handedness: bool,
}

impl ShapeBase {
    /// Allocate a new id and cache the derived transform data.
    pub fn new(object_to_world: Transform, reverse_orientation: bool) -> Self {
        let world_to_object = object_to_world.inverse();
        let transform_swaps_handedness = object_to_world.swaps_handedness();
        Self {
            id: ShapeId::next(),
            object_to_world,
            world_to_object,
            reverse_orientation,
            transform_swaps_handedness,
        }
    }

    /// Owner reference stamped into differential geometry.
    pub fn shape_ref(&self) -> ShapeRef {
        ShapeRef {
            id: self.id,
            reverse_orientation: self.reverse_orientation,
            swaps_handedness: self.transform_swaps_handedness,
        }
    }
}

/// A renderable surface.
///
/// Every query method takes `&self`: shapes are immutable once built and
/// are queried concurrently from rendering threads.
pub trait Shape: Send + Sync + fmt::Debug {
    /// Identity and placement.
    fn base(&self) -> &ShapeBase;

    /// Bounding box in object space.
    fn object_bound(&self) -> Aabb3;

    /// Bounding box in world space.
    fn world_bound(&self) -> Aabb3 {
        self.object_bound().transformed(&self.base().object_to_world)
    }

    /// Whether the shape answers intersection queries itself. Shapes that
    /// return `false` must be refined first.
    fn can_intersect(&self) -> bool {
        true
    }

    /// Decompose into simpler shapes.
    fn refine(&self) -> Result<Vec<Arc<dyn Shape>>>;

    /// Nearest hit of a world-space ray, if any.
    fn intersect(&self, ray: &Ray) -> Option<Intersection>;

    /// Whether a world-space ray hits the shape at all.
    fn intersect_p(&self, ray: &Ray) -> bool;

    /// Geometry used for shading at a hit. Only the normal may differ from
    /// the geometric record.
    fn shading_geometry(
        &self,
        object_to_world: &Transform,
        dg: &DifferentialGeometry,
    ) -> DifferentialGeometry {
        let _ = object_to_world;
        *dg
    }
}
