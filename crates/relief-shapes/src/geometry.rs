//! Local surface description at a ray hit.

use relief_math::{Point3, Vec3};

use crate::ShapeRef;

/// Position, tangent frame, normal derivatives and surface parameters at a
/// point on a shape, in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifferentialGeometry {
    /// Hit position.
    pub p: Point3,
    /// Unit surface normal.
    pub nn: Vec3,
    /// Surface parameter u.
    pub u: f64,
    /// Surface parameter v.
    pub v: f64,
    /// Partial derivative of position with respect to u.
    pub dpdu: Vec3,
    /// Partial derivative of position with respect to v.
    pub dpdv: Vec3,
    /// Partial derivative of the normal with respect to u.
    pub dndu: Vec3,
    /// Partial derivative of the normal with respect to v.
    pub dndv: Vec3,
    /// Owning shape.
    pub shape: ShapeRef,
}

impl DifferentialGeometry {
    /// Build a record, deriving the normal as `normalize(dpdu x dpdv)`.
    ///
    /// The normal is flipped when exactly one of the owner's
    /// `reverse_orientation` and `swaps_handedness` flags is set.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        p: Point3,
        dpdu: Vec3,
        dpdv: Vec3,
        dndu: Vec3,
        dndv: Vec3,
        u: f64,
        v: f64,
        shape: ShapeRef,
    ) -> Self {
        let mut nn = dpdu.cross(&dpdv).normalize();
        if shape.reverse_orientation ^ shape.swaps_handedness {
            nn = -nn;
        }
        Self {
            p,
            nn,
            u,
            v,
            dpdu,
            dpdv,
            dndu,
            dndv,
            shape,
        }
    }
}

/// Flip `n` into the hemisphere of `reference`.
pub(crate) fn face_forward(n: Vec3, reference: &Vec3) -> Vec3 {
    if n.dot(reference) < 0.0 {
        -n
    } else {
        n
    }
}

/// A confirmed ray hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Ray parameter of the hit.
    pub t_hit: f64,
    /// Offset for spawning secondary rays, proportional to `t_hit`.
    pub ray_epsilon: f64,
    /// Geometry at the hit.
    pub dg: DifferentialGeometry,
}
