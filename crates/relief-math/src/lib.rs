#![warn(missing_docs)]

//! Math types for the relief renderer.
//!
//! Aliases over nalgebra's `f64` points and vectors, plus an affine
//! [`Transform`] that carries its own inverse. Shapes move every query ray
//! into object space and every hit back out, so both directions are stored
//! rather than inverted per query.

use nalgebra::{Matrix3, Matrix4, Rotation3, Unit, Vector3};

/// Position in 3D.
pub type Point3 = nalgebra::Point3<f64>;

/// Displacement or normal in 3D.
pub type Vec3 = Vector3<f64>;

/// Unit-length axis.
pub type Dir3 = Unit<Vector3<f64>>;

/// An invertible affine map with its inverse.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    m: Matrix4<f64>,
    m_inv: Matrix4<f64>,
}

impl Transform {
    /// The identity map.
    pub fn identity() -> Self {
        Self {
            m: Matrix4::identity(),
            m_inv: Matrix4::identity(),
        }
    }

    /// Wrap a homogeneous matrix. `None` if it has no inverse.
    pub fn from_matrix(m: Matrix4<f64>) -> Option<Self> {
        let m_inv = m.try_inverse()?;
        Some(Self { m, m_inv })
    }

    /// Shift by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let offset = Vec3::new(dx, dy, dz);
        Self {
            m: Matrix4::new_translation(&offset),
            m_inv: Matrix4::new_translation(&-offset),
        }
    }

    /// Per-axis scale. `None` when any factor is zero.
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Option<Self> {
        if sx == 0.0 || sy == 0.0 || sz == 0.0 {
            return None;
        }
        Some(Self {
            m: Matrix4::new_nonuniform_scaling(&Vec3::new(sx, sy, sz)),
            m_inv: Matrix4::new_nonuniform_scaling(&Vec3::new(sx.recip(), sy.recip(), sz.recip())),
        })
    }

    /// Counter-clockwise rotation of `angle` radians about `x`.
    pub fn rotation_x(angle: f64) -> Self {
        Self::rotation_about_axis(&Vec3::x_axis(), angle)
    }

    /// Counter-clockwise rotation of `angle` radians about `y`.
    pub fn rotation_y(angle: f64) -> Self {
        Self::rotation_about_axis(&Vec3::y_axis(), angle)
    }

    /// Counter-clockwise rotation of `angle` radians about `z`.
    pub fn rotation_z(angle: f64) -> Self {
        Self::rotation_about_axis(&Vec3::z_axis(), angle)
    }

    /// Rotation of `angle` radians about `axis` through the origin. The
    /// inverse is the transpose.
    pub fn rotation_about_axis(axis: &Dir3, angle: f64) -> Self {
        let m = Rotation3::from_axis_angle(axis, angle).to_homogeneous();
        Self {
            m,
            m_inv: m.transpose(),
        }
    }

    /// Camera-to-world map for a camera at `eye` aimed at `target`.
    ///
    /// Camera space looks down `+z`, `+y` is up and `+x` is `up x forward`.
    /// `None` when `eye == target` or `up` is parallel to the view.
    pub fn look_at(eye: &Point3, target: &Point3, up: &Vec3) -> Option<Self> {
        let forward = (target - eye).try_normalize(1e-12)?;
        let side = up.cross(&forward).try_normalize(1e-12)?;
        let true_up = forward.cross(&side);
        let frame = Matrix3::from_columns(&[side, true_up, forward]);
        let mut m = frame.to_homogeneous();
        m.fixed_view_mut::<3, 1>(0, 3).copy_from(&eye.coords);
        Self::from_matrix(m)
    }

    /// Matrix product `self * other`: `other` applies first.
    pub fn compose(&self, other: &Transform) -> Self {
        Self {
            m: self.m * other.m,
            m_inv: other.m_inv * self.m_inv,
        }
    }

    /// The inverse map.
    pub fn inverse(&self) -> Self {
        Self {
            m: self.m_inv,
            m_inv: self.m,
        }
    }

    /// Forward homogeneous matrix.
    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.m
    }

    /// Map a position.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        self.m.transform_point(p)
    }

    /// Map a direction; translation does not apply.
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        self.m.transform_vector(v)
    }

    /// Map a surface normal by the inverse transpose, so it stays
    /// perpendicular to mapped tangents. The result is not renormalized.
    pub fn apply_normal(&self, n: &Vec3) -> Vec3 {
        self.m_inv.fixed_view::<3, 3>(0, 0).tr_mul(n)
    }

    /// Whether the map mirrors, turning right-handed frames left-handed.
    pub fn swaps_handedness(&self) -> bool {
        self.m.fixed_view::<3, 3>(0, 0).determinant() < 0.0
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
