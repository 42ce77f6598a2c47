//! Ray representation.

use relief_math::{Point3, Transform, Vec3};

/// A ray in 3D space with a valid parametric interval `[t_min, t_max]`.
///
/// The direction is not normalized: transforming a ray between world and
/// object space scales it, and keeping it unnormalized means a parameter `t`
/// names the same point in both spaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Origin point of the ray.
    pub origin: Point3,
    /// Direction of the ray.
    pub direction: Vec3,
    /// Smallest valid parameter.
    pub t_min: f64,
    /// Largest valid parameter.
    pub t_max: f64,
}

impl Ray {
    /// Create a ray valid on `[0, +inf)`.
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            t_min: 0.0,
            t_max: f64::INFINITY,
        }
    }

    /// Restrict the ray to `[t_min, t_max]`.
    pub fn with_range(mut self, t_min: f64, t_max: f64) -> Self {
        self.t_min = t_min;
        self.t_max = t_max;
        self
    }

    /// Evaluate the ray at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + t * self.direction
    }

    /// The same ray expressed in another coordinate space. The parametric
    /// interval is carried over unchanged.
    pub fn transformed(&self, transform: &Transform) -> Self {
        Self {
            origin: transform.apply_point(&self.origin),
            direction: transform.apply_vec(&self.direction),
            t_min: self.t_min,
            t_max: self.t_max,
        }
    }
}
