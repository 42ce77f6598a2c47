//! Axis-aligned bounding boxes.

use relief_math::{Point3, Transform};

use crate::Ray;

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb3 {
    /// Create an AABB from min and max corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create an empty (inverted) AABB suitable for expansion.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Expand this AABB to include a point.
    pub fn include_point(&mut self, p: &Point3) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &Aabb3) -> Aabb3 {
        Aabb3::new(self.min.inf(&other.min), self.max.sup(&other.max))
    }

    /// Whether `p` lies in the box (boundary included).
    pub fn inside(&self, p: &Point3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Clip a ray against the box using the slab method.
    ///
    /// Returns the parametric interval `(t0, t1)` of the ray that lies in the
    /// box, already clipped to `[ray.t_min, ray.t_max]`, or `None` when the
    /// ray misses. Axis-parallel rays produce `0 * inf = NaN` slab bounds on
    /// the parallel axis; `f64::max`/`f64::min` discard those.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f64, f64)> {
        let mut t0 = ray.t_min;
        let mut t1 = ray.t_max;
        for axis in 0..3 {
            let inv = 1.0 / ray.direction[axis];
            let mut t_near = (self.min[axis] - ray.origin[axis]) * inv;
            let mut t_far = (self.max[axis] - ray.origin[axis]) * inv;
            if t_near > t_far {
                std::mem::swap(&mut t_near, &mut t_far);
            }
            t0 = t0.max(t_near);
            t1 = t1.min(t_far);
            if t0 > t1 {
                return None;
            }
        }
        Some((t0, t1))
    }

    /// Box enclosing the eight transformed corners.
    pub fn transformed(&self, transform: &Transform) -> Aabb3 {
        let mut out = Aabb3::empty();
        for i in 0..8 {
            let corner = Point3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            out.include_point(&transform.apply_point(&corner));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relief_math::Vec3;

    fn unit_box() -> Aabb3 {
        Aabb3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_ray_aabb_hit() {
        let ray = Ray::new(Point3::new(-5.0, 0.5, 0.5), Vec3::new(1.0, 0.0, 0.0));
        let (t0, t1) = unit_box().intersect_ray(&ray).unwrap();
        assert!((t0 - 5.0).abs() < 1e-10);
        assert!((t1 - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_ray_aabb_miss() {
        let ray = Ray::new(Point3::new(-5.0, 5.0, 5.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(unit_box().intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_ray_aabb_behind() {
        let ray = Ray::new(Point3::new(-5.0, 0.5, 0.5), Vec3::new(-1.0, 0.0, 0.0));
        assert!(unit_box().intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_ray_inside_aabb() {
        let ray = Ray::new(Point3::new(0.5, 0.5, 0.5), Vec3::new(1.0, 0.0, 0.0));
        let (t0, t1) = unit_box().intersect_ray(&ray).unwrap();
        assert_eq!(t0, 0.0);
        assert!((t1 - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_ray_on_slab_boundary() {
        // Origin exactly on the x = 0 face with zero x direction.
        let ray = Ray::new(Point3::new(0.0, 0.5, 2.0), Vec3::new(0.0, 0.0, -1.0));
        let (t0, t1) = unit_box().intersect_ray(&ray).unwrap();
        assert!((t0 - 1.0).abs() < 1e-10);
        assert!((t1 - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_flat_box() {
        // Zero-thickness box, as produced by a flat height field.
        let flat = Aabb3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 0.0));
        let ray = Ray::new(Point3::new(0.5, 0.5, 1.0), Vec3::new(0.0, 0.0, -1.0));
        let (t0, t1) = flat.intersect_ray(&ray).unwrap();
        assert!((t0 - 1.0).abs() < 1e-12);
        assert!((t1 - 1.0).abs() < 1e-12);
        assert!(flat.inside(&Point3::new(0.25, 1.0, 0.0)));
        assert!(!flat.inside(&Point3::new(0.25, 1.0, 1e-9)));
    }

    #[test]
    fn test_respects_ray_range() {
        let ray = Ray::new(Point3::new(-5.0, 0.5, 0.5), Vec3::new(1.0, 0.0, 0.0)).with_range(0.0, 4.0);
        assert!(unit_box().intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_transformed_box() {
        let t = Transform::translation(1.0, 2.0, 3.0);
        let moved = unit_box().transformed(&t);
        assert!((moved.min - Point3::new(1.0, 2.0, 3.0)).norm() < 1e-12);
        assert!((moved.max - Point3::new(2.0, 3.0, 4.0)).norm() < 1e-12);
        let u = unit_box().union(&moved);
        assert_eq!(u.min, Point3::origin());
        assert_eq!(u.max, Point3::new(2.0, 3.0, 4.0));
    }
}
